use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::{round_hours, DateSpan};
use dao::attendance::{AttendanceDao, AttendanceStatusEntity};
use dao::leave_request::{ApprovalStatusEntity, LeaveRequestDao};
use dao::TransactionDao;
use service::attendance::AttendanceEntry;
use service::config::ConfigService;
use service::employee::{Employee, EmployeeService, Role};
use service::permission::{Authentication, ADMIN_PRIVILEGE};
use service::recap::{MonthlyRecap, RecapService};
use service::schedule::{WorkSchedule, WorkScheduleService};
use service::{PermissionService, ServiceError};
use time::Date;
use tracing::info;
use uuid::Uuid;

use crate::permission::check_self_or_admin;
use crate::work_time::{self, SpanInput};

pub trait RecapServiceDeps {
    type Context: Clone + PartialEq + Eq + std::fmt::Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;
    type AttendanceDao: AttendanceDao<Transaction = Self::Transaction> + Send + Sync;
    type LeaveRequestDao: LeaveRequestDao<Transaction = Self::Transaction> + Send + Sync;
    type EmployeeService: EmployeeService<Transaction = Self::Transaction, Context = Self::Context>
        + Send
        + Sync;
    type WorkScheduleService: WorkScheduleService<
            Transaction = Self::Transaction,
            Context = Self::Context,
        > + Send
        + Sync;
    type PermissionService: PermissionService<Context = Self::Context> + Send + Sync;
    type ConfigService: ConfigService + Send + Sync;
    type TransactionDao: TransactionDao<Transaction = Self::Transaction> + Send + Sync;
}

pub struct RecapServiceImpl<Deps: RecapServiceDeps> {
    pub attendance_dao: Arc<Deps::AttendanceDao>,
    pub leave_request_dao: Arc<Deps::LeaveRequestDao>,
    pub employee_service: Arc<Deps::EmployeeService>,
    pub work_schedule_service: Arc<Deps::WorkScheduleService>,
    pub permission_service: Arc<Deps::PermissionService>,
    pub config_service: Arc<Deps::ConfigService>,
    pub transaction_dao: Arc<Deps::TransactionDao>,
}

#[allow(deprecated)]
fn month_span(year: i32, month: u8) -> Result<DateSpan, ServiceError> {
    let month_enum = time::Month::try_from(month).map_err(|_| ServiceError::InvalidPeriod(month))?;
    let start = Date::from_calendar_date(year, month_enum, 1)
        .map_err(|_| ServiceError::InvalidPeriod(month))?;
    let end = Date::from_calendar_date(
        year,
        month_enum,
        time::util::days_in_year_month(year, month_enum),
    )
    .map_err(|_| ServiceError::InvalidPeriod(month))?;
    DateSpan::new(start, end).map_err(|_| ServiceError::InternalError)
}

#[async_trait]
impl<Deps: RecapServiceDeps> RecapService for RecapServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn monthly_recap(
        &self,
        year: i32,
        month: u8,
        employee_id: Option<Uuid>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[MonthlyRecap]>, ServiceError> {
        if !(1..=12).contains(&month) {
            return Err(ServiceError::InvalidPeriod(month));
        }
        let span = month_span(year, month)?;

        let tx = self.transaction_dao.use_transaction(tx).await?;
        match employee_id {
            Some(employee_id) => {
                check_self_or_admin(self.permission_service.as_ref(), employee_id, context).await?
            }
            None => {
                self.permission_service
                    .check_permission(ADMIN_PRIVILEGE, context)
                    .await?
            }
        }

        let config = self.config_service.get_config().await?;
        let tz = work_time::resolve_timezone(&config.timezone)?;
        info!(year, month, "Aggregating monthly recap");

        let employees: Vec<Employee> = match employee_id {
            Some(employee_id) => vec![
                self.employee_service
                    .get(employee_id, Authentication::Full, tx.clone().into())
                    .await?,
            ],
            None => self
                .employee_service
                .get_all(Authentication::Full, tx.clone().into())
                .await?
                .iter()
                .filter(|employee| employee.role == Role::Staff)
                .cloned()
                .collect(),
        };
        let schedules: HashMap<Uuid, WorkSchedule> = self
            .work_schedule_service
            .all(Authentication::Full, tx.clone().into())
            .await?
            .iter()
            .map(|schedule| (schedule.id, schedule.clone()))
            .collect();
        let default_schedule = self
            .work_schedule_service
            .get_default(Authentication::Full, tx.clone().into())
            .await?;

        let mut recaps = Vec::with_capacity(employees.len());
        for employee in &employees {
            let entries = self
                .attendance_dao
                .find_by_employee_in_span(employee.id, span, tx.clone())
                .await?;
            let leaves: Vec<_> = self
                .leave_request_dao
                .find_by_employee_overlapping_span(employee.id, span, tx.clone())
                .await?
                .iter()
                .filter(|leave| leave.approval == ApprovalStatusEntity::Approved)
                .cloned()
                .collect();
            // Leave-only employees still get a row; employees without any
            // rows appear only when requested explicitly.
            if entries.is_empty() && leaves.is_empty() && employee_id.is_none() {
                continue;
            }

            let schedule = work_time::effective_from_catalog(
                employee,
                &schedules,
                default_schedule.as_ref(),
            );

            let mut present_count = 0u32;
            let mut late_count = 0u32;
            let mut early_leave_count = 0u32;
            let mut unexcused_count = 0u32;
            let mut total_worked_seconds = 0u64;
            let mut total_late_minutes = 0u64;
            let mut worked_entry_count = 0u32;
            for entity in entries.iter() {
                match entity.status {
                    AttendanceStatusEntity::Present => present_count += 1,
                    AttendanceStatusEntity::Late => late_count += 1,
                    AttendanceStatusEntity::Unexcused => unexcused_count += 1,
                }
                if entity.early_leave == Some(true) {
                    early_leave_count += 1;
                }
                total_late_minutes += entity.late_minutes as u64;

                let entry = AttendanceEntry::from(entity);
                let span_input = SpanInput::classify(&entry, schedule.as_ref());
                if !matches!(span_input, SpanInput::Stored { .. }) {
                    worked_entry_count += 1;
                }
                total_worked_seconds += span_input.worked_seconds(tz);
            }

            let equivalent_hours = schedule
                .as_ref()
                .map(|schedule| schedule.leave_day_equivalent_hours())
                .unwrap_or(0.0);
            let mut leave_day_count = 0u32;
            let mut leave_hours = 0f64;
            for leave in &leaves {
                let Ok(leave_span) = DateSpan::new(leave.start_date, leave.end_date) else {
                    continue;
                };
                let Some(overlap) = leave_span.intersect(&span) else {
                    continue;
                };
                leave_day_count += overlap.day_count();
                leave_hours += equivalent_hours * overlap.day_count() as f64;
            }

            recaps.push(MonthlyRecap {
                employee_id: employee.id,
                employee_name: employee.name.clone(),
                present_count,
                late_count,
                early_leave_count,
                leave_day_count,
                unexcused_count,
                total_worked_seconds,
                total_late_minutes,
                average_worked_hours: if worked_entry_count > 0 {
                    round_hours(total_worked_seconds as f64 / 3600.0 / worked_entry_count as f64)
                } else {
                    0.0
                },
                total_worked_hours_with_leave: round_hours(
                    total_worked_seconds as f64 / 3600.0 + leave_hours,
                ),
            });
        }
        recaps.sort_by(|a, b| a.employee_name.cmp(&b.employee_name));

        self.transaction_dao.commit(tx).await?;
        Ok(recaps.into())
    }
}
