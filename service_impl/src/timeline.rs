use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::{hours_from_seconds, DateSpan};
use dao::attendance::AttendanceDao;
use dao::leave_request::{ApprovalStatusEntity, LeaveRequestDao};
use dao::TransactionDao;
use service::attendance::AttendanceEntry;
use service::clock::ClockService;
use service::config::ConfigService;
use service::employee::{Employee, EmployeeService, Role};
use service::permission::{Authentication, ADMIN_PRIVILEGE};
use service::schedule::{WorkSchedule, WorkScheduleService};
use service::timeline::{TimelineItem, TimelineKind, TimelineService};
use service::{PermissionService, ServiceError};
use uuid::Uuid;

use crate::permission::check_self_or_admin;
use crate::work_time::{self, SpanInput};

pub trait TimelineServiceDeps {
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
    type ClockService: ClockService + Send + Sync;
    type ConfigService: ConfigService + Send + Sync;
    type TransactionDao: TransactionDao<Transaction = Self::Transaction> + Send + Sync;
}

pub struct TimelineServiceImpl<Deps: TimelineServiceDeps> {
    pub attendance_dao: Arc<Deps::AttendanceDao>,
    pub leave_request_dao: Arc<Deps::LeaveRequestDao>,
    pub employee_service: Arc<Deps::EmployeeService>,
    pub work_schedule_service: Arc<Deps::WorkScheduleService>,
    pub permission_service: Arc<Deps::PermissionService>,
    pub clock_service: Arc<Deps::ClockService>,
    pub config_service: Arc<Deps::ConfigService>,
    pub transaction_dao: Arc<Deps::TransactionDao>,
}

#[async_trait]
impl<Deps: TimelineServiceDeps> TimelineService for TimelineServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn merged_timeline(
        &self,
        employee_id: Option<Uuid>,
        span: Option<DateSpan>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[TimelineItem]>, ServiceError> {
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
        let today = work_time::local_date(self.clock_service.now_utc(), tz);
        // Placeholders only exist in the all-employees "today" view.
        let synthesize_missing = employee_id.is_none() && span.is_none();
        let span = span.unwrap_or_else(|| DateSpan::single_day(today));

        let employees = self
            .employee_service
            .get_all(Authentication::Full, tx.clone().into())
            .await?;
        let employees_by_id: HashMap<Uuid, &Employee> =
            employees.iter().map(|employee| (employee.id, employee)).collect();
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

        let attendance = match employee_id {
            Some(employee_id) => {
                self.attendance_dao
                    .find_by_employee_in_span(employee_id, span, tx.clone())
                    .await?
            }
            None => self.attendance_dao.find_in_span(span, tx.clone()).await?,
        };
        let leaves = match employee_id {
            Some(employee_id) => {
                self.leave_request_dao
                    .find_by_employee_overlapping_span(employee_id, span, tx.clone())
                    .await?
            }
            None => {
                self.leave_request_dao
                    .find_overlapping_span(span, tx.clone())
                    .await?
            }
        };

        let mut items: Vec<TimelineItem> = Vec::new();

        for entity in attendance.iter() {
            let Some(employee) = employees_by_id.get(&entity.employee_id) else {
                continue;
            };
            let schedule = work_time::effective_from_catalog(
                employee,
                &schedules,
                default_schedule.as_ref(),
            );
            let entry = AttendanceEntry::from(entity);
            let worked_seconds = SpanInput::classify(&entry, schedule.as_ref()).worked_seconds(tz);
            items.push(TimelineItem {
                kind: TimelineKind::Attendance,
                date: entry.date,
                employee_id: entry.employee_id,
                employee_name: employee.name.clone(),
                check_in: entry.check_in,
                check_out: entry.check_out,
                status: Some(entry.status),
                early_leave: entry.early_leave,
                late_minutes: entry.late_minutes,
                worked_hours: hours_from_seconds(worked_seconds),
                leave_reason: None,
                source_id: Some(entry.id),
            });
        }

        for leave in leaves
            .iter()
            .filter(|leave| leave.approval == ApprovalStatusEntity::Approved)
        {
            let Some(employee) = employees_by_id.get(&leave.employee_id) else {
                continue;
            };
            let equivalent_hours = work_time::effective_from_catalog(
                employee,
                &schedules,
                default_schedule.as_ref(),
            )
            .map(|schedule| schedule.leave_day_equivalent_hours())
            .unwrap_or(0.0);
            let Ok(leave_span) = DateSpan::new(leave.start_date, leave.end_date) else {
                continue;
            };
            let Some(overlap) = leave_span.intersect(&span) else {
                continue;
            };
            // One synthetic row per covered calendar day.
            for day in overlap.days() {
                items.push(TimelineItem {
                    kind: TimelineKind::Leave,
                    date: day,
                    employee_id: leave.employee_id,
                    employee_name: employee.name.clone(),
                    check_in: None,
                    check_out: None,
                    status: None,
                    early_leave: None,
                    late_minutes: 0,
                    worked_hours: equivalent_hours,
                    leave_reason: Some(leave.reason.clone()),
                    source_id: Some(leave.id),
                });
            }
        }

        if synthesize_missing {
            let seen: HashSet<Uuid> = items.iter().map(|item| item.employee_id).collect();
            for employee in employees
                .iter()
                .filter(|employee| employee.role == Role::Staff && !seen.contains(&employee.id))
            {
                items.push(TimelineItem {
                    kind: TimelineKind::NotYetCheckedIn,
                    date: today,
                    employee_id: employee.id,
                    employee_name: employee.name.clone(),
                    check_in: None,
                    check_out: None,
                    status: None,
                    early_leave: None,
                    late_minutes: 0,
                    worked_hours: 0.0,
                    leave_reason: None,
                    source_id: None,
                });
            }
        }

        items.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.kind.sort_rank().cmp(&b.kind.sort_rank()))
                .then_with(|| a.employee_name.cmp(&b.employee_name))
        });

        self.transaction_dao.commit(tx).await?;
        Ok(items.into())
    }
}
