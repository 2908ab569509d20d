use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::{DateSpan, TimeOfDay};
use dao::attendance::AttendanceDao;
use dao::leave_request::{ApprovalStatusEntity, LeaveRequestDao};
use dao::{DaoError, TransactionDao};
use service::attendance::{AttendanceEntry, AttendanceService, AttendanceStatus};
use service::clock::ClockService;
use service::config::ConfigService;
use service::employee::{Employee, EmployeeService};
use service::permission::{Authentication, ADMIN_PRIVILEGE};
use service::schedule::{EffectiveSchedule, WorkScheduleService};
use service::uuid_service::UuidService;
use service::{PermissionService, ServiceError};
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::permission::check_self_or_admin;
use crate::work_time;

const ATTENDANCE_SERVICE_PROCESS: &str = "attendance-service";

pub trait AttendanceServiceDeps {
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
    type UuidService: UuidService + Send + Sync;
    type ConfigService: ConfigService + Send + Sync;
    type TransactionDao: TransactionDao<Transaction = Self::Transaction> + Send + Sync;
}

pub struct AttendanceServiceImpl<Deps: AttendanceServiceDeps> {
    pub attendance_dao: Arc<Deps::AttendanceDao>,
    pub leave_request_dao: Arc<Deps::LeaveRequestDao>,
    pub employee_service: Arc<Deps::EmployeeService>,
    pub work_schedule_service: Arc<Deps::WorkScheduleService>,
    pub permission_service: Arc<Deps::PermissionService>,
    pub clock_service: Arc<Deps::ClockService>,
    pub uuid_service: Arc<Deps::UuidService>,
    pub config_service: Arc<Deps::ConfigService>,
    pub transaction_dao: Arc<Deps::TransactionDao>,
}

impl<Deps: AttendanceServiceDeps> AttendanceServiceImpl<Deps> {
    /// Effective schedule for the employee: the assigned schedule, else the
    /// organization default, with per-employee start/end overrides applied.
    async fn resolve_effective_schedule(
        &self,
        employee: &Employee,
        tx: Deps::Transaction,
    ) -> Result<EffectiveSchedule, ServiceError> {
        let schedule = match employee.schedule_id {
            Some(schedule_id) => self
                .work_schedule_service
                .get(schedule_id, Authentication::Full, tx.into())
                .await
                .map_err(|err| match err {
                    ServiceError::EntityNotFound(_) => ServiceError::ScheduleNotFound,
                    err => err,
                })?,
            None => self
                .work_schedule_service
                .get_default(Authentication::Full, tx.into())
                .await?
                .ok_or(ServiceError::ScheduleNotFound)?,
        };
        Ok(EffectiveSchedule::resolve(employee, &schedule))
    }
}

#[async_trait]
impl<Deps: AttendanceServiceDeps> AttendanceService for AttendanceServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn check_in(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<AttendanceEntry, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        check_self_or_admin(self.permission_service.as_ref(), employee_id, context).await?;

        let config = self.config_service.get_config().await?;
        let tz = work_time::resolve_timezone(&config.timezone)?;
        let now = self.clock_service.now_utc();
        let now_local = work_time::to_local(now, tz);
        let today = now_local.date();

        if self
            .attendance_dao
            .find_by_employee_and_date(employee_id, today, tx.clone())
            .await?
            .is_some()
        {
            return Err(ServiceError::AlreadyCheckedInToday);
        }
        let blocking_leave = self
            .leave_request_dao
            .find_by_employee_overlapping_span(employee_id, DateSpan::single_day(today), tx.clone())
            .await?
            .iter()
            .any(|leave| leave.approval != ApprovalStatusEntity::Rejected);
        if blocking_leave {
            return Err(ServiceError::AlreadyOnApprovedLeaveToday);
        }

        let employee = self
            .employee_service
            .get(employee_id, Authentication::Full, tx.clone().into())
            .await?;
        let schedule = self
            .resolve_effective_schedule(&employee, tx.clone())
            .await?;

        work_time::ensure_not_too_early(schedule.start_of_work, now_local)?;
        let late_minutes = work_time::lateness_minutes(schedule.late_threshold, now_local);
        let status = if late_minutes > 0 {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };
        info!(employee = %employee_id, late_minutes, "Recording check-in");

        let entry = AttendanceEntry {
            id: self.uuid_service.new_uuid("AttendanceService::check_in id"),
            employee_id,
            date: today,
            check_in: Some(now),
            check_out: None,
            status,
            early_leave: None,
            late_minutes,
            // Provisional until check-out: estimated against the scheduled
            // end of work.
            worked_hours: work_time::provisional_worked_hours(now_local, schedule.end_of_work),
            schedule_id: schedule.schedule_id,
            created: Some(now),
            deleted: None,
            version: self
                .uuid_service
                .new_uuid("AttendanceService::check_in version"),
        };
        match self
            .attendance_dao
            .create(&(&entry).try_into()?, ATTENDANCE_SERVICE_PROCESS, tx.clone())
            .await
        {
            Ok(()) => {}
            // A racing check-in committed first under the uniqueness
            // constraint on (employee, day).
            Err(DaoError::UniqueViolation) => return Err(ServiceError::AlreadyCheckedInToday),
            Err(err) => return Err(err.into()),
        }
        self.transaction_dao.commit(tx).await?;
        Ok(entry)
    }

    async fn check_out(
        &self,
        employee_id: Uuid,
        check_out: OffsetDateTime,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<AttendanceEntry, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        check_self_or_admin(self.permission_service.as_ref(), employee_id, context).await?;

        let config = self.config_service.get_config().await?;
        let tz = work_time::resolve_timezone(&config.timezone)?;
        let check_out_local = work_time::to_local(check_out, tz);

        let entity = self
            .attendance_dao
            .find_by_employee_and_date(employee_id, check_out_local.date(), tx.clone())
            .await?
            .ok_or(ServiceError::NoCheckInToday)?;
        let check_in = match (entity.check_in, entity.check_out) {
            (Some(check_in), None) => check_in,
            _ => return Err(ServiceError::NoCheckInToday),
        };

        // Early leave compares against the schedule linked at check-in time,
        // without re-resolving per-employee overrides. There is no upper
        // bound on how late a check-out may be.
        let linked_schedule = self
            .work_schedule_service
            .get(entity.schedule_id, Authentication::Full, tx.clone().into())
            .await
            .map_err(|err| match err {
                ServiceError::EntityNotFound(_) => ServiceError::ScheduleNotFound,
                err => err,
            })?;
        let early_leave =
            TimeOfDay::from(check_out_local.time()) < linked_schedule.end_of_work;

        let updated = dao::attendance::AttendanceEntity {
            check_out: Some(check_out),
            early_leave: Some(early_leave),
            worked_hours: work_time::actual_worked_hours(check_in, check_out),
            version: self
                .uuid_service
                .new_uuid("AttendanceService::check_out version"),
            ..entity
        };
        self.attendance_dao
            .update(&updated, ATTENDANCE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok((&updated).into())
    }

    async fn get_for_day(
        &self,
        employee_id: Uuid,
        date: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<AttendanceEntry>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        check_self_or_admin(self.permission_service.as_ref(), employee_id, context).await?;
        let entry = self
            .attendance_dao
            .find_by_employee_and_date(employee_id, date, tx.clone())
            .await?
            .as_ref()
            .map(AttendanceEntry::from);
        self.transaction_dao.commit(tx).await?;
        Ok(entry)
    }

    async fn get_for_employee_in_span(
        &self,
        employee_id: Uuid,
        span: DateSpan,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[AttendanceEntry]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        check_self_or_admin(self.permission_service.as_ref(), employee_id, context).await?;
        let entries = self
            .attendance_dao
            .find_by_employee_in_span(employee_id, span, tx.clone())
            .await?
            .iter()
            .map(AttendanceEntry::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(entries)
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;

        let mut entity = self
            .attendance_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|entity| entity.deleted.is_none())
            .ok_or(ServiceError::EntityNotFound(id))?;
        entity.deleted = Some(self.clock_service.now_utc());
        entity.version = self
            .uuid_service
            .new_uuid("AttendanceService::delete version");
        self.attendance_dao
            .update(&entity, ATTENDANCE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
