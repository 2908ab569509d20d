use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::{derive_from_reference, round_hours, TimeOfDay};
use dao::work_schedule::WorkScheduleEntity;
use mockall::automock;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::employee::Employee;
use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkSchedule {
    pub id: Uuid,
    pub name: Arc<str>,
    pub start_of_work: TimeOfDay,
    pub late_threshold: TimeOfDay,
    pub end_of_work: TimeOfDay,
    pub created: Option<OffsetDateTime>,
    pub deleted: Option<OffsetDateTime>,
    pub version: Uuid,
}

impl From<&WorkScheduleEntity> for WorkSchedule {
    fn from(schedule: &WorkScheduleEntity) -> Self {
        Self {
            id: schedule.id,
            name: schedule.name.clone(),
            start_of_work: schedule.start_of_work,
            late_threshold: schedule.late_threshold,
            end_of_work: schedule.end_of_work,
            created: Some(schedule.created),
            deleted: schedule.deleted,
            version: schedule.version,
        }
    }
}
derive_from_reference!(WorkScheduleEntity, WorkSchedule);

impl TryFrom<&WorkSchedule> for WorkScheduleEntity {
    type Error = ServiceError;
    fn try_from(schedule: &WorkSchedule) -> Result<Self, Self::Error> {
        Ok(Self {
            id: schedule.id,
            name: schedule.name.clone(),
            start_of_work: schedule.start_of_work,
            late_threshold: schedule.late_threshold,
            end_of_work: schedule.end_of_work,
            created: schedule.created.ok_or(ServiceError::InternalError)?,
            deleted: schedule.deleted,
            version: schedule.version,
        })
    }
}

/// Schedule boundaries as they apply to one employee: per-employee start/end
/// overrides applied, late threshold always taken from the schedule itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveSchedule {
    pub schedule_id: Uuid,
    pub start_of_work: TimeOfDay,
    pub late_threshold: TimeOfDay,
    pub end_of_work: TimeOfDay,
}

impl EffectiveSchedule {
    pub fn resolve(employee: &Employee, schedule: &WorkSchedule) -> Self {
        Self {
            schedule_id: schedule.id,
            start_of_work: employee
                .custom_start_of_work
                .unwrap_or(schedule.start_of_work),
            late_threshold: schedule.late_threshold,
            end_of_work: employee.custom_end_of_work.unwrap_or(schedule.end_of_work),
        }
    }

    /// Fixed hour credit for a day covered by approved leave: the size of
    /// the grace window between start of work and the late threshold.
    pub fn leave_day_equivalent_hours(&self) -> f64 {
        let minutes = self
            .start_of_work
            .minutes_until(self.late_threshold)
            .max(0);
        round_hours(minutes as f64 / 60.0)
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait WorkScheduleService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[WorkSchedule]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkSchedule, ServiceError>;
    /// The organization default used for employees without an assignment.
    async fn get_default(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<WorkSchedule>, ServiceError>;
    async fn create(
        &self,
        schedule: &WorkSchedule,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkSchedule, ServiceError>;
    async fn update(
        &self,
        schedule: &WorkSchedule,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<WorkSchedule, ServiceError>;
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
