use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::{derive_from_reference, DateSpan};
use dao::attendance::{AttendanceEntity, AttendanceStatusEntity};
use mockall::automock;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    /// Backfilled by an administrator for a day with no recorded presence.
    Unexcused,
}

impl AttendanceStatus {
    /// Whether the row asserts the employee was at work, which allows
    /// schedule based duration estimation when timestamps are missing.
    pub fn assumes_presence(&self) -> bool {
        matches!(self, Self::Present | Self::Late)
    }
}

impl From<&AttendanceStatusEntity> for AttendanceStatus {
    fn from(status: &AttendanceStatusEntity) -> Self {
        match status {
            AttendanceStatusEntity::Present => Self::Present,
            AttendanceStatusEntity::Late => Self::Late,
            AttendanceStatusEntity::Unexcused => Self::Unexcused,
        }
    }
}
impl From<&AttendanceStatus> for AttendanceStatusEntity {
    fn from(status: &AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => Self::Present,
            AttendanceStatus::Late => Self::Late,
            AttendanceStatus::Unexcused => Self::Unexcused,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttendanceEntry {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Calendar day in the organization timezone.
    pub date: Date,
    pub check_in: Option<OffsetDateTime>,
    pub check_out: Option<OffsetDateTime>,
    pub status: AttendanceStatus,
    pub early_leave: Option<bool>,
    /// Minutes past the late threshold; a penalty indicator which is never
    /// subtracted from the worked duration.
    pub late_minutes: u32,
    /// Decimal hours with four decimal places.
    pub worked_hours: f64,
    pub schedule_id: Uuid,
    #[serde(skip)]
    pub created: Option<OffsetDateTime>,
    #[serde(skip)]
    pub deleted: Option<OffsetDateTime>,
    pub version: Uuid,
}

impl From<&AttendanceEntity> for AttendanceEntry {
    fn from(entry: &AttendanceEntity) -> Self {
        Self {
            id: entry.id,
            employee_id: entry.employee_id,
            date: entry.date,
            check_in: entry.check_in,
            check_out: entry.check_out,
            status: (&entry.status).into(),
            early_leave: entry.early_leave,
            late_minutes: entry.late_minutes,
            worked_hours: entry.worked_hours,
            schedule_id: entry.schedule_id,
            created: Some(entry.created),
            deleted: entry.deleted,
            version: entry.version,
        }
    }
}
derive_from_reference!(AttendanceEntity, AttendanceEntry);

impl TryFrom<&AttendanceEntry> for AttendanceEntity {
    type Error = ServiceError;
    fn try_from(entry: &AttendanceEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entry.id,
            employee_id: entry.employee_id,
            date: entry.date,
            check_in: entry.check_in,
            check_out: entry.check_out,
            status: (&entry.status).into(),
            early_leave: entry.early_leave,
            late_minutes: entry.late_minutes,
            worked_hours: entry.worked_hours,
            schedule_id: entry.schedule_id,
            created: entry.created.ok_or(ServiceError::InternalError)?,
            deleted: entry.deleted,
            version: entry.version,
        })
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait AttendanceService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Record the check-in for the current day, deriving lateness and a
    /// provisional worked duration from the employee's effective schedule.
    async fn check_in(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<AttendanceEntry, ServiceError>;

    /// Close the day's open entry, setting the early leave flag and the
    /// actual worked duration. Arbitrarily late check-out is permitted.
    async fn check_out(
        &self,
        employee_id: Uuid,
        check_out: OffsetDateTime,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<AttendanceEntry, ServiceError>;

    async fn get_for_day(
        &self,
        employee_id: Uuid,
        date: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<AttendanceEntry>, ServiceError>;

    async fn get_for_employee_in_span(
        &self,
        employee_id: Uuid,
        span: DateSpan,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[AttendanceEntry]>, ServiceError>;

    /// Explicit administrative removal; entries are never deleted otherwise.
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
