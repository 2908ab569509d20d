use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::DateSpan;
use mockall::automock;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::attendance::AttendanceStatus;
use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineKind {
    Attendance,
    Leave,
    /// Placeholder for an employee with neither attendance nor leave on the
    /// current day; only synthesized in the all-employees today view.
    NotYetCheckedIn,
}

impl TimelineKind {
    /// Attendance and leave rows sort before placeholders on the same day.
    pub fn sort_rank(&self) -> u8 {
        match self {
            Self::Attendance | Self::Leave => 0,
            Self::NotYetCheckedIn => 1,
        }
    }
}

/// One unified row of the merged attendance/leave timeline.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineItem {
    pub kind: TimelineKind,
    pub date: Date,
    pub employee_id: Uuid,
    pub employee_name: Arc<str>,
    pub check_in: Option<OffsetDateTime>,
    pub check_out: Option<OffsetDateTime>,
    pub status: Option<AttendanceStatus>,
    pub early_leave: Option<bool>,
    pub late_minutes: u32,
    /// Derived per item: actual or estimated hours for attendance rows, the
    /// leave-day equivalent credit for leave rows, zero for placeholders.
    pub worked_hours: f64,
    pub leave_reason: Option<Arc<str>>,
    /// Backing attendance entry or leave request, when one exists.
    pub source_id: Option<Uuid>,
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait TimelineService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Merge attendance entries and approved leave days into one sequence,
    /// date-descending. Without an employee filter the view is
    /// administrative; without a span it covers the current day and also
    /// synthesizes [`TimelineKind::NotYetCheckedIn`] placeholders.
    /// Recomputed fresh from persisted rows on every call.
    async fn merged_timeline(
        &self,
        employee_id: Option<Uuid>,
        span: Option<DateSpan>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[TimelineItem]>, ServiceError>;
}
