use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

/// Per-employee aggregation over one calendar month. A read-time projection,
/// never persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlyRecap {
    pub employee_id: Uuid,
    pub employee_name: Arc<str>,
    pub present_count: u32,
    pub late_count: u32,
    pub early_leave_count: u32,
    /// Approved leave days falling inside the month.
    pub leave_day_count: u32,
    pub unexcused_count: u32,
    pub total_worked_seconds: u64,
    pub total_late_minutes: u64,
    /// Worked seconds averaged over the entries that contributed a duration,
    /// in decimal hours; zero when none did.
    pub average_worked_hours: f64,
    /// Worked hours plus the leave-day equivalent credit, decimal hours.
    pub total_worked_hours_with_leave: f64,
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait RecapService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Aggregate one month for a single employee or for all staff. An
    /// employee with only leave still appears; one with no rows at all is
    /// omitted unless requested by id.
    async fn monthly_recap(
        &self,
        year: i32,
        month: u8,
        employee_id: Option<Uuid>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[MonthlyRecap]>, ServiceError>;
}
