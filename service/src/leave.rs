use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::{derive_from_reference, DateSpan};
use dao::leave_request::{ApprovalStatusEntity, LeaveRequestEntity};
use mockall::automock;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl From<&ApprovalStatusEntity> for ApprovalStatus {
    fn from(status: &ApprovalStatusEntity) -> Self {
        match status {
            ApprovalStatusEntity::Pending => Self::Pending,
            ApprovalStatusEntity::Approved => Self::Approved,
            ApprovalStatusEntity::Rejected => Self::Rejected,
        }
    }
}
impl From<&ApprovalStatus> for ApprovalStatusEntity {
    fn from(status: &ApprovalStatus) -> Self {
        match status {
            ApprovalStatus::Pending => Self::Pending,
            ApprovalStatus::Approved => Self::Approved,
            ApprovalStatus::Rejected => Self::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// First covered calendar day, inclusive.
    pub start_date: Date,
    /// Last covered calendar day, inclusive.
    pub end_date: Date,
    pub reason: Arc<str>,
    pub document_path: Option<Arc<str>>,
    pub approval: ApprovalStatus,
    #[serde(skip)]
    pub created: Option<OffsetDateTime>,
    #[serde(skip)]
    pub deleted: Option<OffsetDateTime>,
    pub version: Uuid,
}

impl LeaveRequest {
    /// Covered days as a span; `None` when stored bounds are reversed.
    pub fn span(&self) -> Option<DateSpan> {
        DateSpan::new(self.start_date, self.end_date).ok()
    }
}

impl From<&LeaveRequestEntity> for LeaveRequest {
    fn from(leave: &LeaveRequestEntity) -> Self {
        Self {
            id: leave.id,
            employee_id: leave.employee_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason.clone(),
            document_path: leave.document_path.clone(),
            approval: (&leave.approval).into(),
            created: Some(leave.created),
            deleted: leave.deleted,
            version: leave.version,
        }
    }
}
derive_from_reference!(LeaveRequestEntity, LeaveRequest);

impl TryFrom<&LeaveRequest> for LeaveRequestEntity {
    type Error = ServiceError;
    fn try_from(leave: &LeaveRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: leave.id,
            employee_id: leave.employee_id,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason.clone(),
            document_path: leave.document_path.clone(),
            approval: (&leave.approval).into(),
            created: leave.created.ok_or(ServiceError::InternalError)?,
            deleted: leave.deleted,
            version: leave.version,
        })
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait LeaveService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError>;

    async fn get_for_employee(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[LeaveRequest]>, ServiceError>;

    async fn get_overlapping_span(
        &self,
        span: DateSpan,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[LeaveRequest]>, ServiceError>;

    /// Create a pending request. Fails with
    /// [`ServiceError::LeaveConflictsWithAttendance`] when an attendance
    /// entry already exists on any covered day.
    async fn create(
        &self,
        leave: &LeaveRequest,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError>;

    /// Approve or reject; an already decided request may be re-decided.
    async fn decide(
        &self,
        id: Uuid,
        approval: ApprovalStatus,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError>;

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
