use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::DateSpan;
use mockall::automock;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{DaoError, MockTransaction, Transaction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApprovalStatusEntity {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaveRequestEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// First covered calendar day, inclusive.
    pub start_date: Date,
    /// Last covered calendar day, inclusive.
    pub end_date: Date,
    pub reason: Arc<str>,
    pub document_path: Option<Arc<str>>,
    pub approval: ApprovalStatusEntity,
    pub created: OffsetDateTime,
    pub deleted: Option<OffsetDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait LeaveRequestDao {
    type Transaction: Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<LeaveRequestEntity>, DaoError>;
    async fn find_by_employee_id(
        &self,
        employee_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError>;
    async fn find_overlapping_span(
        &self,
        span: DateSpan,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError>;
    async fn find_by_employee_overlapping_span(
        &self,
        employee_id: Uuid,
        span: DateSpan,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &LeaveRequestEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &LeaveRequestEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
