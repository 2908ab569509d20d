use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::DateSpan;
use mockall::automock;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{DaoError, MockTransaction, Transaction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttendanceStatusEntity {
    Present,
    Late,
    /// Recorded by administrative backfill, never by a check-in.
    Unexcused,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttendanceEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Calendar day in the organization timezone.
    pub date: Date,
    pub check_in: Option<OffsetDateTime>,
    pub check_out: Option<OffsetDateTime>,
    pub status: AttendanceStatusEntity,
    pub early_leave: Option<bool>,
    pub late_minutes: u32,
    /// Decimal hours with four decimal places, as last persisted.
    pub worked_hours: f64,
    pub schedule_id: Uuid,
    pub created: OffsetDateTime,
    pub deleted: Option<OffsetDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait AttendanceDao {
    type Transaction: Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AttendanceEntity>, DaoError>;
    async fn find_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: Date,
        tx: Self::Transaction,
    ) -> Result<Option<AttendanceEntity>, DaoError>;
    async fn find_by_employee_in_span(
        &self,
        employee_id: Uuid,
        span: DateSpan,
        tx: Self::Transaction,
    ) -> Result<Arc<[AttendanceEntity]>, DaoError>;
    async fn find_in_span(
        &self,
        span: DateSpan,
        tx: Self::Transaction,
    ) -> Result<Arc<[AttendanceEntity]>, DaoError>;
    /// Fails with [`DaoError::UniqueViolation`] when a row for the same
    /// employee and date already exists.
    async fn create(
        &self,
        entity: &AttendanceEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &AttendanceEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
