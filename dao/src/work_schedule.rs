use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::TimeOfDay;
use mockall::automock;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{DaoError, MockTransaction, Transaction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkScheduleEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub start_of_work: TimeOfDay,
    pub late_threshold: TimeOfDay,
    pub end_of_work: TimeOfDay,
    pub created: OffsetDateTime,
    pub deleted: Option<OffsetDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait WorkScheduleDao {
    type Transaction: Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[WorkScheduleEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<WorkScheduleEntity>, DaoError>;
    /// Oldest live schedule; used when an employee has no assigned one.
    async fn find_default(
        &self,
        tx: Self::Transaction,
    ) -> Result<Option<WorkScheduleEntity>, DaoError>;
    async fn create(
        &self,
        entity: &WorkScheduleEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &WorkScheduleEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
