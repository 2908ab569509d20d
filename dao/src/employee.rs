use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::TimeOfDay;
use mockall::automock;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{DaoError, MockTransaction, Transaction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleEntity {
    Admin,
    Staff,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub role: RoleEntity,
    /// Overrides the assigned schedule's start of work when set.
    pub custom_start_of_work: Option<TimeOfDay>,
    /// Overrides the assigned schedule's end of work when set.
    pub custom_end_of_work: Option<TimeOfDay>,
    pub schedule_id: Option<Uuid>,
    pub created: OffsetDateTime,
    pub deleted: Option<OffsetDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait EmployeeDao {
    type Transaction: Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[EmployeeEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError>;
}
