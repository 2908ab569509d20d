use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod work_schedule;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// A uniqueness constraint rejected the write, e.g. a second attendance
    /// row for the same employee and day.
    #[error("Unique constraint violation")]
    UniqueViolation,

    #[error("Invalid stored value: {0}")]
    InvalidValue(Arc<str>),

    #[error("Invalid stored timestamp: {0}")]
    TimestampParseError(#[from] time::error::Parse),

    #[error("Invalid stored time of day: {0}")]
    TimeOfDayError(#[from] attendance_utils::TimeOfDayError),
}

/// Marker for a unit of work handed through dao calls. Implementations wrap
/// whatever the backing store uses for transactional consistency.
pub trait Transaction: Clone + Debug + Send + Sync {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction + 'static;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;
    async fn commit(&self, tx: Self::Transaction) -> Result<(), DaoError>;
}
