use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::TimeOfDay;
use dao::{DaoError, Transaction};
use time::format_description::well_known::Iso8601;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use uuid::Uuid;

pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod work_schedule;

pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: std::error::Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))
    }
}

pub(crate) fn map_insert_error(err: sqlx::Error) -> DaoError {
    if err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
    {
        DaoError::UniqueViolation
    } else {
        DaoError::DatabaseQueryError(Box::new(err))
    }
}

pub(crate) fn parse_uuid(text: &str) -> Result<Uuid, DaoError> {
    Uuid::parse_str(text).map_err(|_| DaoError::InvalidValue(text.into()))
}

pub(crate) fn parse_instant(text: &str) -> Result<OffsetDateTime, DaoError> {
    Ok(OffsetDateTime::parse(text, &Iso8601::DEFAULT)?)
}

pub(crate) fn format_instant(instant: OffsetDateTime) -> Result<String, DaoError> {
    instant.format(&Iso8601::DEFAULT).map_db_error()
}

pub(crate) fn parse_date(text: &str) -> Result<Date, DaoError> {
    Ok(Date::parse(text, DATE_FORMAT)?)
}

pub(crate) fn format_date(date: Date) -> Result<String, DaoError> {
    date.format(DATE_FORMAT).map_db_error()
}

pub(crate) fn parse_time_of_day(text: &str) -> Result<TimeOfDay, DaoError> {
    Ok(TimeOfDay::parse(text)?)
}

/// Stored worked-hours values arrive in two shapes: a decimal-hours string
/// written by this adapter, or legacy `HH:MM:SS` text imported from older
/// records. Both normalize to decimal hours here so core logic never parses
/// ambiguous formats itself.
pub(crate) fn parse_worked_hours(text: &str) -> Result<f64, DaoError> {
    if text.contains(':') {
        let mut parts = text.split(':');
        let hours: u64 = parts
            .next()
            .and_then(|part| part.parse().ok())
            .ok_or_else(|| DaoError::InvalidValue(text.into()))?;
        let minutes: u64 = parts
            .next()
            .and_then(|part| part.parse().ok())
            .ok_or_else(|| DaoError::InvalidValue(text.into()))?;
        let seconds: u64 = match parts.next() {
            Some(part) => part
                .parse()
                .map_err(|_| DaoError::InvalidValue(text.into()))?,
            None => 0,
        };
        Ok(attendance_utils::hours_from_seconds(
            hours * 3600 + minutes * 60 + seconds,
        ))
    } else {
        let hours: f64 = text
            .parse()
            .map_err(|_| DaoError::InvalidValue(text.into()))?;
        Ok(attendance_utils::round_hours(hours.max(0.0)))
    }
}

pub(crate) fn format_worked_hours(hours: f64) -> String {
    format!("{:.4}", hours)
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    pub(crate) tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<sqlx::SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        }
        Ok(())
    }
}
