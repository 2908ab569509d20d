use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::DateSpan;
use dao::attendance::{AttendanceDao, AttendanceEntity, AttendanceStatusEntity};
use dao::DaoError;
use time::Date;
use uuid::Uuid;

use crate::{
    format_date, format_instant, format_worked_hours, map_insert_error, parse_date, parse_instant,
    parse_uuid, parse_worked_hours, ResultDbErrorExt, TransactionImpl,
};

#[derive(Debug, sqlx::FromRow)]
struct AttendanceDb {
    id: String,
    employee_id: String,
    date: String,
    check_in: Option<String>,
    check_out: Option<String>,
    status: String,
    early_leave: Option<i64>,
    late_minutes: i64,
    worked_hours: String,
    schedule_id: String,
    created: String,
    deleted: Option<String>,
    update_version: String,
}

impl TryFrom<&AttendanceDb> for AttendanceEntity {
    type Error = DaoError;
    fn try_from(row: &AttendanceDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            employee_id: parse_uuid(&row.employee_id)?,
            date: parse_date(&row.date)?,
            check_in: row.check_in.as_deref().map(parse_instant).transpose()?,
            check_out: row.check_out.as_deref().map(parse_instant).transpose()?,
            status: status_from_db(&row.status)?,
            early_leave: row.early_leave.map(|flag| flag != 0),
            late_minutes: row.late_minutes.max(0) as u32,
            worked_hours: parse_worked_hours(&row.worked_hours)?,
            schedule_id: parse_uuid(&row.schedule_id)?,
            created: parse_instant(&row.created)?,
            deleted: row.deleted.as_deref().map(parse_instant).transpose()?,
            version: parse_uuid(&row.update_version)?,
        })
    }
}

fn status_from_db(text: &str) -> Result<AttendanceStatusEntity, DaoError> {
    match text {
        "present" => Ok(AttendanceStatusEntity::Present),
        "late" => Ok(AttendanceStatusEntity::Late),
        "unexcused" => Ok(AttendanceStatusEntity::Unexcused),
        _ => Err(DaoError::InvalidValue(text.into())),
    }
}

fn status_to_db(status: &AttendanceStatusEntity) -> &'static str {
    match status {
        AttendanceStatusEntity::Present => "present",
        AttendanceStatusEntity::Late => "late",
        AttendanceStatusEntity::Unexcused => "unexcused",
    }
}

const SELECT_COLUMNS: &str = "SELECT id, employee_id, date, check_in, check_out, status, \
     early_leave, late_minutes, worked_hours, schedule_id, created, deleted, update_version \
     FROM attendance";

pub struct AttendanceDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl AttendanceDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl AttendanceDao for AttendanceDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<AttendanceEntity>, DaoError> {
        sqlx::query_as::<_, AttendanceDb>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(AttendanceEntity::try_from)
            .transpose()
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: Uuid,
        date: Date,
        tx: Self::Transaction,
    ) -> Result<Option<AttendanceEntity>, DaoError> {
        sqlx::query_as::<_, AttendanceDb>(&format!(
            "{SELECT_COLUMNS} WHERE employee_id = ? AND date = ? AND deleted IS NULL"
        ))
        .bind(employee_id.to_string())
        .bind(format_date(date)?)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(AttendanceEntity::try_from)
        .transpose()
    }

    async fn find_by_employee_in_span(
        &self,
        employee_id: Uuid,
        span: DateSpan,
        tx: Self::Transaction,
    ) -> Result<Arc<[AttendanceEntity]>, DaoError> {
        sqlx::query_as::<_, AttendanceDb>(&format!(
            "{SELECT_COLUMNS} WHERE employee_id = ? AND date >= ? AND date <= ? \
             AND deleted IS NULL ORDER BY date DESC"
        ))
        .bind(employee_id.to_string())
        .bind(format_date(span.start())?)
        .bind(format_date(span.end())?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AttendanceEntity::try_from)
        .collect()
    }

    async fn find_in_span(
        &self,
        span: DateSpan,
        tx: Self::Transaction,
    ) -> Result<Arc<[AttendanceEntity]>, DaoError> {
        sqlx::query_as::<_, AttendanceDb>(&format!(
            "{SELECT_COLUMNS} WHERE date >= ? AND date <= ? AND deleted IS NULL \
             ORDER BY date DESC"
        ))
        .bind(format_date(span.start())?)
        .bind(format_date(span.end())?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AttendanceEntity::try_from)
        .collect()
    }

    async fn create(
        &self,
        entity: &AttendanceEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        sqlx::query(
            "INSERT INTO attendance (id, employee_id, date, check_in, check_out, status, \
             early_leave, late_minutes, worked_hours, schedule_id, created, deleted, \
             update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.to_string())
        .bind(entity.employee_id.to_string())
        .bind(format_date(entity.date)?)
        .bind(entity.check_in.map(format_instant).transpose()?)
        .bind(entity.check_out.map(format_instant).transpose()?)
        .bind(status_to_db(&entity.status))
        .bind(entity.early_leave.map(i64::from))
        .bind(entity.late_minutes as i64)
        .bind(format_worked_hours(entity.worked_hours))
        .bind(entity.schedule_id.to_string())
        .bind(format_instant(entity.created)?)
        .bind(entity.deleted.map(format_instant).transpose()?)
        .bind(entity.version.to_string())
        .bind(process.to_string())
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_err(map_insert_error)?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &AttendanceEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        sqlx::query(
            "UPDATE attendance SET check_in = ?, check_out = ?, status = ?, early_leave = ?, \
             late_minutes = ?, worked_hours = ?, deleted = ?, update_version = ?, \
             update_process = ? WHERE id = ?",
        )
        .bind(entity.check_in.map(format_instant).transpose()?)
        .bind(entity.check_out.map(format_instant).transpose()?)
        .bind(status_to_db(&entity.status))
        .bind(entity.early_leave.map(i64::from))
        .bind(entity.late_minutes as i64)
        .bind(format_worked_hours(entity.worked_hours))
        .bind(entity.deleted.map(format_instant).transpose()?)
        .bind(entity.version.to_string())
        .bind(process.to_string())
        .bind(entity.id.to_string())
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}
