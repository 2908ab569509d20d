use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::DateSpan;
use dao::leave_request::{ApprovalStatusEntity, LeaveRequestDao, LeaveRequestEntity};
use dao::DaoError;
use uuid::Uuid;

use crate::{
    format_date, format_instant, parse_date, parse_instant, parse_uuid, ResultDbErrorExt,
    TransactionImpl,
};

#[derive(Debug, sqlx::FromRow)]
struct LeaveRequestDb {
    id: String,
    employee_id: String,
    start_date: String,
    end_date: String,
    reason: String,
    document_path: Option<String>,
    approval: String,
    created: String,
    deleted: Option<String>,
    update_version: String,
}

impl TryFrom<&LeaveRequestDb> for LeaveRequestEntity {
    type Error = DaoError;
    fn try_from(row: &LeaveRequestDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            employee_id: parse_uuid(&row.employee_id)?,
            start_date: parse_date(&row.start_date)?,
            end_date: parse_date(&row.end_date)?,
            reason: row.reason.as_str().into(),
            document_path: row
                .document_path
                .as_deref()
                .map(|document_path| document_path.into()),
            approval: approval_from_db(&row.approval)?,
            created: parse_instant(&row.created)?,
            deleted: row.deleted.as_deref().map(parse_instant).transpose()?,
            version: parse_uuid(&row.update_version)?,
        })
    }
}

fn approval_from_db(text: &str) -> Result<ApprovalStatusEntity, DaoError> {
    match text {
        "pending" => Ok(ApprovalStatusEntity::Pending),
        "approved" => Ok(ApprovalStatusEntity::Approved),
        "rejected" => Ok(ApprovalStatusEntity::Rejected),
        _ => Err(DaoError::InvalidValue(text.into())),
    }
}

fn approval_to_db(approval: &ApprovalStatusEntity) -> &'static str {
    match approval {
        ApprovalStatusEntity::Pending => "pending",
        ApprovalStatusEntity::Approved => "approved",
        ApprovalStatusEntity::Rejected => "rejected",
    }
}

const SELECT_COLUMNS: &str = "SELECT id, employee_id, start_date, end_date, reason, \
     document_path, approval, created, deleted, update_version FROM leave_request";

pub struct LeaveRequestDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl LeaveRequestDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl LeaveRequestDao for LeaveRequestDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<LeaveRequestEntity>, DaoError> {
        sqlx::query_as::<_, LeaveRequestDb>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(LeaveRequestEntity::try_from)
            .transpose()
    }

    async fn find_by_employee_id(
        &self,
        employee_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError> {
        sqlx::query_as::<_, LeaveRequestDb>(&format!(
            "{SELECT_COLUMNS} WHERE employee_id = ? AND deleted IS NULL ORDER BY start_date DESC"
        ))
        .bind(employee_id.to_string())
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(LeaveRequestEntity::try_from)
        .collect()
    }

    async fn find_overlapping_span(
        &self,
        span: DateSpan,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError> {
        sqlx::query_as::<_, LeaveRequestDb>(&format!(
            "{SELECT_COLUMNS} WHERE start_date <= ? AND end_date >= ? AND deleted IS NULL \
             ORDER BY start_date DESC"
        ))
        .bind(format_date(span.end())?)
        .bind(format_date(span.start())?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(LeaveRequestEntity::try_from)
        .collect()
    }

    async fn find_by_employee_overlapping_span(
        &self,
        employee_id: Uuid,
        span: DateSpan,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError> {
        sqlx::query_as::<_, LeaveRequestDb>(&format!(
            "{SELECT_COLUMNS} WHERE employee_id = ? AND start_date <= ? AND end_date >= ? \
             AND deleted IS NULL ORDER BY start_date DESC"
        ))
        .bind(employee_id.to_string())
        .bind(format_date(span.end())?)
        .bind(format_date(span.start())?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(LeaveRequestEntity::try_from)
        .collect()
    }

    async fn create(
        &self,
        entity: &LeaveRequestEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        sqlx::query(
            "INSERT INTO leave_request (id, employee_id, start_date, end_date, reason, \
             document_path, approval, created, deleted, update_version, update_process) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.to_string())
        .bind(entity.employee_id.to_string())
        .bind(format_date(entity.start_date)?)
        .bind(format_date(entity.end_date)?)
        .bind(entity.reason.as_ref())
        .bind(entity.document_path.as_deref())
        .bind(approval_to_db(&entity.approval))
        .bind(format_instant(entity.created)?)
        .bind(entity.deleted.map(format_instant).transpose()?)
        .bind(entity.version.to_string())
        .bind(process.to_string())
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &LeaveRequestEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        sqlx::query(
            "UPDATE leave_request SET start_date = ?, end_date = ?, reason = ?, \
             document_path = ?, approval = ?, deleted = ?, update_version = ?, \
             update_process = ? WHERE id = ?",
        )
        .bind(format_date(entity.start_date)?)
        .bind(format_date(entity.end_date)?)
        .bind(entity.reason.as_ref())
        .bind(entity.document_path.as_deref())
        .bind(approval_to_db(&entity.approval))
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
