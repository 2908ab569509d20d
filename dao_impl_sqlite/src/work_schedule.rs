use std::sync::Arc;

use async_trait::async_trait;
use dao::work_schedule::{WorkScheduleDao, WorkScheduleEntity};
use dao::DaoError;
use uuid::Uuid;

use crate::{
    format_instant, parse_instant, parse_time_of_day, parse_uuid, ResultDbErrorExt,
    TransactionImpl,
};

#[derive(Debug, sqlx::FromRow)]
struct WorkScheduleDb {
    id: String,
    name: String,
    start_of_work: String,
    late_threshold: String,
    end_of_work: String,
    created: String,
    deleted: Option<String>,
    update_version: String,
}

impl TryFrom<&WorkScheduleDb> for WorkScheduleEntity {
    type Error = DaoError;
    fn try_from(row: &WorkScheduleDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            name: row.name.as_str().into(),
            start_of_work: parse_time_of_day(&row.start_of_work)?,
            late_threshold: parse_time_of_day(&row.late_threshold)?,
            end_of_work: parse_time_of_day(&row.end_of_work)?,
            created: parse_instant(&row.created)?,
            deleted: row.deleted.as_deref().map(parse_instant).transpose()?,
            version: parse_uuid(&row.update_version)?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, start_of_work, late_threshold, end_of_work, \
     created, deleted, update_version FROM work_schedule";

pub struct WorkScheduleDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl WorkScheduleDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl WorkScheduleDao for WorkScheduleDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[WorkScheduleEntity]>, DaoError> {
        sqlx::query_as::<_, WorkScheduleDb>(&format!(
            "{SELECT_COLUMNS} WHERE deleted IS NULL ORDER BY created"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(WorkScheduleEntity::try_from)
        .collect()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<WorkScheduleEntity>, DaoError> {
        sqlx::query_as::<_, WorkScheduleDb>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(WorkScheduleEntity::try_from)
            .transpose()
    }

    async fn find_default(
        &self,
        tx: Self::Transaction,
    ) -> Result<Option<WorkScheduleEntity>, DaoError> {
        sqlx::query_as::<_, WorkScheduleDb>(&format!(
            "{SELECT_COLUMNS} WHERE deleted IS NULL ORDER BY created LIMIT 1"
        ))
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(WorkScheduleEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &WorkScheduleEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        sqlx::query(
            "INSERT INTO work_schedule (id, name, start_of_work, late_threshold, end_of_work, \
             created, deleted, update_version, update_process) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.id.to_string())
        .bind(entity.name.as_ref())
        .bind(entity.start_of_work.to_string())
        .bind(entity.late_threshold.to_string())
        .bind(entity.end_of_work.to_string())
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
        entity: &WorkScheduleEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        sqlx::query(
            "UPDATE work_schedule SET name = ?, start_of_work = ?, late_threshold = ?, \
             end_of_work = ?, deleted = ?, update_version = ?, update_process = ? WHERE id = ?",
        )
        .bind(entity.name.as_ref())
        .bind(entity.start_of_work.to_string())
        .bind(entity.late_threshold.to_string())
        .bind(entity.end_of_work.to_string())
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
