use std::sync::Arc;

use async_trait::async_trait;
use dao::employee::{EmployeeDao, EmployeeEntity, RoleEntity};
use dao::DaoError;
use uuid::Uuid;

use crate::{parse_instant, parse_time_of_day, parse_uuid, ResultDbErrorExt, TransactionImpl};

#[derive(Debug, sqlx::FromRow)]
struct EmployeeDb {
    id: String,
    name: String,
    role: String,
    custom_start_of_work: Option<String>,
    custom_end_of_work: Option<String>,
    schedule_id: Option<String>,
    created: String,
    deleted: Option<String>,
    update_version: String,
}

impl TryFrom<&EmployeeDb> for EmployeeEntity {
    type Error = DaoError;
    fn try_from(row: &EmployeeDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            name: row.name.as_str().into(),
            role: role_from_db(&row.role)?,
            custom_start_of_work: row
                .custom_start_of_work
                .as_deref()
                .map(parse_time_of_day)
                .transpose()?,
            custom_end_of_work: row
                .custom_end_of_work
                .as_deref()
                .map(parse_time_of_day)
                .transpose()?,
            schedule_id: row.schedule_id.as_deref().map(parse_uuid).transpose()?,
            created: parse_instant(&row.created)?,
            deleted: row.deleted.as_deref().map(parse_instant).transpose()?,
            version: parse_uuid(&row.update_version)?,
        })
    }
}

fn role_from_db(text: &str) -> Result<RoleEntity, DaoError> {
    match text {
        "admin" => Ok(RoleEntity::Admin),
        "staff" => Ok(RoleEntity::Staff),
        _ => Err(DaoError::InvalidValue(text.into())),
    }
}

const SELECT_COLUMNS: &str = "SELECT id, name, role, custom_start_of_work, custom_end_of_work, \
     schedule_id, created, deleted, update_version FROM employee";

pub struct EmployeeDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl EmployeeDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl EmployeeDao for EmployeeDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[EmployeeEntity]>, DaoError> {
        sqlx::query_as::<_, EmployeeDb>(&format!(
            "{SELECT_COLUMNS} WHERE deleted IS NULL ORDER BY name"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(EmployeeEntity::try_from)
        .collect()
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError> {
        sqlx::query_as::<_, EmployeeDb>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(EmployeeEntity::try_from)
            .transpose()
    }
}
