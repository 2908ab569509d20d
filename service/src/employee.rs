use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use attendance_utils::{derive_from_reference, TimeOfDay};
use dao::employee::{EmployeeEntity, RoleEntity};
use mockall::automock;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Staff,
}

impl From<&RoleEntity> for Role {
    fn from(role: &RoleEntity) -> Self {
        match role {
            RoleEntity::Admin => Self::Admin,
            RoleEntity::Staff => Self::Staff,
        }
    }
}
impl From<&Role> for RoleEntity {
    fn from(role: &Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Staff => Self::Staff,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub name: Arc<str>,
    pub role: Role,
    pub custom_start_of_work: Option<TimeOfDay>,
    pub custom_end_of_work: Option<TimeOfDay>,
    pub schedule_id: Option<Uuid>,
    pub created: Option<OffsetDateTime>,
    pub deleted: Option<OffsetDateTime>,
    pub version: Uuid,
}

impl From<&EmployeeEntity> for Employee {
    fn from(employee: &EmployeeEntity) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            role: (&employee.role).into(),
            custom_start_of_work: employee.custom_start_of_work,
            custom_end_of_work: employee.custom_end_of_work,
            schedule_id: employee.schedule_id,
            created: Some(employee.created),
            deleted: employee.deleted,
            version: employee.version,
        }
    }
}
derive_from_reference!(EmployeeEntity, Employee);

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait EmployeeService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Employee]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError>;
    async fn exists(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<bool, ServiceError>;
}
