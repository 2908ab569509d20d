use std::sync::Arc;

use async_trait::async_trait;
use dao::employee::EmployeeDao;
use dao::TransactionDao;
use service::employee::{Employee, EmployeeService};
use service::permission::{Authentication, ADMIN_PRIVILEGE, STAFF_PRIVILEGE};
use service::{PermissionService, ServiceError};
use uuid::Uuid;

use crate::permission::check_self_or_admin;

pub trait EmployeeServiceDeps {
    type Context: Clone + PartialEq + Eq + std::fmt::Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;
    type EmployeeDao: EmployeeDao<Transaction = Self::Transaction> + Send + Sync;
    type PermissionService: PermissionService<Context = Self::Context> + Send + Sync;
    type TransactionDao: TransactionDao<Transaction = Self::Transaction> + Send + Sync;
}

pub struct EmployeeServiceImpl<Deps: EmployeeServiceDeps> {
    pub employee_dao: Arc<Deps::EmployeeDao>,
    pub permission_service: Arc<Deps::PermissionService>,
    pub transaction_dao: Arc<Deps::TransactionDao>,
}

#[async_trait]
impl<Deps: EmployeeServiceDeps> EmployeeService for EmployeeServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Employee]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context)
            .await?;
        let employees = self
            .employee_dao
            .all(tx.clone())
            .await?
            .iter()
            .filter(|employee| employee.deleted.is_none())
            .map(Employee::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(employees)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        check_self_or_admin(self.permission_service.as_ref(), id, context).await?;
        let employee = self
            .employee_dao
            .find_by_id(id, tx.clone())
            .await?
            .filter(|employee| employee.deleted.is_none())
            .as_ref()
            .map(Employee::from)
            .ok_or(ServiceError::EmployeeNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(employee)
    }

    async fn exists(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<bool, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(STAFF_PRIVILEGE, context)
            .await?;
        let found = self
            .employee_dao
            .find_by_id(id, tx.clone())
            .await?
            .is_some_and(|employee| employee.deleted.is_none());
        self.transaction_dao.commit(tx).await?;
        Ok(found)
    }
}
