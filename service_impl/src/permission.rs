use std::sync::Arc;

use async_trait::async_trait;
use dao::employee::{EmployeeDao, RoleEntity};
use dao::TransactionDao;
use service::permission::{Authentication, ADMIN_PRIVILEGE, STAFF_PRIVILEGE};
use service::{PermissionService, ServiceError};
use tokio::join;
use uuid::Uuid;

pub trait EmployeePermissionServiceDeps {
    type Transaction: dao::Transaction + 'static;
    type EmployeeDao: EmployeeDao<Transaction = Self::Transaction> + Send + Sync;
    type TransactionDao: TransactionDao<Transaction = Self::Transaction> + Send + Sync;
}

/// Derives privileges from the employee record itself: administrators hold
/// `admin` and `staff`, every other live employee holds `staff`. The context
/// carries the calling employee's id.
pub struct EmployeePermissionServiceImpl<Deps: EmployeePermissionServiceDeps> {
    pub employee_dao: Arc<Deps::EmployeeDao>,
    pub transaction_dao: Arc<Deps::TransactionDao>,
}

#[async_trait]
impl<Deps: EmployeePermissionServiceDeps> PermissionService
    for EmployeePermissionServiceImpl<Deps>
{
    type Context = Uuid;

    async fn check_permission(
        &self,
        privilege: &str,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        let employee_id = match context {
            Authentication::Full => return Ok(()),
            Authentication::Context(employee_id) => employee_id,
        };
        let tx = self.transaction_dao.use_transaction(None).await?;
        let employee = self.employee_dao.find_by_id(employee_id, tx.clone()).await?;
        self.transaction_dao.commit(tx).await?;

        let Some(employee) = employee.filter(|employee| employee.deleted.is_none()) else {
            return Err(ServiceError::Forbidden);
        };
        let granted = match privilege {
            ADMIN_PRIVILEGE => employee.role == RoleEntity::Admin,
            STAFF_PRIVILEGE => true,
            _ => false,
        };
        if granted {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    async fn current_employee_id(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Uuid>, ServiceError> {
        Ok(match context {
            Authentication::Full => None,
            Authentication::Context(employee_id) => Some(employee_id),
        })
    }
}

/// Write-path authorization rule: the acting employee themselves, or an
/// administrator.
pub async fn check_self_or_admin<PermissionService>(
    permission_service: &PermissionService,
    employee_id: Uuid,
    context: Authentication<PermissionService::Context>,
) -> Result<(), ServiceError>
where
    PermissionService: service::PermissionService + Send + Sync,
{
    if matches!(context, Authentication::Full) {
        return Ok(());
    }
    let (admin, staff) = join!(
        permission_service.check_permission(ADMIN_PRIVILEGE, context.clone()),
        permission_service.check_permission(STAFF_PRIVILEGE, context.clone()),
    );
    let caller = permission_service.current_employee_id(context).await?;
    let is_self = if caller == Some(employee_id) {
        staff
    } else {
        Err(ServiceError::Forbidden)
    };
    admin.or(is_self)
}
