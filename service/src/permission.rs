use std::fmt::Debug;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

pub const ADMIN_PRIVILEGE: &str = "admin";
pub const STAFF_PRIVILEGE: &str = "staff";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication<Context: Clone + PartialEq + Eq + Send + Sync + Debug + 'static> {
    /// Internal caller, bypasses all checks.
    Full,
    Context(Context),
}

impl<Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static> From<Context>
    for Authentication<Context>
{
    fn from(context: Context) -> Self {
        Self::Context(context)
    }
}

#[automock(type Context=();)]
#[async_trait]
pub trait PermissionService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;

    async fn check_permission(
        &self,
        privilege: &str,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;

    /// Employee identity bound to the context; `None` for [`Authentication::Full`].
    async fn current_employee_id(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Uuid>, ServiceError>;
}
