use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// IANA name of the organization timezone all wall-clock interpretation
    /// uses, e.g. `Asia/Jakarta`.
    pub timezone: Arc<str>,
}

#[automock]
#[async_trait]
pub trait ConfigService {
    async fn get_config(&self) -> Result<Config, ServiceError>;
}
