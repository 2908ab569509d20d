use std::{env, sync::Arc};

use async_trait::async_trait;
use service::{
    config::{Config, ConfigService},
    ServiceError,
};

pub struct ConfigServiceImpl;

#[async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn get_config(&self) -> Result<Config, ServiceError> {
        let timezone = env::var("TIMEZONE").unwrap_or("Asia/Jakarta".to_string());

        Ok(Config {
            timezone: Arc::from(timezone),
        })
    }
}
