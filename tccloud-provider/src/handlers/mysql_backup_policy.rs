//! MySQL backup policy lifecycle
//!
//! The policy always exists while the instance does. Create and update
//! overwrite it; delete puts the defaults back.

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::ProviderResult;
use tccloud_core::resource::{Resource, State, Value};

use super::{Attributes, Lifecycle, required_str, string};
use crate::schemas::mysql::{DEFAULT_BACKUP_MODEL, DEFAULT_BACKUP_TIME, DEFAULT_RETENTION_PERIOD};
use crate::service::mysql::BackupConfig;
use crate::service::{MysqlService, ignore_not_found, is_not_found};
use crate::transport::Service;

pub fn attributes(mysql_id: &str, config: &BackupConfig) -> Attributes {
    Attributes::from([
        ("mysql_id".to_string(), string(mysql_id)),
        ("retention_period".to_string(), Value::Int(config.backup_expire_days)),
        ("backup_model".to_string(), string(&config.backup_method)),
        ("backup_time".to_string(), Value::String(config.backup_time())),
        ("binlog_period".to_string(), Value::Int(config.binlog_expire_days)),
    ])
}

pub struct MysqlBackupPolicyHandler {
    service: MysqlService,
}

impl MysqlBackupPolicyHandler {
    pub fn new(service: MysqlService) -> Self {
        Self { service }
    }

    async fn apply(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        resource: &Resource,
    ) -> ProviderResult<()> {
        let retention_period = resource
            .get_int("retention_period")
            .unwrap_or(DEFAULT_RETENTION_PERIOD);
        let backup_model = resource.get_string("backup_model").unwrap_or(DEFAULT_BACKUP_MODEL);
        let backup_time = resource.get_string("backup_time").unwrap_or(DEFAULT_BACKUP_TIME);
        self.service
            .modify_backup_config(ctx, mysql_id, retention_period, backup_model, backup_time)
            .await
    }
}

#[async_trait]
impl Lifecycle for MysqlBackupPolicyHandler {
    fn resource_type(&self) -> &'static str {
        "mysql_backup_policy"
    }

    async fn create(&self, ctx: &RequestContext, resource: &Resource) -> ProviderResult<String> {
        let mysql_id = required_str(resource, "mysql_id")?;
        self.apply(ctx, mysql_id, resource).await?;
        Ok(mysql_id.to_string())
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> ProviderResult<Option<Attributes>> {
        match self.service.describe_backup_config(ctx, identifier).await {
            Ok(config) => Ok(Some(attributes(identifier, &config))),
            Err(e) if is_not_found(&e, Service::Cdb) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> ProviderResult<()> {
        self.apply(ctx, identifier, to).await
    }

    async fn delete(&self, ctx: &RequestContext, identifier: &str) -> ProviderResult<()> {
        let restored = self
            .service
            .modify_backup_config(
                ctx,
                identifier,
                DEFAULT_RETENTION_PERIOD,
                DEFAULT_BACKUP_MODEL,
                DEFAULT_BACKUP_TIME,
            )
            .await;
        ignore_not_found(restored, Service::Cdb)
    }
}
