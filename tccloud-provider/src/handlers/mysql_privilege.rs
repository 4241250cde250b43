//! MySQL privilege lifecycle
//!
//! Addressed as `<mysql_id>#<account_name>#<database_name>`. An account with
//! no privileges on the database reads as absent; delete revokes everything.

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::ProviderResult;
use tccloud_core::resource::{Resource, State, Value};

use super::{Attributes, Lifecycle, required_str, split_identifier, string};
use crate::service::{MysqlService, is_not_found};
use crate::transport::Service;

const SHAPE: &str = "<mysql_id>#<account_name>#<database_name>";

pub fn attributes(
    mysql_id: &str,
    account: &str,
    database: &str,
    privileges: Vec<String>,
) -> Attributes {
    Attributes::from([
        ("mysql_id".to_string(), string(mysql_id)),
        ("account_name".to_string(), string(account)),
        ("database_name".to_string(), string(database)),
        ("privileges".to_string(), Value::string_list(privileges)),
    ])
}

pub struct MysqlPrivilegeHandler {
    service: MysqlService,
}

impl MysqlPrivilegeHandler {
    pub fn new(service: MysqlService) -> Self {
        Self { service }
    }

    async fn grant(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        account: &str,
        database: &str,
        privileges: &[String],
    ) -> ProviderResult<()> {
        let request_id = self
            .service
            .modify_account_privileges(ctx, mysql_id, account, database, privileges)
            .await?;
        self.service.wait_for_async_request(ctx, &request_id).await
    }

    async fn fetch(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        account: &str,
        database: &str,
    ) -> ProviderResult<Option<Vec<String>>> {
        if self.service.describe_account(ctx, mysql_id, account).await?.is_none() {
            return Ok(None);
        }
        let privileges = self
            .service
            .describe_account_privileges(ctx, mysql_id, account, database)
            .await?;
        Ok((!privileges.is_empty()).then_some(privileges))
    }
}

#[async_trait]
impl Lifecycle for MysqlPrivilegeHandler {
    fn resource_type(&self) -> &'static str {
        "mysql_privilege"
    }

    async fn create(&self, ctx: &RequestContext, resource: &Resource) -> ProviderResult<String> {
        let mysql_id = required_str(resource, "mysql_id")?;
        let account = required_str(resource, "account_name")?;
        let database = required_str(resource, "database_name")?;
        let privileges = resource.get_string_list("privileges").unwrap_or_default();

        self.grant(ctx, mysql_id, account, database, &privileges).await?;
        Ok(format!("{}#{}#{}", mysql_id, account, database))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> ProviderResult<Option<Attributes>> {
        let [mysql_id, account, database] = split_identifier::<3>(identifier, SHAPE)?;
        match self.fetch(ctx, mysql_id, account, database).await {
            Ok(privileges) => {
                Ok(privileges.map(|p| attributes(mysql_id, account, database, p)))
            }
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
        let [mysql_id, account, database] = split_identifier::<3>(identifier, SHAPE)?;
        let privileges = to.get_string_list("privileges").unwrap_or_default();
        self.grant(ctx, mysql_id, account, database, &privileges).await
    }

    async fn delete(&self, ctx: &RequestContext, identifier: &str) -> ProviderResult<()> {
        let [mysql_id, account, database] = split_identifier::<3>(identifier, SHAPE)?;
        if self.read(ctx, identifier).await?.is_none() {
            return Ok(());
        }
        match self.grant(ctx, mysql_id, account, database, &[]).await {
            Err(e) if is_not_found(&e, Service::Cdb) => Ok(()),
            other => other,
        }
    }
}
