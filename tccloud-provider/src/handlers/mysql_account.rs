//! MySQL account lifecycle
//!
//! Accounts are addressed as `<mysql_id>#<name>` and always bound to host
//! `%`. Every mutation is asynchronous and is awaited before returning. The
//! password is never readable and is carried over from the desired state by
//! the provider.

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::ProviderResult;
use tccloud_core::resource::{Resource, State, Value};

use super::{Attributes, Lifecycle, required_str, split_identifier, string};
use crate::schemas::mysql::DEFAULT_ACCOUNT_DESCRIPTION;
use crate::service::mysql::AccountInfo;
use crate::service::{MysqlService, is_not_found};
use crate::transport::Service;

const SHAPE: &str = "<mysql_id>#<name>";

pub fn identifier(mysql_id: &str, name: &str) -> String {
    format!("{}#{}", mysql_id, name)
}

pub fn attributes(mysql_id: &str, account: &AccountInfo) -> Attributes {
    Attributes::from([
        ("mysql_id".to_string(), string(mysql_id)),
        ("name".to_string(), string(&account.user)),
        ("description".to_string(), string(&account.notes)),
    ])
}

pub struct MysqlAccountHandler {
    service: MysqlService,
}

impl MysqlAccountHandler {
    pub fn new(service: MysqlService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Lifecycle for MysqlAccountHandler {
    fn resource_type(&self) -> &'static str {
        "mysql_account"
    }

    async fn create(&self, ctx: &RequestContext, resource: &Resource) -> ProviderResult<String> {
        let mysql_id = required_str(resource, "mysql_id")?;
        let name = required_str(resource, "name")?;
        let password = required_str(resource, "password")?;
        let description = resource
            .get_string("description")
            .unwrap_or(DEFAULT_ACCOUNT_DESCRIPTION);

        let request_id = self
            .service
            .create_account(ctx, mysql_id, name, password, description)
            .await?;
        self.service.wait_for_async_request(ctx, &request_id).await?;
        Ok(identifier(mysql_id, name))
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> ProviderResult<Option<Attributes>> {
        let [mysql_id, name] = split_identifier::<2>(identifier, SHAPE)?;
        match self.service.describe_account(ctx, mysql_id, name).await {
            Ok(account) => Ok(account.map(|a| attributes(mysql_id, &a))),
            Err(e) if is_not_found(&e, Service::Cdb) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<()> {
        let [mysql_id, name] = split_identifier::<2>(identifier, SHAPE)?;

        let password = required_str(to, "password")?;
        if from.get("password").and_then(Value::as_str) != Some(password) {
            let request_id = self
                .service
                .modify_account_password(ctx, mysql_id, name, password)
                .await?;
            self.service.wait_for_async_request(ctx, &request_id).await?;
        }

        let description = to
            .get_string("description")
            .unwrap_or(DEFAULT_ACCOUNT_DESCRIPTION);
        if from.get("description").and_then(Value::as_str) != Some(description) {
            let request_id = self
                .service
                .modify_account_description(ctx, mysql_id, name, description)
                .await?;
            self.service.wait_for_async_request(ctx, &request_id).await?;
        }

        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, identifier: &str) -> ProviderResult<()> {
        let [mysql_id, name] = split_identifier::<2>(identifier, SHAPE)?;
        if self.read(ctx, identifier).await?.is_none() {
            return Ok(());
        }
        match self.service.delete_account(ctx, mysql_id, name).await {
            Ok(request_id) => self.service.wait_for_async_request(ctx, &request_id).await,
            Err(e) if is_not_found(&e, Service::Cdb) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::async_request::PollSettings;
    use crate::service::ApiClient;
    use crate::transport::scripted::ScriptedTransport;
    use std::sync::Arc;
    use std::time::Duration;
    use tccloud_core::resource::ResourceId;

    fn handler(transport: ScriptedTransport) -> (Arc<ScriptedTransport>, MysqlAccountHandler) {
        let transport = Arc::new(transport);
        let poll = PollSettings {
            max_attempts: 3,
            interval: Duration::ZERO,
        };
        let service = MysqlService::new(ApiClient::new(transport.clone()), 100, poll);
        (transport, MysqlAccountHandler::new(service))
    }

    fn accounts(notes: &str) -> serde_json::Value {
        serde_json::json!({
            "TotalCount": 1,
            "Items": [{ "User": "app", "Host": "%", "Notes": notes }]
        })
    }

    #[tokio::test]
    async fn only_changed_fields_are_sent() {
        let (transport, handler) = handler(
            ScriptedTransport::new()
                .respond("ModifyAccountDescription", serde_json::json!({ "AsyncRequestId": "r-1" }))
                .respond(
                    "DescribeAsyncRequestInfo",
                    serde_json::json!({ "Status": "SUCCESS", "Info": "" }),
                ),
        );
        let from = State::existing(
            ResourceId::new("mysql_account", "app"),
            Attributes::from([
                ("password".to_string(), Value::from("s3cret-pass")),
                ("description".to_string(), Value::from("--")),
            ]),
        );
        let to = Resource::new("mysql_account", "app")
            .with_attribute("mysql_id", "cdb-1")
            .with_attribute("name", "app")
            .with_attribute("password", "s3cret-pass")
            .with_attribute("description", "reporting");

        handler
            .update(&RequestContext::new(), "cdb-1#app", &from, &to)
            .await
            .unwrap();
        assert_eq!(
            transport.actions(),
            vec!["ModifyAccountDescription", "DescribeAsyncRequestInfo"]
        );
    }

    #[tokio::test]
    async fn missing_instance_reads_as_absent() {
        let (_, handler) = handler(ScriptedTransport::new().fail(
            "DescribeAccounts",
            "InvalidParameter.InstanceNotFound",
            "instance cdb-1 not found",
        ));
        let attrs = handler.read(&RequestContext::new(), "cdb-1#app").await.unwrap();
        assert!(attrs.is_none());
    }

    #[tokio::test]
    async fn delete_skips_absent_account() {
        let (transport, handler) = handler(ScriptedTransport::new().respond(
            "DescribeAccounts",
            serde_json::json!({ "TotalCount": 0, "Items": [] }),
        ));
        handler.delete(&RequestContext::new(), "cdb-1#app").await.unwrap();
        assert_eq!(transport.actions(), vec!["DescribeAccounts"]);
    }

    #[tokio::test]
    async fn read_maps_notes() {
        let (_, handler) =
            handler(ScriptedTransport::new().respond("DescribeAccounts", accounts("billing")));
        let attrs = handler
            .read(&RequestContext::new(), "cdb-1#app")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(attrs["description"], Value::from("billing"));
        assert_eq!(attrs["mysql_id"], Value::from("cdb-1"));
        assert!(!attrs.contains_key("password"));
    }
}
