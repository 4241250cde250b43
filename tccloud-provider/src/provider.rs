//! Tencent Cloud provider implementation
//!
//! Orchestrates every resource operation: the desired attributes are given
//! their defaults and validated against the schema before any remote call,
//! mutations are followed by a read-back, and the read-back is completed
//! with zero values so every schema attribute is present in the state.

use std::collections::HashMap;
use std::sync::Arc;

use tccloud_core::context::RequestContext;
use tccloud_core::provider::{ProviderError, ProviderResult};
use tccloud_core::resource::{Resource, ResourceId, State};
use tccloud_core::schema::ResourceSchema;

use crate::async_request::PollSettings;
use crate::config::{ConfigError, ProviderConfig};
use crate::data_sources::{
    DataSource, MysqlBackupList, MysqlParameterList, MysqlZoneConfig, VpcInstances,
    VpcRouteTables, VpcSubnets,
};
use crate::handlers::mysql_account::MysqlAccountHandler;
use crate::handlers::mysql_backup_policy::MysqlBackupPolicyHandler;
use crate::handlers::mysql_privilege::MysqlPrivilegeHandler;
use crate::handlers::route_table::RouteTableHandler;
use crate::handlers::route_table_entry::RouteTableEntryHandler;
use crate::handlers::subnet::SubnetHandler;
use crate::handlers::vpc::VpcHandler;
use crate::handlers::{Attributes, Lifecycle};
use crate::http::HttpTransport;
use crate::schemas::schema_for;
use crate::service::{ApiClient, MysqlService, VpcService};
use crate::transport::Transport;

/// Tencent Cloud provider
pub struct TencentCloudProvider {
    config: ProviderConfig,
    vpc: VpcService,
    mysql: MysqlService,
    handlers: HashMap<&'static str, Box<dyn Lifecycle>>,
    data_sources: HashMap<&'static str, Box<dyn DataSource>>,
}

impl TencentCloudProvider {
    /// Create a provider that signs requests with the configured credentials
    pub fn new(config: ProviderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a provider over an arbitrary transport
    pub fn with_transport(config: ProviderConfig, transport: Arc<dyn Transport>) -> Self {
        let client = ApiClient::new(transport);
        let vpc = VpcService::new(client.clone(), config.page_size);
        let mysql = MysqlService::new(
            client,
            config.page_size,
            PollSettings::from(&config.async_poll),
        );

        let handlers: Vec<Box<dyn Lifecycle>> = vec![
            Box::new(VpcHandler::new(vpc.clone())),
            Box::new(SubnetHandler::new(vpc.clone())),
            Box::new(RouteTableHandler::new(vpc.clone())),
            Box::new(RouteTableEntryHandler::new(vpc.clone())),
            Box::new(MysqlAccountHandler::new(mysql.clone())),
            Box::new(MysqlPrivilegeHandler::new(mysql.clone())),
            Box::new(MysqlBackupPolicyHandler::new(mysql.clone())),
        ];
        let data_sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(VpcInstances::new(vpc.clone())),
            Box::new(VpcSubnets::new(vpc.clone())),
            Box::new(VpcRouteTables::new(vpc.clone())),
            Box::new(MysqlBackupList::new(mysql.clone())),
            Box::new(MysqlParameterList::new(mysql.clone())),
            Box::new(MysqlZoneConfig::new(mysql.clone(), config.region.clone())),
        ];

        Self {
            vpc,
            mysql,
            handlers: handlers.into_iter().map(|h| (h.resource_type(), h)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.resource_type(), d))
                .collect(),
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn vpc(&self) -> &VpcService {
        &self.vpc
    }

    pub fn mysql(&self) -> &MysqlService {
        &self.mysql
    }

    fn lifecycle(&self, id: &ResourceId) -> ProviderResult<(&dyn Lifecycle, ResourceSchema)> {
        let handler = self.handlers.get(id.resource_type.as_str()).ok_or_else(|| {
            ProviderError::unsupported(format!("Unknown resource type: {}", id.resource_type))
        })?;
        let schema = schema_for(&id.resource_type).ok_or_else(|| {
            ProviderError::unsupported(format!("No schema for {}", id.resource_type))
        })?;
        Ok((handler.as_ref(), schema))
    }

    /// Defaults, schema validation and cross-attribute rules, in that order
    fn prepare(schema: &ResourceSchema, resource: &Resource) -> ProviderResult<Resource> {
        let mut resource = resource.clone();
        schema.apply_defaults(&mut resource.attributes);
        schema.validate(&resource.attributes).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            ProviderError::validation(messages.join("; "))
        })?;
        Ok(resource)
    }

    async fn read_back(
        &self,
        ctx: &RequestContext,
        handler: &dyn Lifecycle,
        schema: &ResourceSchema,
        resource: &Resource,
        identifier: &str,
    ) -> ProviderResult<State> {
        let attributes = handler.read(ctx, identifier).await?.ok_or_else(|| {
            ProviderError::malformed(format!(
                "{} {} not found right after it was written",
                resource.id.resource_type, identifier
            ))
        })?;
        let mut attributes = schema.complete(attributes);

        // Write-only attributes are never returned; keep the desired value
        for (name, _) in schema.attributes.iter().filter(|(_, s)| s.write_only) {
            if let Some(value) = resource.attributes.get(name) {
                attributes.insert(name.clone(), value.clone());
            }
        }

        Ok(State::existing(resource.id.clone(), attributes).with_identifier(identifier))
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    pub async fn read_resource(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let ctx = RequestContext::new();
        let (handler, schema) = self.lifecycle(id).map_err(|e| e.for_resource(id.clone()))?;

        let Some(identifier) = identifier else {
            return Ok(State::not_found(id.clone()));
        };

        let attributes: Option<Attributes> = handler
            .read(&ctx, identifier)
            .await
            .map_err(|e| e.for_resource(id.clone()))?;

        match attributes {
            Some(attributes) => {
                tracing::debug!(log_id = %ctx, resource = %id, identifier, "read");
                Ok(State::existing(id.clone(), schema.complete(attributes))
                    .with_identifier(identifier))
            }
            None => {
                tracing::debug!(log_id = %ctx, resource = %id, identifier, "not found");
                Ok(State::not_found(id.clone()))
            }
        }
    }

    pub async fn create_resource(&self, resource: &Resource) -> ProviderResult<State> {
        let ctx = RequestContext::new();
        let id = &resource.id;
        let (handler, schema) = self.lifecycle(id).map_err(|e| e.for_resource(id.clone()))?;
        let resource = Self::prepare(&schema, resource)
            .and_then(|r| handler.check(&r).map(|_| r))
            .map_err(|e| e.for_resource(id.clone()))?;

        tracing::info!(log_id = %ctx, resource = %id, "creating");
        let identifier = match handler.create(&ctx, &resource).await {
            Ok(identifier) => identifier,
            Err(e) => {
                tracing::error!(log_id = %ctx, resource = %id, error = %e, "create failed");
                return Err(e.for_resource(id.clone()));
            }
        };
        tracing::info!(log_id = %ctx, resource = %id, %identifier, "created");

        self.read_back(&ctx, handler, &schema, &resource, &identifier)
            .await
            .map_err(|e| e.for_resource(id.clone()))
    }

    pub async fn update_resource(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let ctx = RequestContext::new();
        let (handler, schema) = self.lifecycle(id).map_err(|e| e.for_resource(id.clone()))?;
        let to = Self::prepare(&schema, to)
            .and_then(|r| handler.check(&r).map(|_| r))
            .map_err(|e| e.for_resource(id.clone()))?;

        let immutable = schema.force_new_changes(&from.attributes, &to.attributes);
        if !immutable.is_empty() {
            return Err(ProviderError::validation(format!(
                "cannot change {} in place, the resource must be replaced",
                immutable.join(", ")
            ))
            .for_resource(id.clone()));
        }

        tracing::info!(log_id = %ctx, resource = %id, identifier, "updating");
        if let Err(e) = handler.update(&ctx, identifier, from, &to).await {
            tracing::error!(log_id = %ctx, resource = %id, error = %e, "update failed");
            return Err(e.for_resource(id.clone()));
        }

        self.read_back(&ctx, handler, &schema, &to, identifier)
            .await
            .map_err(|e| e.for_resource(id.clone()))
    }

    pub async fn delete_resource(&self, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
        let ctx = RequestContext::new();
        let (handler, _) = self.lifecycle(id).map_err(|e| e.for_resource(id.clone()))?;

        tracing::info!(log_id = %ctx, resource = %id, identifier, "deleting");
        handler.delete(&ctx, identifier).await.map_err(|e| {
            tracing::error!(log_id = %ctx, resource = %id, error = %e, "delete failed");
            e.for_resource(id.clone())
        })
    }

    pub async fn query_data_source(&self, resource: &Resource) -> ProviderResult<State> {
        let ctx = RequestContext::new();
        let id = &resource.id;
        let source = self.data_sources.get(id.resource_type.as_str()).ok_or_else(|| {
            ProviderError::unsupported(format!("Unknown data source: {}", id.resource_type))
                .for_resource(id.clone())
        })?;
        let schema = schema_for(&id.resource_type).ok_or_else(|| {
            ProviderError::unsupported(format!("No schema for {}", id.resource_type))
                .for_resource(id.clone())
        })?;
        let resource = Self::prepare(&schema, resource).map_err(|e| e.for_resource(id.clone()))?;

        let (identifier, attributes) = source
            .query(&ctx, &resource)
            .await
            .map_err(|e| e.for_resource(id.clone()))?;
        tracing::debug!(log_id = %ctx, resource = %id, %identifier, "queried");

        Ok(State::existing(id.clone(), schema.complete(attributes)).with_identifier(identifier))
    }
}
