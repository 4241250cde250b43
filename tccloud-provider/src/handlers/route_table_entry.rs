//! Route table entry lifecycle
//!
//! Entries are addressed as `<entry_id>.<route_table_id>`. Every attribute
//! forces a new entry, so update has nothing to send.

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::{ProviderError, ProviderResult};
use tccloud_core::resource::{Resource, State};

use super::{Attributes, Lifecycle, required_str, string};
use crate::route_entry_id::RouteEntryId;
use crate::schemas::vpc::GATEWAY_TYPE_EIP;
use crate::service::vpc::{RouteInfo, RouteSpec};
use crate::service::{VpcService, ignore_not_found};
use crate::transport::Service;

/// Attributes of one entry; `route_table_id` and `vpc_id` come from the parent table
pub fn attributes(route_table_id: &str, vpc_id: &str, route: &RouteInfo) -> Attributes {
    Attributes::from([
        ("route_table_id".to_string(), string(route_table_id)),
        ("vpc_id".to_string(), string(vpc_id)),
        (
            "destination_cidr_block".to_string(),
            string(&route.destination_cidr_block),
        ),
        ("next_type".to_string(), string(&route.gateway_type)),
        ("next_hub".to_string(), string(&route.gateway_id)),
        ("description".to_string(), string(&route.route_description)),
    ])
}

pub struct RouteTableEntryHandler {
    service: VpcService,
}

impl RouteTableEntryHandler {
    pub fn new(service: VpcService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Lifecycle for RouteTableEntryHandler {
    fn resource_type(&self) -> &'static str {
        "route_table_entry"
    }

    fn check(&self, resource: &Resource) -> ProviderResult<()> {
        if resource.get_string("next_type") == Some(GATEWAY_TYPE_EIP)
            && resource.get_string("next_hub") != Some("0")
        {
            return Err(ProviderError::validation(
                "next_hub must be \"0\" when next_type is EIP",
            ));
        }
        Ok(())
    }

    async fn create(&self, ctx: &RequestContext, resource: &Resource) -> ProviderResult<String> {
        let route_table_id = required_str(resource, "route_table_id")?;
        let route = RouteSpec {
            destination_cidr_block: required_str(resource, "destination_cidr_block")?.to_string(),
            gateway_type: required_str(resource, "next_type")?.to_string(),
            gateway_id: required_str(resource, "next_hub")?.to_string(),
            route_description: resource.get_string("description").unwrap_or_default().to_string(),
        };

        if let Some(vpc_id) = resource.get_string("vpc_id")
            && !self
                .service
                .is_route_table_in_vpc(ctx, route_table_id, vpc_id)
                .await?
        {
            return Err(ProviderError::validation(format!(
                "route table {} not found in vpc {}",
                route_table_id, vpc_id
            )));
        }

        let entry_id = self.service.create_route(ctx, route_table_id, &route).await?;
        Ok(RouteEntryId::new(entry_id, route_table_id).to_string())
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> ProviderResult<Option<Attributes>> {
        let id: RouteEntryId = identifier.parse()?;
        let Some(table) = self
            .service
            .describe_route_table(ctx, &id.route_table_id)
            .await?
        else {
            return Ok(None);
        };
        Ok(table
            .entry(id.entry_id)
            .map(|route| attributes(&id.route_table_id, &table.vpc_id, route)))
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        _identifier: &str,
        _from: &State,
        _to: &Resource,
    ) -> ProviderResult<()> {
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, identifier: &str) -> ProviderResult<()> {
        let id: RouteEntryId = identifier.parse()?;
        if self.read(ctx, identifier).await?.is_none() {
            return Ok(());
        }
        ignore_not_found(self.service.delete_route(ctx, &id).await, Service::Vpc)
    }
}
