//! Route table lifecycle

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::ProviderResult;
use tccloud_core::resource::{Resource, State, Value};

use super::{Attributes, Lifecycle, required_str, string};
use crate::service::vpc::RouteTableInfo;
use crate::service::{VpcService, ignore_not_found};
use crate::transport::Service;

pub fn attributes(info: &RouteTableInfo) -> Attributes {
    let route_entry_ids =
        info.route_entry_ids().iter().map(ToString::to_string).collect::<Vec<_>>();
    Attributes::from([
        ("vpc_id".to_string(), string(&info.vpc_id)),
        ("name".to_string(), string(&info.route_table_name)),
        ("subnet_ids".to_string(), Value::string_list(info.subnet_ids())),
        ("route_entry_ids".to_string(), Value::string_list(route_entry_ids)),
        ("is_default".to_string(), Value::Bool(info.main)),
        ("create_time".to_string(), string(&info.created_time)),
    ])
}

pub struct RouteTableHandler {
    service: VpcService,
}

impl RouteTableHandler {
    pub fn new(service: VpcService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Lifecycle for RouteTableHandler {
    fn resource_type(&self) -> &'static str {
        "route_table"
    }

    async fn create(&self, ctx: &RequestContext, resource: &Resource) -> ProviderResult<String> {
        let vpc_id = required_str(resource, "vpc_id")?;
        let name = required_str(resource, "name")?;
        self.service.create_route_table(ctx, vpc_id, name).await
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> ProviderResult<Option<Attributes>> {
        Ok(self
            .service
            .describe_route_table(ctx, identifier)
            .await?
            .map(|info| attributes(&info)))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> ProviderResult<()> {
        let name = required_str(to, "name")?;
        self.service
            .modify_route_table_attribute(ctx, identifier, name)
            .await
    }

    async fn delete(&self, ctx: &RequestContext, identifier: &str) -> ProviderResult<()> {
        if self
            .service
            .describe_route_table(ctx, identifier)
            .await?
            .is_none()
        {
            return Ok(());
        }
        ignore_not_found(
            self.service.delete_route_table(ctx, identifier).await,
            Service::Vpc,
        )
    }
}
