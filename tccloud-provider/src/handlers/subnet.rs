//! Subnet lifecycle

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::{ProviderError, ProviderResult};
use tccloud_core::resource::{Resource, State, Value};

use super::{Attributes, Lifecycle, required_str, string};
use crate::service::vpc::SubnetInfo;
use crate::service::{VpcService, ignore_not_found};
use crate::transport::Service;

pub fn attributes(info: &SubnetInfo) -> Attributes {
    Attributes::from([
        ("vpc_id".to_string(), string(&info.vpc_id)),
        ("availability_zone".to_string(), string(&info.zone)),
        ("name".to_string(), string(&info.subnet_name)),
        ("cidr_block".to_string(), string(&info.cidr_block)),
        ("is_multicast".to_string(), Value::Bool(info.enable_broadcast)),
        ("route_table_id".to_string(), string(&info.route_table_id)),
        ("is_default".to_string(), Value::Bool(info.is_default)),
        (
            "available_ip_count".to_string(),
            Value::Int(info.available_ip_address_count),
        ),
        ("create_time".to_string(), string(&info.created_time)),
    ])
}

pub struct SubnetHandler {
    service: VpcService,
}

impl SubnetHandler {
    pub fn new(service: VpcService) -> Self {
        Self { service }
    }

    async fn ensure_in_vpc(
        &self,
        ctx: &RequestContext,
        route_table_id: &str,
        vpc_id: &str,
    ) -> ProviderResult<()> {
        if self
            .service
            .is_route_table_in_vpc(ctx, route_table_id, vpc_id)
            .await?
        {
            Ok(())
        } else {
            Err(ProviderError::validation(format!(
                "route table {} not found in vpc {}",
                route_table_id, vpc_id
            )))
        }
    }
}

#[async_trait]
impl Lifecycle for SubnetHandler {
    fn resource_type(&self) -> &'static str {
        "subnet"
    }

    async fn create(&self, ctx: &RequestContext, resource: &Resource) -> ProviderResult<String> {
        let vpc_id = required_str(resource, "vpc_id")?;
        let zone = required_str(resource, "availability_zone")?;
        let name = required_str(resource, "name")?;
        let cidr_block = required_str(resource, "cidr_block")?;
        let is_multicast = resource.get_bool_or("is_multicast", true);
        let route_table_id = resource.get_string("route_table_id");

        // Reject a foreign route table before anything is created
        if let Some(route_table_id) = route_table_id {
            self.ensure_in_vpc(ctx, route_table_id, vpc_id).await?;
        }

        let subnet_id = self
            .service
            .create_subnet(ctx, vpc_id, name, cidr_block, zone)
            .await?;

        // CreateSubnet has no multicast flag
        self.service
            .modify_subnet_attribute(ctx, &subnet_id, name, is_multicast)
            .await?;

        if let Some(route_table_id) = route_table_id {
            self.service
                .replace_route_table_association(ctx, &subnet_id, route_table_id)
                .await?;
        }

        Ok(subnet_id)
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> ProviderResult<Option<Attributes>> {
        Ok(self
            .service
            .describe_subnet(ctx, identifier)
            .await?
            .map(|info| attributes(&info)))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<()> {
        let name = required_str(to, "name")?;
        let is_multicast = to.get_bool_or("is_multicast", true);

        let current_name = from.get("name").and_then(Value::as_str);
        let current_multicast = from.get("is_multicast").and_then(Value::as_bool);
        if current_name != Some(name) || current_multicast != Some(is_multicast) {
            self.service
                .modify_subnet_attribute(ctx, identifier, name, is_multicast)
                .await?;
        }

        if let Some(route_table_id) = to.get_string("route_table_id")
            && from.get("route_table_id").and_then(Value::as_str) != Some(route_table_id)
        {
            let vpc_id = required_str(to, "vpc_id")?;
            self.ensure_in_vpc(ctx, route_table_id, vpc_id).await?;
            self.service
                .replace_route_table_association(ctx, identifier, route_table_id)
                .await?;
        }

        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, identifier: &str) -> ProviderResult<()> {
        if self.service.describe_subnet(ctx, identifier).await?.is_none() {
            return Ok(());
        }
        ignore_not_found(self.service.delete_subnet(ctx, identifier).await, Service::Vpc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multicast_follows_broadcast_flag() {
        let info = SubnetInfo {
            vpc_id: "vpc-1".to_string(),
            subnet_id: "subnet-1".to_string(),
            subnet_name: "app".to_string(),
            cidr_block: "10.0.1.0/24".to_string(),
            is_default: false,
            enable_broadcast: false,
            zone: "ap-guangzhou-3".to_string(),
            route_table_id: "rtb-1".to_string(),
            created_time: "2019-01-01 00:00:00".to_string(),
            available_ip_address_count: 253,
        };
        let attrs = attributes(&info);
        assert_eq!(attrs["is_multicast"], Value::Bool(false));
        assert_eq!(attrs["availability_zone"], Value::from("ap-guangzhou-3"));
        assert_eq!(attrs["available_ip_count"], Value::Int(253));
    }
}
