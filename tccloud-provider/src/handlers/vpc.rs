//! VPC lifecycle

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::ProviderResult;
use tccloud_core::resource::{Resource, State, Value};

use super::{Attributes, Lifecycle, required_str, string};
use crate::service::vpc::VpcInfo;
use crate::service::{VpcService, ignore_not_found};
use crate::transport::Service;

/// Flatten a VPC into its attributes
pub fn attributes(info: &VpcInfo) -> Attributes {
    Attributes::from([
        ("name".to_string(), string(&info.vpc_name)),
        ("cidr_block".to_string(), string(&info.cidr_block)),
        (
            "dns_servers".to_string(),
            Value::string_list(info.dns_server_set.iter().cloned()),
        ),
        ("is_multicast".to_string(), Value::Bool(info.enable_multicast)),
        ("is_default".to_string(), Value::Bool(info.is_default)),
        ("create_time".to_string(), string(&info.created_time)),
    ])
}

pub struct VpcHandler {
    service: VpcService,
}

impl VpcHandler {
    pub fn new(service: VpcService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Lifecycle for VpcHandler {
    fn resource_type(&self) -> &'static str {
        "vpc"
    }

    async fn create(&self, ctx: &RequestContext, resource: &Resource) -> ProviderResult<String> {
        let name = required_str(resource, "name")?;
        let cidr_block = required_str(resource, "cidr_block")?;
        let is_multicast = resource.get_bool_or("is_multicast", true);
        let dns_servers = resource.get_string_list("dns_servers").unwrap_or_default();

        self.service
            .create_vpc(ctx, name, cidr_block, is_multicast, &dns_servers)
            .await
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> ProviderResult<Option<Attributes>> {
        Ok(self
            .service
            .describe_vpc(ctx, identifier)
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
        // Unset DNS servers keep what the VPC has now
        let dns_servers = to
            .get_string_list("dns_servers")
            .or_else(|| from.get("dns_servers").and_then(Value::as_string_list))
            .unwrap_or_default();

        self.service
            .modify_vpc_attribute(ctx, identifier, name, is_multicast, &dns_servers)
            .await
    }

    async fn delete(&self, ctx: &RequestContext, identifier: &str) -> ProviderResult<()> {
        if self.service.describe_vpc(ctx, identifier).await?.is_none() {
            return Ok(());
        }
        ignore_not_found(self.service.delete_vpc(ctx, identifier).await, Service::Vpc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_field() {
        let info = VpcInfo {
            vpc_id: "vpc-1".to_string(),
            vpc_name: "main".to_string(),
            cidr_block: "10.0.0.0/16".to_string(),
            is_default: false,
            enable_multicast: true,
            dns_server_set: vec!["119.29.29.29".to_string()],
            created_time: "2019-01-01 00:00:00".to_string(),
        };
        let attrs = attributes(&info);
        assert_eq!(attrs["name"], Value::from("main"));
        assert_eq!(attrs["is_multicast"], Value::Bool(true));
        assert_eq!(attrs["dns_servers"], Value::string_list(["119.29.29.29"]));
        assert!(!attrs.contains_key("vpc_id"));
    }
}
