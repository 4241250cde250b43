//! Data sources
//!
//! Each query lists entities matching its filters and returns them as a list
//! of attribute maps under one computed attribute, along with an identifier
//! derived from the filters.

use std::collections::HashMap;

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::{ProviderError, ProviderResult};
use tccloud_core::resource::{Resource, Value};

use crate::handlers::Attributes;
use crate::service::vpc::{RouteTableInfo, RouteTableQuery, SubnetInfo, SubnetQuery, VpcInfo};
use crate::service::mysql::{BackupInfo, ParameterDetail, ZoneSellConf};
use crate::service::{MysqlService, VpcService};

#[async_trait]
pub trait DataSource: Send + Sync {
    fn resource_type(&self) -> &'static str;

    /// Run the query; returns the identifier and the full attribute set
    async fn query(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ProviderResult<(String, Attributes)>;
}

fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>(),
    )
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

/// Echo the filters back and attach the result list
fn output(resource: &Resource, filters: &[&str], list_key: &str, items: Vec<Value>) -> Attributes {
    let mut attrs: Attributes = filters
        .iter()
        .filter_map(|key| {
            resource
                .attributes
                .get(*key)
                .map(|v| (key.to_string(), v.clone()))
        })
        .collect();
    attrs.insert(list_key.to_string(), Value::List(items));
    attrs
}

// =============================================================================
// VPC
// =============================================================================

pub struct VpcInstances {
    service: VpcService,
}

impl VpcInstances {
    pub fn new(service: VpcService) -> Self {
        Self { service }
    }

    fn item(vpc: &VpcInfo, subnet_ids: Vec<String>) -> Value {
        map([
            ("vpc_id", text(&vpc.vpc_id)),
            ("name", text(&vpc.vpc_name)),
            ("cidr_block", text(&vpc.cidr_block)),
            ("is_default", Value::Bool(vpc.is_default)),
            ("is_multicast", Value::Bool(vpc.enable_multicast)),
            ("dns_servers", Value::string_list(vpc.dns_server_set.iter().cloned())),
            ("subnet_ids", Value::string_list(subnet_ids)),
            ("create_time", text(&vpc.created_time)),
        ])
    }
}

#[async_trait]
impl DataSource for VpcInstances {
    fn resource_type(&self) -> &'static str {
        "vpc_instances"
    }

    async fn query(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ProviderResult<(String, Attributes)> {
        let vpc_id = resource.get_string("vpc_id");
        let name = resource.get_string("name");

        let vpcs = self.service.describe_vpcs(ctx, vpc_id, name).await?;
        let mut items = Vec::with_capacity(vpcs.len());
        for vpc in &vpcs {
            let query = SubnetQuery {
                vpc_id: Some(vpc.vpc_id.as_str()),
                ..SubnetQuery::default()
            };
            let subnet_ids = self
                .service
                .describe_subnets(ctx, query)
                .await?
                .into_iter()
                .map(|s| s.subnet_id)
                .collect();
            items.push(Self::item(vpc, subnet_ids));
        }

        let identifier = format!(
            "vpc_instances{}_{}",
            vpc_id.unwrap_or_default(),
            name.unwrap_or_default()
        );
        Ok((identifier, output(resource, &["vpc_id", "name"], "instance_list", items)))
    }
}

pub struct VpcSubnets {
    service: VpcService,
}

impl VpcSubnets {
    pub fn new(service: VpcService) -> Self {
        Self { service }
    }

    fn item(subnet: &SubnetInfo) -> Value {
        map([
            ("availability_zone", text(&subnet.zone)),
            ("vpc_id", text(&subnet.vpc_id)),
            ("subnet_id", text(&subnet.subnet_id)),
            ("name", text(&subnet.subnet_name)),
            ("cidr_block", text(&subnet.cidr_block)),
            ("is_default", Value::Bool(subnet.is_default)),
            ("is_multicast", Value::Bool(subnet.enable_broadcast)),
            ("route_table_id", text(&subnet.route_table_id)),
            ("available_ip_count", Value::Int(subnet.available_ip_address_count)),
            ("create_time", text(&subnet.created_time)),
        ])
    }
}

#[async_trait]
impl DataSource for VpcSubnets {
    fn resource_type(&self) -> &'static str {
        "vpc_subnets"
    }

    async fn query(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ProviderResult<(String, Attributes)> {
        let subnet_id = resource.get_string("subnet_id");
        let name = resource.get_string("name");
        let query = SubnetQuery {
            subnet_id,
            name,
            ..SubnetQuery::default()
        };

        let items = self
            .service
            .describe_subnets(ctx, query)
            .await?
            .iter()
            .map(Self::item)
            .collect();

        let identifier = format!(
            "vpc_subnets{}_{}",
            subnet_id.unwrap_or_default(),
            name.unwrap_or_default()
        );
        Ok((identifier, output(resource, &["subnet_id", "name"], "instance_list", items)))
    }
}

pub struct VpcRouteTables {
    service: VpcService,
}

impl VpcRouteTables {
    pub fn new(service: VpcService) -> Self {
        Self { service }
    }

    fn item(table: &RouteTableInfo) -> ProviderResult<Value> {
        let entries = table
            .route_set
            .iter()
            .map(|route| {
                let route_entry_id = i64::try_from(route.route_id).map_err(|_| {
                    ProviderError::malformed(format!(
                        "route id {} of {} is out of range",
                        route.route_id, table.route_table_id
                    ))
                })?;
                Ok(map([
                    ("route_entry_id", Value::Int(route_entry_id)),
                    ("description", text(&route.route_description)),
                    ("destination_cidr_block", text(&route.destination_cidr_block)),
                    ("next_type", text(&route.gateway_type)),
                    ("next_hub", text(&route.gateway_id)),
                ]))
            })
            .collect::<ProviderResult<Vec<_>>>()?;
        Ok(map([
            ("route_table_id", text(&table.route_table_id)),
            ("name", text(&table.route_table_name)),
            ("vpc_id", text(&table.vpc_id)),
            ("subnet_ids", Value::string_list(table.subnet_ids())),
            ("route_entry_infos", Value::List(entries)),
            ("is_default", Value::Bool(table.main)),
            ("create_time", text(&table.created_time)),
        ]))
    }
}

#[async_trait]
impl DataSource for VpcRouteTables {
    fn resource_type(&self) -> &'static str {
        "vpc_route_tables"
    }

    async fn query(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ProviderResult<(String, Attributes)> {
        let route_table_id = resource.get_string("route_table_id");
        let name = resource.get_string("name");
        let query = RouteTableQuery {
            route_table_id,
            name,
            ..RouteTableQuery::default()
        };

        let items = self
            .service
            .describe_route_tables(ctx, query)
            .await?
            .iter()
            .map(Self::item)
            .collect::<ProviderResult<Vec<_>>>()?;

        let identifier = format!(
            "vpc_route_tables{}_{}",
            route_table_id.unwrap_or_default(),
            name.unwrap_or_default()
        );
        Ok((
            identifier,
            output(resource, &["route_table_id", "name"], "instance_list", items),
        ))
    }
}

// =============================================================================
// MySQL
// =============================================================================

pub struct MysqlBackupList {
    service: MysqlService,
}

impl MysqlBackupList {
    pub fn new(service: MysqlService) -> Self {
        Self { service }
    }

    fn item(backup: &BackupInfo) -> Value {
        map([
            ("time", text(&backup.date)),
            ("finish_time", text(&backup.finish_time)),
            ("size_byte", Value::Int(backup.size)),
            ("backup_id", Value::Int(backup.backup_id)),
            ("backup_model", text(&backup.method)),
            ("intranet_url", text(&backup.intranet_url)),
            ("internet_url", text(&backup.internet_url)),
            ("creator", text(&backup.creator)),
        ])
    }
}

#[async_trait]
impl DataSource for MysqlBackupList {
    fn resource_type(&self) -> &'static str {
        "mysql_backup_list"
    }

    async fn query(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ProviderResult<(String, Attributes)> {
        let mysql_id = resource
            .get_string("mysql_id")
            .ok_or_else(|| ProviderError::validation("mysql_id should be a non-empty string"))?;
        let max_number = resource.get_int("max_number").unwrap_or(10);
        let max_number = usize::try_from(max_number).map_err(|_| {
            ProviderError::validation(format!("max_number {} is negative", max_number))
        })?;

        let items = self
            .service
            .describe_backups(ctx, mysql_id, max_number)
            .await?
            .iter()
            .map(Self::item)
            .collect();

        let identifier = format!("mysql_backup_list{}_{}", mysql_id, max_number);
        Ok((identifier, output(resource, &["mysql_id", "max_number"], "list", items)))
    }
}

pub struct MysqlParameterList {
    service: MysqlService,
}

impl MysqlParameterList {
    pub fn new(service: MysqlService) -> Self {
        Self { service }
    }

    fn item(param: &ParameterDetail) -> Value {
        map([
            ("parameter_name", text(&param.name)),
            ("parameter_type", text(&param.param_type)),
            ("description", text(&param.description)),
            ("current_value", text(&param.current_value)),
            ("default_value", text(&param.default)),
            ("enum_value", Value::string_list(param.enum_value.iter().cloned())),
            ("max", Value::Int(param.max)),
            ("min", Value::Int(param.min)),
            ("need_reboot", Value::Bool(param.need_reboot == 1)),
        ])
    }
}

#[async_trait]
impl DataSource for MysqlParameterList {
    fn resource_type(&self) -> &'static str {
        "mysql_parameter_list"
    }

    /// Instance parameters when `mysql_id` is set, engine defaults otherwise
    async fn query(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ProviderResult<(String, Attributes)> {
        let (identifier, params) = match (
            resource.get_string("mysql_id"),
            resource.get_string("engine_version"),
        ) {
            (Some(mysql_id), _) => (
                format!("mysql_parameter_list{}", mysql_id),
                self.service.describe_instance_params(ctx, mysql_id).await?,
            ),
            (None, Some(version)) => (
                format!("mysql_parameter_list{}", version),
                self.service.describe_default_params(ctx, version).await?,
            ),
            (None, None) => {
                return Err(ProviderError::validation(
                    "one of mysql_id or engine_version must be set",
                ));
            }
        };

        let items = params.iter().map(Self::item).collect();
        Ok((
            identifier,
            output(resource, &["mysql_id", "engine_version"], "parameter_list", items),
        ))
    }
}

pub struct MysqlZoneConfig {
    service: MysqlService,
    default_region: String,
}

impl MysqlZoneConfig {
    pub fn new(service: MysqlService, default_region: impl Into<String>) -> Self {
        Self {
            service,
            default_region: default_region.into(),
        }
    }

    fn item(region: &str, zone: &ZoneSellConf) -> Value {
        map([
            ("region", text(region)),
            ("zone", text(&zone.zone)),
            ("zone_name", text(&zone.zone_name)),
            ("is_default", Value::Bool(zone.is_default_zone)),
            ("is_support_disaster_recovery", Value::Bool(zone.is_support_dr)),
            ("is_support_vpc", Value::Bool(zone.is_support_vpc)),
            (
                "hour_instance_sale_max_num",
                Value::Int(zone.hour_instance_sale_max_num),
            ),
            ("pay_type", Value::string_list(zone.pay_type.iter().cloned())),
            ("engine_versions", Value::string_list(zone.engine_versions())),
        ])
    }
}

#[async_trait]
impl DataSource for MysqlZoneConfig {
    fn resource_type(&self) -> &'static str {
        "mysql_zone_config"
    }

    async fn query(
        &self,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> ProviderResult<(String, Attributes)> {
        let region = resource
            .get_string("region")
            .unwrap_or(self.default_region.as_str());

        let items = self
            .service
            .describe_db_zone_config(ctx)
            .await?
            .iter()
            .filter(|r| r.region == region)
            .flat_map(|r| r.region_config.iter().map(|zone| Self::item(&r.region, zone)))
            .collect();

        let mut attrs = output(resource, &[], "list", items);
        attrs.insert("region".to_string(), text(region));
        Ok((format!("mysql_zone_config{}", region), attrs))
    }
}
