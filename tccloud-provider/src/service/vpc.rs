//! VPC service: VPCs, subnets, route tables and route entries

use serde::{Deserialize, Serialize};
use tccloud_core::context::RequestContext;
use tccloud_core::paginate::{self, Page};
use tccloud_core::provider::{ProviderError, ProviderResult};
use tccloud_core::resolve::resolve_one;

use super::{ApiClient, is_not_found, null_as_default};
use crate::route_entry_id::RouteEntryId;
use crate::transport::Service;

// =============================================================================
// Models
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VpcInfo {
    pub vpc_id: String,
    pub vpc_name: String,
    pub cidr_block: String,
    pub is_default: bool,
    pub enable_multicast: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub dns_server_set: Vec<String>,
    pub created_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SubnetInfo {
    pub vpc_id: String,
    pub subnet_id: String,
    pub subnet_name: String,
    pub cidr_block: String,
    pub is_default: bool,
    pub enable_broadcast: bool,
    pub zone: String,
    pub route_table_id: String,
    pub created_time: String,
    pub available_ip_address_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RouteTableAssociation {
    pub subnet_id: String,
    pub route_table_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RouteInfo {
    pub route_id: u64,
    pub destination_cidr_block: String,
    pub gateway_type: String,
    pub gateway_id: String,
    pub route_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RouteTableInfo {
    pub vpc_id: String,
    pub route_table_id: String,
    pub route_table_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub association_set: Vec<RouteTableAssociation>,
    #[serde(deserialize_with = "null_as_default")]
    pub route_set: Vec<RouteInfo>,
    pub main: bool,
    pub created_time: String,
}

impl RouteTableInfo {
    pub fn subnet_ids(&self) -> Vec<String> {
        self.association_set
            .iter()
            .map(|a| a.subnet_id.clone())
            .collect()
    }

    /// Composite ids of every entry, in table order
    pub fn route_entry_ids(&self) -> Vec<RouteEntryId> {
        self.route_set
            .iter()
            .map(|r| RouteEntryId::new(r.route_id, self.route_table_id.as_str()))
            .collect()
    }

    pub fn entry(&self, entry_id: u64) -> Option<&RouteInfo> {
        self.route_set.iter().find(|r| r.route_id == entry_id)
    }
}

/// Desired content of a route entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteSpec {
    pub destination_cidr_block: String,
    pub gateway_type: String,
    pub gateway_id: String,
    pub route_description: String,
}

impl RouteSpec {
    fn matches(&self, route: &RouteInfo) -> bool {
        route.destination_cidr_block == self.destination_cidr_block
            && route.gateway_type == self.gateway_type
            && route.gateway_id == self.gateway_id
    }
}

/// Filters for subnet listings; `None` matches everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SubnetQuery<'a> {
    pub subnet_id: Option<&'a str>,
    pub vpc_id: Option<&'a str>,
    pub name: Option<&'a str>,
    pub zone: Option<&'a str>,
}

/// Filters for route table listings; `None` matches everything
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteTableQuery<'a> {
    pub route_table_id: Option<&'a str>,
    pub vpc_id: Option<&'a str>,
    pub name: Option<&'a str>,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Filter<'a> {
    name: &'a str,
    values: [&'a str; 1],
}

fn filters<'a>(pairs: &[(&'a str, Option<&'a str>)]) -> Vec<Filter<'a>> {
    pairs
        .iter()
        .filter_map(|&(name, value)| value.map(|v| Filter { name, values: [v] }))
        .collect()
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ListRequest<'a> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    vpc_ids: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    subnet_ids: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    route_table_ids: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filters: Vec<Filter<'a>>,
    offset: String,
    limit: String,
}

impl<'a> ListRequest<'a> {
    fn new(cursor: paginate::PageCursor, filters: Vec<Filter<'a>>) -> Self {
        Self {
            vpc_ids: Vec::new(),
            subnet_ids: Vec::new(),
            route_table_ids: Vec::new(),
            filters,
            offset: cursor.offset.to_string(),
            limit: cursor.limit.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeVpcsResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    vpc_set: Vec<VpcInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnetsResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    subnet_set: Vec<SubnetInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeRouteTablesResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    route_table_set: Vec<RouteTableInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateVpcResponse {
    vpc: VpcInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateSubnetResponse {
    subnet: SubnetInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateRouteTableResponse {
    route_table: RouteTableInfo,
}

/// Response of actions whose only output is the request id
#[derive(Debug, Deserialize)]
struct Empty {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct VpcAttributes<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    vpc_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cidr_block: Option<&'a str>,
    vpc_name: &'a str,
    enable_multicast: &'static str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    dns_servers: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RouteRef {
    route_id: u64,
}

// =============================================================================
// Service
// =============================================================================

/// VPC product operations
#[derive(Clone)]
pub struct VpcService {
    client: ApiClient,
    page_size: u64,
}

impl VpcService {
    pub fn new(client: ApiClient, page_size: u64) -> Self {
        Self { client, page_size }
    }

    async fn call<Req, Resp>(
        &self,
        ctx: &RequestContext,
        action: &str,
        request: &Req,
    ) -> ProviderResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: serde::de::DeserializeOwned,
    {
        self.client.call(ctx, Service::Vpc, action, request).await
    }

    /// Turn a not-found error from a lookup by id into an empty result
    fn absent_on_not_found<T>(result: ProviderResult<Vec<T>>) -> ProviderResult<Vec<T>> {
        match result {
            Err(e) if is_not_found(&e, Service::Vpc) => Ok(Vec::new()),
            other => other,
        }
    }

    // -------------------------------------------------------------------------
    // VPC
    // -------------------------------------------------------------------------

    pub async fn describe_vpc(
        &self,
        ctx: &RequestContext,
        vpc_id: &str,
    ) -> ProviderResult<Option<VpcInfo>> {
        let vpcs = Self::absent_on_not_found(self.describe_vpcs(ctx, Some(vpc_id), None).await)?;
        resolve_one(ctx, "vpc", vpc_id, vpcs)
    }

    pub async fn describe_vpcs(
        &self,
        ctx: &RequestContext,
        vpc_id: Option<&str>,
        name: Option<&str>,
    ) -> ProviderResult<Vec<VpcInfo>> {
        paginate::fetch_all(self.page_size, |cursor| async move {
            let mut request = ListRequest::new(cursor, filters(&[("vpc-name", name)]));
            request.vpc_ids.extend(vpc_id);
            let response: DescribeVpcsResponse = self.call(ctx, "DescribeVpcs", &request).await?;
            Ok(Page::new(response.vpc_set, response.total_count))
        })
        .await
    }

    pub async fn create_vpc(
        &self,
        ctx: &RequestContext,
        name: &str,
        cidr_block: &str,
        is_multicast: bool,
        dns_servers: &[String],
    ) -> ProviderResult<String> {
        let request = VpcAttributes {
            vpc_id: None,
            cidr_block: Some(cidr_block),
            vpc_name: name,
            enable_multicast: flag(is_multicast),
            dns_servers,
        };
        let response: CreateVpcResponse = self.call(ctx, "CreateVpc", &request).await?;
        non_empty_id("CreateVpc", response.vpc.vpc_id)
    }

    pub async fn modify_vpc_attribute(
        &self,
        ctx: &RequestContext,
        vpc_id: &str,
        name: &str,
        is_multicast: bool,
        dns_servers: &[String],
    ) -> ProviderResult<()> {
        let request = VpcAttributes {
            vpc_id: Some(vpc_id),
            cidr_block: None,
            vpc_name: name,
            enable_multicast: flag(is_multicast),
            dns_servers,
        };
        let _: Empty = self.call(ctx, "ModifyVpcAttribute", &request).await?;
        Ok(())
    }

    pub async fn delete_vpc(&self, ctx: &RequestContext, vpc_id: &str) -> ProviderResult<()> {
        let request = serde_json::json!({ "VpcId": vpc_id });
        let _: Empty = self.call(ctx, "DeleteVpc", &request).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Subnet
    // -------------------------------------------------------------------------

    pub async fn describe_subnet(
        &self,
        ctx: &RequestContext,
        subnet_id: &str,
    ) -> ProviderResult<Option<SubnetInfo>> {
        let query = SubnetQuery {
            subnet_id: Some(subnet_id),
            ..SubnetQuery::default()
        };
        let subnets = Self::absent_on_not_found(self.describe_subnets(ctx, query).await)?;
        resolve_one(ctx, "subnet", subnet_id, subnets)
    }

    pub async fn describe_subnets(
        &self,
        ctx: &RequestContext,
        query: SubnetQuery<'_>,
    ) -> ProviderResult<Vec<SubnetInfo>> {
        paginate::fetch_all(self.page_size, |cursor| async move {
            let mut request = ListRequest::new(
                cursor,
                filters(&[
                    ("vpc-id", query.vpc_id),
                    ("subnet-name", query.name),
                    ("zone", query.zone),
                ]),
            );
            request.subnet_ids.extend(query.subnet_id);
            let response: DescribeSubnetsResponse =
                self.call(ctx, "DescribeSubnets", &request).await?;
            Ok(Page::new(response.subnet_set, response.total_count))
        })
        .await
    }

    pub async fn create_subnet(
        &self,
        ctx: &RequestContext,
        vpc_id: &str,
        name: &str,
        cidr_block: &str,
        zone: &str,
    ) -> ProviderResult<String> {
        let request = serde_json::json!({
            "VpcId": vpc_id,
            "SubnetName": name,
            "CidrBlock": cidr_block,
            "Zone": zone,
        });
        let response: CreateSubnetResponse = self.call(ctx, "CreateSubnet", &request).await?;
        non_empty_id("CreateSubnet", response.subnet.subnet_id)
    }

    pub async fn modify_subnet_attribute(
        &self,
        ctx: &RequestContext,
        subnet_id: &str,
        name: &str,
        is_multicast: bool,
    ) -> ProviderResult<()> {
        let request = serde_json::json!({
            "SubnetId": subnet_id,
            "SubnetName": name,
            "EnableBroadcast": flag(is_multicast),
        });
        let _: Empty = self.call(ctx, "ModifySubnetAttribute", &request).await?;
        Ok(())
    }

    pub async fn delete_subnet(&self, ctx: &RequestContext, subnet_id: &str) -> ProviderResult<()> {
        let request = serde_json::json!({ "SubnetId": subnet_id });
        let _: Empty = self.call(ctx, "DeleteSubnet", &request).await?;
        Ok(())
    }

    pub async fn replace_route_table_association(
        &self,
        ctx: &RequestContext,
        subnet_id: &str,
        route_table_id: &str,
    ) -> ProviderResult<()> {
        let request = serde_json::json!({
            "SubnetId": subnet_id,
            "RouteTableId": route_table_id,
        });
        let _: Empty = self
            .call(ctx, "ReplaceRouteTableAssociation", &request)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Route table
    // -------------------------------------------------------------------------

    /// Whether the route table exists inside the given VPC
    pub async fn is_route_table_in_vpc(
        &self,
        ctx: &RequestContext,
        route_table_id: &str,
        vpc_id: &str,
    ) -> ProviderResult<bool> {
        let query = RouteTableQuery {
            route_table_id: Some(route_table_id),
            vpc_id: Some(vpc_id),
            name: None,
        };
        let tables = Self::absent_on_not_found(self.describe_route_tables(ctx, query).await)?;
        Ok(resolve_one(ctx, "route table", route_table_id, tables)?.is_some())
    }

    pub async fn describe_route_table(
        &self,
        ctx: &RequestContext,
        route_table_id: &str,
    ) -> ProviderResult<Option<RouteTableInfo>> {
        let query = RouteTableQuery {
            route_table_id: Some(route_table_id),
            ..RouteTableQuery::default()
        };
        let tables = Self::absent_on_not_found(self.describe_route_tables(ctx, query).await)?;
        resolve_one(ctx, "route table", route_table_id, tables)
    }

    pub async fn describe_route_tables(
        &self,
        ctx: &RequestContext,
        query: RouteTableQuery<'_>,
    ) -> ProviderResult<Vec<RouteTableInfo>> {
        paginate::fetch_all(self.page_size, |cursor| async move {
            let mut request = ListRequest::new(
                cursor,
                filters(&[("vpc-id", query.vpc_id), ("route-table-name", query.name)]),
            );
            request.route_table_ids.extend(query.route_table_id);
            let response: DescribeRouteTablesResponse =
                self.call(ctx, "DescribeRouteTables", &request).await?;
            Ok(Page::new(response.route_table_set, response.total_count))
        })
        .await
    }

    pub async fn create_route_table(
        &self,
        ctx: &RequestContext,
        vpc_id: &str,
        name: &str,
    ) -> ProviderResult<String> {
        let request = serde_json::json!({
            "VpcId": vpc_id,
            "RouteTableName": name,
        });
        let response: CreateRouteTableResponse =
            self.call(ctx, "CreateRouteTable", &request).await?;
        non_empty_id("CreateRouteTable", response.route_table.route_table_id)
    }

    pub async fn modify_route_table_attribute(
        &self,
        ctx: &RequestContext,
        route_table_id: &str,
        name: &str,
    ) -> ProviderResult<()> {
        let request = serde_json::json!({
            "RouteTableId": route_table_id,
            "RouteTableName": name,
        });
        let _: Empty = self
            .call(ctx, "ModifyRouteTableAttribute", &request)
            .await?;
        Ok(())
    }

    pub async fn delete_route_table(
        &self,
        ctx: &RequestContext,
        route_table_id: &str,
    ) -> ProviderResult<()> {
        let request = serde_json::json!({ "RouteTableId": route_table_id });
        let _: Empty = self.call(ctx, "DeleteRouteTable", &request).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Route entry
    // -------------------------------------------------------------------------

    /// Add one route to a table and return the id the API gave it
    ///
    /// The create call does not echo the id, so the table is read back and
    /// the entry matching destination and next hop is picked.
    pub async fn create_route(
        &self,
        ctx: &RequestContext,
        route_table_id: &str,
        route: &RouteSpec,
    ) -> ProviderResult<u64> {
        let request = serde_json::json!({
            "RouteTableId": route_table_id,
            "Routes": [route],
        });
        let _: Empty = self.call(ctx, "CreateRoutes", &request).await?;

        let table = self
            .describe_route_table(ctx, route_table_id)
            .await?
            .ok_or_else(|| {
                ProviderError::malformed(format!(
                    "route table {} disappeared after CreateRoutes",
                    route_table_id
                ))
            })?;

        let key = format!(
            "{}->{}:{} in {}",
            route.destination_cidr_block, route.gateway_type, route.gateway_id, route_table_id
        );
        let matching: Vec<&RouteInfo> =
            table.route_set.iter().filter(|r| route.matches(r)).collect();
        match resolve_one(ctx, "route entry", &key, matching)? {
            Some(entry) => Ok(entry.route_id),
            None => Err(ProviderError::malformed(format!(
                "route {} not found after CreateRoutes",
                key
            ))),
        }
    }

    pub async fn delete_route(
        &self,
        ctx: &RequestContext,
        id: &RouteEntryId,
    ) -> ProviderResult<()> {
        let request = serde_json::json!({
            "RouteTableId": id.route_table_id,
            "Routes": [RouteRef { route_id: id.entry_id }],
        });
        let _: Empty = self.call(ctx, "DeleteRoutes", &request).await?;
        Ok(())
    }
}

fn non_empty_id(action: &str, id: String) -> ProviderResult<String> {
    if id.is_empty() {
        Err(ProviderError::malformed(format!("{} returned no id", action)))
    } else {
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn service(
        transport: ScriptedTransport,
        page_size: u64) -> (VpcService, Arc<ScriptedTransport>,
    ) {
        let transport = Arc::new(transport);
        let service = VpcService::new(ApiClient::new(transport.clone()), page_size);
        (service, transport)
    }

    fn vpc(id: &str) -> serde_json::Value {
        json!({
            "VpcId": id,
            "VpcName": format!("name-{id}"),
            "CidrBlock": "10.0.0.0/16",
            "IsDefault": false,
            "EnableMulticast": true,
            "DnsServerSet": null,
            "CreatedTime": "2019-01-01 00:00:00",
        })
    }

    #[tokio::test]
    async fn describe_vpcs_sends_string_offsets_and_filters() {
        let (svc, transport) = service(
            ScriptedTransport::new()
                .respond(
                    "DescribeVpcs",
                    json!({"TotalCount": 3, "VpcSet": [vpc("vpc-1"), vpc("vpc-2")]}),
                )
                .respond("DescribeVpcs", json!({"TotalCount": 3, "VpcSet": [vpc("vpc-3")]})),
            2,
        );

        let vpcs = svc
            .describe_vpcs(&RequestContext::new(), None, Some("web"))
            .await
            .unwrap();

        assert_eq!(
            vpcs.iter().map(|v| v.vpc_id.as_str()).collect::<Vec<_>>(),
            vec!["vpc-1", "vpc-2", "vpc-3"]
        );
        assert!(vpcs[0].dns_server_set.is_empty());

        let calls = transport.calls();
        assert_eq!(calls[0].1["Offset"], "0");
        assert_eq!(calls[1].1["Offset"], "2");
        assert_eq!(calls[1].1["Limit"], "2");
        assert_eq!(
            calls[0].1["Filters"],
            json!([{"Name": "vpc-name", "Values": ["web"]}])
        );
        assert!(calls[0].1.get("VpcIds").is_none());
    }

    #[tokio::test]
    async fn describe_vpc_not_found_code_is_absent() {
        let (svc, _) = service(
            ScriptedTransport::new().fail("DescribeVpcs", "ResourceNotFound", "gone"),
            100,
        );
        let found = svc.describe_vpc(&RequestContext::new(), "vpc-x").await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn describe_vpc_with_two_matches_is_integrity_error() {
        let (svc, _) = service(
            ScriptedTransport::new().respond(
                "DescribeVpcs",
                json!({"TotalCount": 2, "VpcSet": [vpc("vpc-1"), vpc("vpc-1")]}),
            ),
            100,
        );
        let err = svc.describe_vpc(&RequestContext::new(), "vpc-1").await.unwrap_err();
        assert!(err.is_integrity());
    }

    #[tokio::test]
    async fn other_errors_propagate() {
        let (svc, _) = service(
            ScriptedTransport::new().fail("DescribeVpcs", "InternalError", "boom"),
            100,
        );
        let err = svc.describe_vpc(&RequestContext::new(), "vpc-1").await.unwrap_err();
        assert_eq!(err.api_error().unwrap().code, "InternalError");
    }

    #[tokio::test]
    async fn create_vpc_sends_flags_as_strings() {
        let (svc, transport) = service(
            ScriptedTransport::new().respond("CreateVpc", json!({"Vpc": vpc("vpc-9")})),
            100,
        );
        let id = svc
            .create_vpc(&RequestContext::new(), "main", "10.0.0.0/16", false, &[])
            .await
            .unwrap();
        assert_eq!(id, "vpc-9");

        let request = &transport.calls()[0].1;
        assert_eq!(request["EnableMulticast"], "false");
        assert!(request.get("DnsServers").is_none());
        assert!(request.get("VpcId").is_none());
    }

    #[tokio::test]
    async fn create_route_resolves_entry_id_from_table() {
        let table = json!({
            "TotalCount": 1,
            "RouteTableSet": [{
                "VpcId": "vpc-1",
                "RouteTableId": "rtb-1",
                "RouteTableName": "main",
                "AssociationSet": [],
                "RouteSet": [
                    {
                        "RouteId": 7,
                        "DestinationCidrBlock": "10.1.0.0/16",
                        "GatewayType": "CVM",
                        "GatewayId": "10.0.0.2"
                    },
                    {
                        "RouteId": 42,
                        "DestinationCidrBlock": "10.2.0.0/16",
                        "GatewayType": "EIP",
                        "GatewayId": "0"
                    }
                ],
                "Main": false,
                "CreatedTime": "2019-01-01 00:00:00"
            }]
        });
        let (svc, transport) = service(
            ScriptedTransport::new()
                .respond("CreateRoutes", json!({}))
                .respond("DescribeRouteTables", table),
            100,
        );

        let route = RouteSpec {
            destination_cidr_block: "10.2.0.0/16".to_string(),
            gateway_type: "EIP".to_string(),
            gateway_id: "0".to_string(),
            route_description: String::new(),
        };
        let entry_id = svc
            .create_route(&RequestContext::new(), "rtb-1", &route)
            .await
            .unwrap();
        assert_eq!(entry_id, 42);
        assert_eq!(
            transport.calls()[0].1["Routes"][0]["GatewayType"],
            "EIP"
        );
    }

    #[test]
    fn route_table_composes_entry_ids() {
        let table = RouteTableInfo {
            route_table_id: "rtb-1".to_string(),
            route_set: vec![
                RouteInfo {
                    route_id: 1,
                    ..RouteInfo::default()
                },
                RouteInfo {
                    route_id: 42,
                    ..RouteInfo::default()
                },
            ],
            ..RouteTableInfo::default()
        };
        let ids: Vec<String> = table.route_entry_ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["1.rtb-1", "42.rtb-1"]);
        assert!(table.entry(42).is_some());
        assert!(table.entry(43).is_none());
    }
}
