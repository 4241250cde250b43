//! In-memory Tencent Cloud used by the integration tests
//!
//! Keeps VPC and MySQL entities as API-shaped JSON, answers the actions the
//! provider issues and records every call.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use tccloud_core::context::RequestContext;
use tccloud_core::provider::ApiError;
use tccloud_provider::config::AsyncPollConfig;
use tccloud_provider::{ProviderConfig, Service, TencentCloudProvider, Transport};

#[derive(Default)]
struct Inner {
    next_id: u64,
    vpcs: Vec<JsonValue>,
    subnets: Vec<JsonValue>,
    route_tables: Vec<JsonValue>,
    instances: HashSet<String>,
    accounts: HashMap<String, Vec<JsonValue>>,
    privileges: HashMap<(String, String, String), Vec<String>>,
    backup_configs: HashMap<String, JsonValue>,
    async_script: VecDeque<(String, String)>,
    calls: Vec<(String, JsonValue)>,
}

impl Inner {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{:08x}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub struct FakeCloud {
    inner: Mutex<Inner>,
}

fn not_found(action: &str, code: &str, what: &str) -> ApiError {
    ApiError::new(action, code, format!("{} not found", what))
}

fn str_field<'a>(request: &'a JsonValue, key: &str) -> &'a str {
    request.get(key).and_then(JsonValue::as_str).unwrap_or("")
}

fn list_field(request: &JsonValue, key: &str) -> Vec<String> {
    request
        .get(key)
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn bool_flag(request: &JsonValue, key: &str) -> bool {
    str_field(request, key) == "true"
}

fn account_user(request: &JsonValue) -> String {
    request["Accounts"][0]["User"].as_str().unwrap_or("").to_string()
}

/// Apply `Filters`, id lists and `Offset`/`Limit` to a listing
fn list(
    request: &JsonValue,
    items: &[JsonValue],
    ids: (&str, &str),
    filters: &[(&str, &str)],
) -> (Vec<JsonValue>, usize) {
    let (ids_key, id_field) = ids;
    let wanted_ids = list_field(request, ids_key);
    let filter_values: Vec<(String, String)> = request
        .get("Filters")
        .and_then(JsonValue::as_array)
        .map(|fs| {
            fs.iter()
                .map(|f| {
                    (
                        str_field(f, "Name").to_string(),
                        f["Values"][0].as_str().unwrap_or("").to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let matching: Vec<JsonValue> = items
        .iter()
        .filter(|item| wanted_ids.is_empty() || wanted_ids.iter().any(|id| item[id_field] == *id))
        .filter(|item| {
            filter_values.iter().all(|(name, value)| {
                filters
                    .iter()
                    .find(|(filter, _)| *filter == name.as_str())
                    .is_none_or(|(_, field)| item[*field] == *value)
            })
        })
        .cloned()
        .collect();

    let offset: usize = str_field(request, "Offset").parse().unwrap_or(0);
    let limit: usize = str_field(request, "Limit").parse().unwrap_or(20);
    let total = matching.len();
    let page = matching.into_iter().skip(offset).take(limit).collect();
    (page, total)
}

impl FakeCloud {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A provider talking to this cloud, polling without delay
    pub fn provider(self: &Arc<Self>) -> TencentCloudProvider {
        self.provider_with_page_size(ProviderConfig::default().page_size)
    }

    pub fn provider_with_page_size(self: &Arc<Self>, page_size: u64) -> TencentCloudProvider {
        let config = ProviderConfig {
            page_size,
            async_poll: AsyncPollConfig {
                max_attempts: 5,
                interval_secs: 0,
            },
            ..ProviderConfig::default()
        };
        TencentCloudProvider::with_transport(config, self.clone())
    }

    pub fn add_instance(&self, mysql_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.instances.insert(mysql_id.to_string());
        inner.backup_configs.insert(
            mysql_id.to_string(),
            json!({
                "StartTimeMin": 2,
                "StartTimeMax": 6,
                "BackupExpireDays": 7,
                "BackupMethod": "physical",
                "BinlogExpireDays": 7
            }),
        );
    }

    pub fn add_vpc(&self, vpc: JsonValue) {
        self.inner.lock().unwrap().vpcs.push(vpc);
    }

    pub fn add_route_table(&self, vpc_id: &str, route_table_id: &str) {
        self.inner.lock().unwrap().route_tables.push(json!({
            "VpcId": vpc_id,
            "RouteTableId": route_table_id,
            "RouteTableName": route_table_id,
            "AssociationSet": [],
            "RouteSet": [],
            "Main": false,
            "CreatedTime": "2019-01-01 00:00:00"
        }));
    }

    /// Statuses returned by successive `DescribeAsyncRequestInfo` calls;
    /// `SUCCESS` once the script runs out
    pub fn script_async(&self, statuses: &[(&str, &str)]) {
        self.inner.lock().unwrap().async_script.extend(
            statuses
                .iter()
                .map(|(s, i)| (s.to_string(), i.to_string())),
        );
    }

    pub fn actions(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(a, _)| a.clone())
            .collect()
    }

    pub fn count(&self, action: &str) -> usize {
        self.actions().iter().filter(|a| *a == action).count()
    }

    pub fn last_request(&self, action: &str) -> Option<JsonValue> {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .rev()
            .find(|(a, _)| a == action)
            .map(|(_, r)| r.clone())
    }

    pub fn subnet(&self, subnet_id: &str) -> Option<JsonValue> {
        self.inner
            .lock()
            .unwrap()
            .subnets
            .iter()
            .find(|s| s["SubnetId"] == subnet_id)
            .cloned()
    }

    pub fn backup_config(&self, mysql_id: &str) -> Option<JsonValue> {
        self.inner.lock().unwrap().backup_configs.get(mysql_id).cloned()
    }

    fn handle(&self, action: &str, request: &JsonValue) -> Result<JsonValue, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push((action.to_string(), request.clone()));
        let inner = &mut *inner;

        match action {
            // -----------------------------------------------------------------
            // VPC
            // -----------------------------------------------------------------
            "CreateVpc" => {
                let vpc = json!({
                    "VpcId": inner.id("vpc"),
                    "VpcName": str_field(request, "VpcName"),
                    "CidrBlock": str_field(request, "CidrBlock"),
                    "IsDefault": false,
                    "EnableMulticast": bool_flag(request, "EnableMulticast"),
                    "DnsServerSet": list_field(request, "DnsServers"),
                    "CreatedTime": "2019-01-01 00:00:00"
                });
                inner.vpcs.push(vpc.clone());
                Ok(json!({ "Vpc": vpc }))
            }
            "DescribeVpcs" => {
                let (page, total) = list(
                    request,
                    &inner.vpcs,
                    ("VpcIds", "VpcId"),
                    &[("vpc-name", "VpcName")],
                );
                if total == 0 && !list_field(request, "VpcIds").is_empty() {
                    return Err(not_found(action, "ResourceNotFound", "vpc"));
                }
                Ok(json!({ "TotalCount": total, "VpcSet": page }))
            }
            "ModifyVpcAttribute" => {
                let vpc_id = str_field(request, "VpcId");
                let vpc = inner
                    .vpcs
                    .iter_mut()
                    .find(|v| v["VpcId"] == vpc_id)
                    .ok_or_else(|| not_found(action, "ResourceNotFound", vpc_id))?;
                vpc["VpcName"] = json!(str_field(request, "VpcName"));
                vpc["EnableMulticast"] = json!(bool_flag(request, "EnableMulticast"));
                let dns = list_field(request, "DnsServers");
                if !dns.is_empty() {
                    vpc["DnsServerSet"] = json!(dns);
                }
                Ok(json!({}))
            }
            "DeleteVpc" => {
                let vpc_id = str_field(request, "VpcId");
                let before = inner.vpcs.len();
                inner.vpcs.retain(|v| v["VpcId"] != vpc_id);
                if inner.vpcs.len() == before {
                    return Err(not_found(action, "ResourceNotFound", vpc_id));
                }
                Ok(json!({}))
            }

            // -----------------------------------------------------------------
            // Subnet
            // -----------------------------------------------------------------
            "CreateSubnet" => {
                let vpc_id = str_field(request, "VpcId");
                let default_table = inner
                    .route_tables
                    .iter()
                    .find(|t| t["VpcId"] == vpc_id && t["Main"] == true)
                    .map(|t| t["RouteTableId"].clone())
                    .unwrap_or(json!(""));
                let subnet = json!({
                    "VpcId": vpc_id,
                    "SubnetId": inner.id("subnet"),
                    "SubnetName": str_field(request, "SubnetName"),
                    "CidrBlock": str_field(request, "CidrBlock"),
                    "IsDefault": false,
                    "EnableBroadcast": false,
                    "Zone": str_field(request, "Zone"),
                    "RouteTableId": default_table,
                    "CreatedTime": "2019-01-01 00:00:00",
                    "AvailableIpAddressCount": 253
                });
                inner.subnets.push(subnet.clone());
                Ok(json!({ "Subnet": subnet }))
            }
            "DescribeSubnets" => {
                let (page, total) = list(
                    request,
                    &inner.subnets,
                    ("SubnetIds", "SubnetId"),
                    &[("vpc-id", "VpcId"), ("subnet-name", "SubnetName"), ("zone", "Zone")],
                );
                if total == 0 && !list_field(request, "SubnetIds").is_empty() {
                    return Err(not_found(action, "ResourceNotFound", "subnet"));
                }
                Ok(json!({ "TotalCount": total, "SubnetSet": page }))
            }
            "ModifySubnetAttribute" => {
                let subnet_id = str_field(request, "SubnetId");
                let subnet = inner
                    .subnets
                    .iter_mut()
                    .find(|s| s["SubnetId"] == subnet_id)
                    .ok_or_else(|| not_found(action, "ResourceNotFound", subnet_id))?;
                subnet["SubnetName"] = json!(str_field(request, "SubnetName"));
                subnet["EnableBroadcast"] = json!(bool_flag(request, "EnableBroadcast"));
                Ok(json!({}))
            }
            "ReplaceRouteTableAssociation" => {
                let subnet_id = str_field(request, "SubnetId").to_string();
                let route_table_id = str_field(request, "RouteTableId").to_string();
                let subnet = inner
                    .subnets
                    .iter_mut()
                    .find(|s| s["SubnetId"] == subnet_id.as_str())
                    .ok_or_else(|| not_found(action, "ResourceNotFound", &subnet_id))?;
                subnet["RouteTableId"] = json!(route_table_id);
                for table in inner.route_tables.iter_mut() {
                    let is_target = table["RouteTableId"] == route_table_id.as_str();
                    if let Some(associations) = table["AssociationSet"].as_array_mut() {
                        associations.retain(|a| a["SubnetId"] != subnet_id.as_str());
                        if is_target {
                            associations.push(json!({
                                "SubnetId": subnet_id,
                                "RouteTableId": route_table_id
                            }));
                        }
                    }
                }
                Ok(json!({}))
            }
            "DeleteSubnet" => {
                let subnet_id = str_field(request, "SubnetId");
                let before = inner.subnets.len();
                inner.subnets.retain(|s| s["SubnetId"] != subnet_id);
                if inner.subnets.len() == before {
                    return Err(not_found(action, "ResourceNotFound", subnet_id));
                }
                Ok(json!({}))
            }

            // -----------------------------------------------------------------
            // Route table
            // -----------------------------------------------------------------
            "CreateRouteTable" => {
                let table = json!({
                    "VpcId": str_field(request, "VpcId"),
                    "RouteTableId": inner.id("rtb"),
                    "RouteTableName": str_field(request, "RouteTableName"),
                    "AssociationSet": [],
                    "RouteSet": [],
                    "Main": false,
                    "CreatedTime": "2019-01-01 00:00:00"
                });
                inner.route_tables.push(table.clone());
                Ok(json!({ "RouteTable": table }))
            }
            "DescribeRouteTables" => {
                let (page, total) = list(
                    request,
                    &inner.route_tables,
                    ("RouteTableIds", "RouteTableId"),
                    &[("vpc-id", "VpcId"), ("route-table-name", "RouteTableName")],
                );
                if total == 0 && !list_field(request, "RouteTableIds").is_empty() {
                    return Err(not_found(action, "ResourceNotFound", "route table"));
                }
                Ok(json!({ "TotalCount": total, "RouteTableSet": page }))
            }
            "ModifyRouteTableAttribute" => {
                let route_table_id = str_field(request, "RouteTableId");
                let table = inner
                    .route_tables
                    .iter_mut()
                    .find(|t| t["RouteTableId"] == route_table_id)
                    .ok_or_else(|| not_found(action, "ResourceNotFound", route_table_id))?;
                table["RouteTableName"] = json!(str_field(request, "RouteTableName"));
                Ok(json!({}))
            }
            "DeleteRouteTable" => {
                let route_table_id = str_field(request, "RouteTableId");
                let before = inner.route_tables.len();
                inner.route_tables.retain(|t| t["RouteTableId"] != route_table_id);
                if inner.route_tables.len() == before {
                    return Err(not_found(action, "ResourceNotFound", route_table_id));
                }
                Ok(json!({}))
            }
            "CreateRoutes" => {
                inner.next_id += 1;
                let route_id = inner.next_id;
                let route_table_id = str_field(request, "RouteTableId");
                let table = inner
                    .route_tables
                    .iter_mut()
                    .find(|t| t["RouteTableId"] == route_table_id)
                    .ok_or_else(|| not_found(action, "ResourceNotFound", route_table_id))?;
                let mut route = request["Routes"][0].clone();
                route["RouteId"] = json!(route_id);
                if let Some(routes) = table["RouteSet"].as_array_mut() {
                    routes.push(route);
                }
                Ok(json!({}))
            }
            "DeleteRoutes" => {
                let route_table_id = str_field(request, "RouteTableId");
                let route_id = request["Routes"][0]["RouteId"].clone();
                let table = inner
                    .route_tables
                    .iter_mut()
                    .find(|t| t["RouteTableId"] == route_table_id)
                    .ok_or_else(|| not_found(action, "ResourceNotFound", route_table_id))?;
                if let Some(routes) = table["RouteSet"].as_array_mut() {
                    routes.retain(|r| r["RouteId"] != route_id);
                }
                Ok(json!({}))
            }

            // -----------------------------------------------------------------
            // MySQL
            // -----------------------------------------------------------------
            _ => self.handle_mysql(inner, action, request),
        }
    }

    fn handle_mysql(
        &self,
        inner: &mut Inner,
        action: &str,
        request: &JsonValue,
    ) -> Result<JsonValue, ApiError> {
        if action == "DescribeAsyncRequestInfo" {
            let (status, info) = inner
                .async_script
                .pop_front()
                .unwrap_or_else(|| ("SUCCESS".to_string(), String::new()));
            return Ok(json!({ "Status": status, "Info": info }));
        }

        let mysql_id = str_field(request, "InstanceId").to_string();
        if !inner.instances.contains(&mysql_id) {
            return Err(not_found(action, "InvalidParameter.InstanceNotFound", &mysql_id));
        }
        let async_id = |inner: &mut Inner| json!({ "AsyncRequestId": inner.id("async") });

        match action {
            "CreateAccounts" => {
                inner.accounts.entry(mysql_id).or_default().push(json!({
                    "User": account_user(request),
                    "Host": "%",
                    "Notes": str_field(request, "Description"),
                    "CreateTime": "2019-01-01 00:00:00"
                }));
                Ok(async_id(inner))
            }
            "DescribeAccounts" => {
                let accounts = inner.accounts.get(&mysql_id).cloned().unwrap_or_default();
                let offset = request["Offset"].as_u64().unwrap_or(0) as usize;
                let limit = request["Limit"].as_u64().unwrap_or(20) as usize;
                let page: Vec<JsonValue> =
                    accounts.iter().skip(offset).take(limit).cloned().collect();
                Ok(json!({ "TotalCount": accounts.len(), "Items": page }))
            }
            "ModifyAccountPassword" => Ok(async_id(inner)),
            "ModifyAccountDescription" => {
                let user = account_user(request);
                if let Some(account) = inner
                    .accounts
                    .get_mut(&mysql_id)
                    .and_then(|accounts| accounts.iter_mut().find(|a| a["User"] == user.as_str()))
                {
                    account["Notes"] = json!(str_field(request, "Description"));
                }
                Ok(async_id(inner))
            }
            "DeleteAccounts" => {
                let user = account_user(request);
                if let Some(accounts) = inner.accounts.get_mut(&mysql_id) {
                    accounts.retain(|a| a["User"] != user.as_str());
                }
                Ok(async_id(inner))
            }
            "ModifyAccountPrivileges" => {
                let user = account_user(request);
                let grant = &request["DatabasePrivileges"][0];
                let database = str_field(grant, "Database").to_string();
                inner
                    .privileges
                    .insert((mysql_id, user, database), list_field(grant, "Privileges"));
                Ok(async_id(inner))
            }
            "DescribeAccountPrivileges" => {
                let user = str_field(request, "User");
                let grants: Vec<JsonValue> = inner
                    .privileges
                    .iter()
                    .filter(|((id, u, _), privileges)| {
                        *id == mysql_id && u == user && !privileges.is_empty()
                    })
                    .map(|((_, _, db), privileges)| {
                        json!({ "Database": db, "Privileges": privileges })
                    })
                    .collect();
                Ok(json!({ "DatabasePrivileges": grants }))
            }
            "DescribeBackupConfig" => Ok(inner.backup_configs[&mysql_id].clone()),
            "ModifyBackupConfig" => {
                let (min, max) = str_field(request, "StartTime")
                    .split_once('-')
                    .map(|(a, b)| {
                        let hour = |s: &str| s[..2].parse::<i64>().unwrap_or(0);
                        (hour(a), hour(b))
                    })
                    .unwrap_or((0, 0));
                let config =
                    inner.backup_configs.get_mut(&mysql_id).expect("instance has a config");
                config["StartTimeMin"] = json!(min);
                config["StartTimeMax"] = json!(max);
                config["BackupExpireDays"] = request["ExpireDays"].clone();
                config["BackupMethod"] = request["BackupMethod"].clone();
                Ok(json!({}))
            }
            other => panic!("fake cloud does not implement {other}"),
        }
    }
}

#[async_trait]
impl Transport for FakeCloud {
    async fn call(
        &self,
        _ctx: &RequestContext,
        _service: Service,
        action: &str,
        request: JsonValue,
    ) -> Result<JsonValue, ApiError> {
        self.handle(action, &request)
    }
}
