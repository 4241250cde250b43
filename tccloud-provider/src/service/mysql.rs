//! MySQL (CDB) service: accounts, privileges, backups and parameters

use serde::{Deserialize, Serialize};
use serde_json::json;
use tccloud_core::context::RequestContext;
use tccloud_core::paginate::{self, Page};
use tccloud_core::provider::{ProviderError, ProviderResult};
use tccloud_core::resolve::resolve_one;

use super::{ApiClient, null_as_default};
use crate::async_request::{self, AsyncRequestInfo, PollSettings};
use crate::transport::Service;

/// Host every account managed here is bound to
pub const MYSQL_DEFAULT_ACCOUNT_HOST: &str = "%";

/// Privileges grantable on a database
pub const MYSQL_DATABASE_PRIVILEGE: &[&str] = &[
    "SELECT",
    "INSERT",
    "UPDATE",
    "DELETE",
    "CREATE",
    "DROP",
    "REFERENCES",
    "INDEX",
    "ALTER",
    "CREATE TEMPORARY TABLES",
    "LOCK TABLES",
    "EXECUTE",
    "CREATE VIEW",
    "SHOW VIEW",
    "CREATE ROUTINE",
    "ALTER ROUTINE",
    "EVENT",
    "TRIGGER",
];

// =============================================================================
// Models
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountInfo {
    pub user: String,
    pub host: String,
    pub notes: String,
    pub create_time: String,
    pub modify_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BackupInfo {
    pub backup_id: i64,
    pub name: String,
    pub size: i64,
    pub date: String,
    pub finish_time: String,
    pub intranet_url: String,
    pub internet_url: String,
    #[serde(rename = "Type")]
    pub backup_type: String,
    pub method: String,
    pub way: String,
    pub status: String,
    pub creator: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BackupConfig {
    /// Hour the backup window opens
    pub start_time_min: i64,
    /// Hour the backup window closes
    pub start_time_max: i64,
    pub backup_expire_days: i64,
    pub backup_method: String,
    pub binlog_expire_days: i64,
}

impl BackupConfig {
    /// Backup window as `HH:00-HH:00`
    pub fn backup_time(&self) -> String {
        format!("{:02}:00-{:02}:00", self.start_time_min, self.start_time_max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ParameterDetail {
    pub name: String,
    pub param_type: String,
    pub default: String,
    pub description: String,
    pub current_value: String,
    pub need_reboot: i64,
    pub max: i64,
    pub min: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub enum_value: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SellType {
    pub type_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub engine_version: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ZoneSellConf {
    pub status: i64,
    pub zone_name: String,
    pub zone: String,
    pub is_custom: bool,
    pub is_support_dr: bool,
    pub is_support_vpc: bool,
    pub hour_instance_sale_max_num: i64,
    pub is_default_zone: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub pay_type: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sell_type: Vec<SellType>,
}

impl ZoneSellConf {
    /// Engine versions sold in this zone, deduplicated in first-seen order
    pub fn engine_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = Vec::new();
        for version in self.sell_type.iter().flat_map(|t| &t.engine_version) {
            if !versions.contains(version) {
                versions.push(version.clone());
            }
        }
        versions
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RegionSellConf {
    pub region: String,
    pub region_name: String,
    pub area: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region_config: Vec<ZoneSellConf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DatabasePrivilege {
    pub database: String,
    #[serde(deserialize_with = "null_as_default")]
    pub privileges: Vec<String>,
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Account<'a> {
    user: &'a str,
    host: &'static str,
}

impl<'a> Account<'a> {
    fn default_host(user: &'a str) -> [Self; 1] {
        [Self {
            user,
            host: MYSQL_DEFAULT_ACCOUNT_HOST,
        }]
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", bound(deserialize = "T: Deserialize<'de>"))]
struct Listing<T> {
    #[serde(default)]
    total_count: u64,
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", bound(deserialize = "T: Deserialize<'de>"))]
struct Items<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AsyncRequestResponse {
    #[serde(default)]
    async_request_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AsyncRequestInfoResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AccountPrivilegesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    database_privileges: Vec<DatabasePrivilege>,
}

#[derive(Debug, Deserialize)]
struct Empty {}

// =============================================================================
// Service
// =============================================================================

/// MySQL product operations
#[derive(Clone)]
pub struct MysqlService {
    client: ApiClient,
    page_size: u64,
    poll: PollSettings,
}

impl MysqlService {
    pub fn new(client: ApiClient, page_size: u64, poll: PollSettings) -> Self {
        Self {
            client,
            page_size,
            poll,
        }
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
        self.client.call(ctx, Service::Cdb, action, request).await
    }

    async fn call_async(
        &self,
        ctx: &RequestContext,
        action: &str,
        request: &serde_json::Value,
    ) -> ProviderResult<String> {
        let response: AsyncRequestResponse = self.call(ctx, action, request).await?;
        if response.async_request_id.is_empty() {
            return Err(ProviderError::malformed(format!(
                "{} returned no AsyncRequestId",
                action
            )));
        }
        Ok(response.async_request_id)
    }

    // -------------------------------------------------------------------------
    // Backups
    // -------------------------------------------------------------------------

    /// Backups of an instance, at most `max_number` of them
    pub async fn describe_backups(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        max_number: usize,
    ) -> ProviderResult<Vec<BackupInfo>> {
        if max_number == 0 {
            return Ok(Vec::new());
        }
        paginate::fetch_up_to(self.page_size, Some(max_number), |cursor| async move {
            let request = json!({
                "InstanceId": mysql_id,
                "Offset": cursor.offset,
                "Limit": cursor.limit,
            });
            let response: Listing<BackupInfo> = self.call(ctx, "DescribeBackups", &request).await?;
            Ok(Page::new(response.items, response.total_count))
        })
        .await
    }

    pub async fn describe_backup_config(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
    ) -> ProviderResult<BackupConfig> {
        let request = json!({ "InstanceId": mysql_id });
        self.call(ctx, "DescribeBackupConfig", &request).await
    }

    pub async fn modify_backup_config(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        retention_period: i64,
        backup_model: &str,
        backup_time: &str,
    ) -> ProviderResult<()> {
        let request = json!({
            "InstanceId": mysql_id,
            "ExpireDays": retention_period,
            "StartTime": backup_time,
            "BackupMethod": backup_model,
        });
        let _: Empty = self.call(ctx, "ModifyBackupConfig", &request).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Zones and parameters
    // -------------------------------------------------------------------------

    pub async fn describe_db_zone_config(
        &self,
        ctx: &RequestContext,
    ) -> ProviderResult<Vec<RegionSellConf>> {
        let response: Items<RegionSellConf> =
            self.call(ctx, "DescribeDBZoneConfig", &json!({})).await?;
        Ok(response.items)
    }

    pub async fn describe_default_params(
        &self,
        ctx: &RequestContext,
        engine_version: &str,
    ) -> ProviderResult<Vec<ParameterDetail>> {
        let request = json!({ "EngineVersion": engine_version });
        let response: Items<ParameterDetail> =
            self.call(ctx, "DescribeDefaultParams", &request).await?;
        Ok(response.items)
    }

    pub async fn describe_instance_params(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
    ) -> ProviderResult<Vec<ParameterDetail>> {
        let request = json!({ "InstanceId": mysql_id });
        let response: Items<ParameterDetail> =
            self.call(ctx, "DescribeInstanceParams", &request).await?;
        Ok(response.items)
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        name: &str,
        password: &str,
        description: &str,
    ) -> ProviderResult<String> {
        let request = json!({
            "InstanceId": mysql_id,
            "Accounts": Account::default_host(name),
            "Password": password,
            "Description": description,
        });
        self.call_async(ctx, "CreateAccounts", &request).await
    }

    pub async fn modify_account_password(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        name: &str,
        password: &str,
    ) -> ProviderResult<String> {
        let request = json!({
            "InstanceId": mysql_id,
            "Accounts": Account::default_host(name),
            "NewPassword": password,
        });
        self.call_async(ctx, "ModifyAccountPassword", &request).await
    }

    pub async fn modify_account_description(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        name: &str,
        description: &str,
    ) -> ProviderResult<String> {
        let request = json!({
            "InstanceId": mysql_id,
            "Accounts": Account::default_host(name),
            "Description": description,
        });
        self.call_async(ctx, "ModifyAccountDescription", &request).await
    }

    pub async fn delete_account(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        name: &str,
    ) -> ProviderResult<String> {
        let request = json!({
            "InstanceId": mysql_id,
            "Accounts": Account::default_host(name),
        });
        self.call_async(ctx, "DeleteAccounts", &request).await
    }

    pub async fn describe_accounts(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
    ) -> ProviderResult<Vec<AccountInfo>> {
        paginate::fetch_all(self.page_size, |cursor| async move {
            let request = json!({
                "InstanceId": mysql_id,
                "Offset": cursor.offset,
                "Limit": cursor.limit,
            });
            let response: Listing<AccountInfo> =
                self.call(ctx, "DescribeAccounts", &request).await?;
            Ok(Page::new(response.items, response.total_count))
        })
        .await
    }

    /// The account `name@%` of an instance, if present
    pub async fn describe_account(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        name: &str,
    ) -> ProviderResult<Option<AccountInfo>> {
        let matching: Vec<AccountInfo> = self
            .describe_accounts(ctx, mysql_id)
            .await?
            .into_iter()
            .filter(|a| a.user == name && a.host == MYSQL_DEFAULT_ACCOUNT_HOST)
            .collect();
        resolve_one(ctx, "mysql account", &format!("{}#{}", mysql_id, name), matching)
    }

    // -------------------------------------------------------------------------
    // Async requests
    // -------------------------------------------------------------------------

    pub async fn describe_async_request_info(
        &self,
        ctx: &RequestContext,
        async_request_id: &str,
    ) -> ProviderResult<AsyncRequestInfo> {
        let request = json!({ "AsyncRequestId": async_request_id });
        let response: AsyncRequestInfoResponse =
            self.call(ctx, "DescribeAsyncRequestInfo", &request).await?;
        Ok(AsyncRequestInfo {
            status: response.status,
            info: response.info,
        })
    }

    /// Block until the async request reaches a terminal status
    pub async fn wait_for_async_request(
        &self,
        ctx: &RequestContext,
        async_request_id: &str,
    ) -> ProviderResult<()> {
        async_request::wait_for_request(async_request_id, self.poll, || {
            self.describe_async_request_info(ctx, async_request_id)
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Privileges
    // -------------------------------------------------------------------------

    pub async fn modify_account_privileges(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        name: &str,
        database: &str,
        privileges: &[String],
    ) -> ProviderResult<String> {
        let request = json!({
            "InstanceId": mysql_id,
            "Accounts": Account::default_host(name),
            "DatabasePrivileges": [DatabasePrivilege {
                database: database.to_string(),
                privileges: privileges.to_vec(),
            }],
        });
        self.call_async(ctx, "ModifyAccountPrivileges", &request).await
    }

    /// Privileges the account holds on one database
    pub async fn describe_account_privileges(
        &self,
        ctx: &RequestContext,
        mysql_id: &str,
        name: &str,
        database: &str,
    ) -> ProviderResult<Vec<String>> {
        let request = json!({
            "InstanceId": mysql_id,
            "User": name,
            "Host": MYSQL_DEFAULT_ACCOUNT_HOST,
        });
        let response: AccountPrivilegesResponse =
            self.call(ctx, "DescribeAccountPrivileges", &request).await?;
        Ok(response
            .database_privileges
            .into_iter()
            .find(|p| p.database == database)
            .map(|p| p.privileges)
            .unwrap_or_default())
    }
}
