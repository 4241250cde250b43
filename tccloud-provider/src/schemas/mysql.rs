//! MySQL account, privilege and backup policy schemas

use tccloud_core::resource::Value;
use tccloud_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use crate::service::mysql::MYSQL_DATABASE_PRIVILEGE;

pub const BACKUP_MODELS: &[&str] = &["physical", "logical"];

/// Backup windows the API accepts
pub const BACKUP_TIMES: &[&str] = &[
    "02:00-06:00",
    "06:00-10:00",
    "10:00-14:00",
    "14:00-18:00",
    "18:00-22:00",
    "22:00-02:00",
];

pub const DEFAULT_RETENTION_PERIOD: i64 = 7;
pub const DEFAULT_BACKUP_MODEL: &str = "physical";
pub const DEFAULT_BACKUP_TIME: &str = "02:00-06:00";
pub const DEFAULT_ACCOUNT_DESCRIPTION: &str = "--";

fn validate_privileges(value: &Value) -> Result<(), String> {
    let Value::List(items) = value else {
        return Err("Expected list of privileges".to_string());
    };
    if items.is_empty() {
        return Err("At least one privilege is required".to_string());
    }
    for item in items {
        match item {
            Value::String(p) if MYSQL_DATABASE_PRIVILEGE.contains(&p.as_str()) => {}
            Value::String(p) => {
                return Err(format!(
                    "Invalid privilege '{}', expected one of: {}",
                    p,
                    MYSQL_DATABASE_PRIVILEGE.join(", ")
                ));
            }
            _ => return Err("Expected string privilege".to_string()),
        }
    }
    Ok(())
}

fn mysql_id() -> AttributeSchema {
    AttributeSchema::new("mysql_id", AttributeType::String)
        .required()
        .force_new()
}

pub fn mysql_account() -> ResourceSchema {
    ResourceSchema::new("mysql_account")
        .with_description("A database account bound to host '%'")
        .attribute(mysql_id())
        .attribute(
            AttributeSchema::new("name", AttributeType::BoundedString { min: 1, max: 16 })
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("password", AttributeType::BoundedString { min: 8, max: 64 })
                .required()
                .write_only(),
        )
        .attribute(
            AttributeSchema::new(
                "description",
                AttributeType::BoundedString { min: 1, max: 200 },
            )
            .with_default(DEFAULT_ACCOUNT_DESCRIPTION),
        )
}

pub fn mysql_privilege() -> ResourceSchema {
    ResourceSchema::new("mysql_privilege")
        .with_description("Privileges of an account on one database")
        .attribute(mysql_id())
        .attribute(
            AttributeSchema::new("account_name", AttributeType::String)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("database_name", AttributeType::String)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new(
                "privileges",
                AttributeType::Custom {
                    name: "DatabasePrivileges".to_string(),
                    base: Box::new(types::string_list()),
                    validate: validate_privileges,
                },
            )
            .required(),
        )
}

pub fn mysql_backup_policy() -> ResourceSchema {
    ResourceSchema::new("mysql_backup_policy")
        .with_description("Backup settings of an instance; deleting restores the defaults")
        .attribute(mysql_id())
        .attribute(
            AttributeSchema::new(
                "retention_period",
                AttributeType::BoundedInt { min: 7, max: 732 },
            )
            .with_default(DEFAULT_RETENTION_PERIOD),
        )
        .attribute(
            AttributeSchema::new("backup_model", types::enum_of(BACKUP_MODELS))
                .with_default(DEFAULT_BACKUP_MODEL),
        )
        .attribute(
            AttributeSchema::new("backup_time", types::enum_of(BACKUP_TIMES))
                .with_default(DEFAULT_BACKUP_TIME),
        )
        .attribute(
            AttributeSchema::new("binlog_period", AttributeType::Int)
                .computed(),
        )
}

// =============================================================================
// Data sources
// =============================================================================

fn item_list(name: &str) -> AttributeSchema {
    AttributeSchema::new(
        name,
        AttributeType::List(Box::new(AttributeType::Map(Box::new(AttributeType::String)))),
    )
    .computed()
}

pub fn mysql_backup_list() -> ResourceSchema {
    ResourceSchema::new("mysql_backup_list")
        .with_description("Most recent backups of an instance")
        .attribute(AttributeSchema::new("mysql_id", AttributeType::String).required())
        .attribute(
            AttributeSchema::new("max_number", AttributeType::BoundedInt { min: 1, max: 10000 })
                .with_default(10i64),
        )
        .attribute(item_list("list"))
}

pub fn mysql_parameter_list() -> ResourceSchema {
    ResourceSchema::new("mysql_parameter_list")
        .with_description("Parameters of an instance, or the defaults of an engine version")
        .attribute(AttributeSchema::new("mysql_id", AttributeType::String))
        .attribute(
            AttributeSchema::new("engine_version", types::enum_of(&["5.5", "5.6", "5.7", "8.0"])),
        )
        .attribute(item_list("parameter_list"))
}

pub fn mysql_zone_config() -> ResourceSchema {
    ResourceSchema::new("mysql_zone_config")
        .with_description("Zones selling MySQL in a region")
        .attribute(
            AttributeSchema::new("region", AttributeType::String)
                .with_description("Defaults to the provider region"),
        )
        .attribute(item_list("list"))
}
