//! Resource and data source schema definitions

pub mod mysql;
pub mod vpc;

use tccloud_core::schema::ResourceSchema;

/// Returns all schemas, resources first
pub fn all_schemas() -> Vec<ResourceSchema> {
    vec![
        vpc::vpc(),
        vpc::subnet(),
        vpc::route_table(),
        vpc::route_table_entry(),
        mysql::mysql_account(),
        mysql::mysql_privilege(),
        mysql::mysql_backup_policy(),
        vpc::vpc_instances(),
        vpc::vpc_subnets(),
        vpc::vpc_route_tables(),
        mysql::mysql_backup_list(),
        mysql::mysql_parameter_list(),
        mysql::mysql_zone_config(),
    ]
}

/// Schema for one resource or data source type
pub fn schema_for(resource_type: &str) -> Option<ResourceSchema> {
    all_schemas()
        .into_iter()
        .find(|s| s.resource_type == resource_type)
}
