//! Resource type definitions
//!
//! Binds every supported type name to its schema.

use tccloud_core::provider::ResourceType;
use tccloud_core::schema::ResourceSchema;

use crate::schemas::{mysql, vpc};

macro_rules! define_resource_type {
    ($name:ident, $type_name:expr, $schema:path) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn schema(&self) -> ResourceSchema {
                $schema()
            }
        }
    };
    ($name:ident, $type_name:expr, $schema:path, data_source) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn schema(&self) -> ResourceSchema {
                $schema()
            }
            fn is_data_source(&self) -> bool {
                true
            }
        }
    };
}

define_resource_type!(VpcType, "vpc", vpc::vpc);
define_resource_type!(SubnetType, "subnet", vpc::subnet);
define_resource_type!(RouteTableType, "route_table", vpc::route_table);
define_resource_type!(RouteTableEntryType, "route_table_entry", vpc::route_table_entry);
define_resource_type!(MysqlAccountType, "mysql_account", mysql::mysql_account);
define_resource_type!(MysqlPrivilegeType, "mysql_privilege", mysql::mysql_privilege);
define_resource_type!(MysqlBackupPolicyType, "mysql_backup_policy", mysql::mysql_backup_policy);

define_resource_type!(VpcInstancesType, "vpc_instances", vpc::vpc_instances, data_source);
define_resource_type!(VpcSubnetsType, "vpc_subnets", vpc::vpc_subnets, data_source);
define_resource_type!(VpcRouteTablesType, "vpc_route_tables", vpc::vpc_route_tables, data_source);
define_resource_type!(
    MysqlBackupListType,
    "mysql_backup_list",
    mysql::mysql_backup_list,
    data_source
);
define_resource_type!(
    MysqlParameterListType,
    "mysql_parameter_list",
    mysql::mysql_parameter_list,
    data_source
);
define_resource_type!(
    MysqlZoneConfigType,
    "mysql_zone_config",
    mysql::mysql_zone_config,
    data_source
);

/// Returns all resource types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    vec![
        Box::new(VpcType),
        Box::new(SubnetType),
        Box::new(RouteTableType),
        Box::new(RouteTableEntryType),
        Box::new(MysqlAccountType),
        Box::new(MysqlPrivilegeType),
        Box::new(MysqlBackupPolicyType),
        Box::new(VpcInstancesType),
        Box::new(VpcSubnetsType),
        Box::new(VpcRouteTablesType),
        Box::new(MysqlBackupListType),
        Box::new(MysqlParameterListType),
        Box::new(MysqlZoneConfigType),
    ]
}
