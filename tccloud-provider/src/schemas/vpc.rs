//! VPC, subnet, route table and route entry schemas

use tccloud_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

/// Gateway types a route entry may point at
pub const ALL_GATEWAY_TYPES: &[&str] = &[
    "CVM",
    "VPN",
    "DIRECTCONNECT",
    "PEERCONNECTION",
    "SSLVPN",
    "HAVIP",
    "NAT",
    "NORMAL_CVM",
    "EIP",
    "CCN",
];

pub const GATEWAY_TYPE_EIP: &str = "EIP";

/// DNS server list: 1 to 4 addresses
fn dns_servers() -> AttributeType {
    AttributeType::BoundedList {
        inner: Box::new(AttributeType::String),
        min: 1,
        max: 4,
    }
}

fn read_only(name: &str, attr_type: AttributeType, description: &str) -> AttributeSchema {
    AttributeSchema::new(name, attr_type)
        .computed()
        .with_description(description)
}

pub fn vpc() -> ResourceSchema {
    ResourceSchema::new("vpc")
        .with_description("A virtual private cloud")
        .attribute(AttributeSchema::new("name", types::name()).required())
        .attribute(
            AttributeSchema::new("cidr_block", types::cidr())
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("dns_servers", dns_servers())
                .computed()
                .with_description("Defaults to the platform resolvers when unset"),
        )
        .attribute(
            AttributeSchema::new("is_multicast", AttributeType::Bool)
                .with_default(true),
        )
        .attribute(read_only("is_default", AttributeType::Bool, "Whether this is the default VPC"))
        .attribute(read_only("create_time", AttributeType::String, "Creation time"))
}

pub fn subnet() -> ResourceSchema {
    ResourceSchema::new("subnet")
        .with_description("A subnet inside a VPC, bound to one availability zone")
        .attribute(
            AttributeSchema::new("vpc_id", AttributeType::String)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("availability_zone", AttributeType::String)
                .required()
                .force_new(),
        )
        .attribute(AttributeSchema::new("name", types::name()).required())
        .attribute(
            AttributeSchema::new("cidr_block", types::cidr())
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("is_multicast", AttributeType::Bool)
                .with_default(true),
        )
        .attribute(
            AttributeSchema::new("route_table_id", AttributeType::String)
                .computed(),
        )
        .attribute(read_only(
            "is_default",
            AttributeType::Bool,
            "Whether this is the default subnet",
        ))
        .attribute(read_only("available_ip_count", AttributeType::Int, "Unallocated addresses"))
        .attribute(read_only("create_time", AttributeType::String, "Creation time"))
}

pub fn route_table() -> ResourceSchema {
    ResourceSchema::new("route_table")
        .with_description("A named set of routes associated with subnets of one VPC")
        .attribute(
            AttributeSchema::new("vpc_id", AttributeType::String)
                .required()
                .force_new(),
        )
        .attribute(AttributeSchema::new("name", types::name()).required())
        .attribute(read_only("subnet_ids", types::string_list(), "Associated subnets"))
        .attribute(read_only(
            "route_entry_ids",
            types::string_list(),
            "Entries as <entry_id>.<route_table_id>",
        ))
        .attribute(read_only("is_default", AttributeType::Bool, "Whether this is the main table"))
        .attribute(read_only("create_time", AttributeType::String, "Creation time"))
}

pub fn route_table_entry() -> ResourceSchema {
    ResourceSchema::new("route_table_entry")
        .with_description("One route of a route table; every attribute forces a new entry")
        .attribute(
            AttributeSchema::new("route_table_id", AttributeType::String)
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("destination_cidr_block", types::cidr())
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("next_type", types::enum_of(ALL_GATEWAY_TYPES))
                .required()
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("next_hub", AttributeType::String)
                .required()
                .force_new()
                .with_description("Must be \"0\" when next_type is EIP"),
        )
        .attribute(
            AttributeSchema::new("description", AttributeType::String)
                .force_new(),
        )
        .attribute(
            AttributeSchema::new("vpc_id", AttributeType::String)
                .force_new()
                .with_description("When set, the route table must belong to this VPC"),
        )
}

// =============================================================================
// Data sources
// =============================================================================

fn instance_list() -> AttributeSchema {
    AttributeSchema::new(
        "instance_list",
        AttributeType::List(Box::new(AttributeType::Map(Box::new(AttributeType::String)))),
    )
    .computed()
}

pub fn vpc_instances() -> ResourceSchema {
    ResourceSchema::new("vpc_instances")
        .with_description("VPCs matching an optional id and name")
        .attribute(AttributeSchema::new("vpc_id", AttributeType::String))
        .attribute(AttributeSchema::new("name", AttributeType::String))
        .attribute(instance_list())
}

pub fn vpc_subnets() -> ResourceSchema {
    ResourceSchema::new("vpc_subnets")
        .with_description("Subnets matching an optional id and name")
        .attribute(AttributeSchema::new("subnet_id", AttributeType::String))
        .attribute(AttributeSchema::new("name", AttributeType::String))
        .attribute(instance_list())
}

pub fn vpc_route_tables() -> ResourceSchema {
    ResourceSchema::new("vpc_route_tables")
        .with_description("Route tables matching an optional id and name, with their entries")
        .attribute(AttributeSchema::new("route_table_id", AttributeType::String))
        .attribute(AttributeSchema::new("name", AttributeType::String))
        .attribute(instance_list())
}
