//! Schema - Define type schemas for resources
//!
//! Providers declare a schema per resource type. The schema drives local
//! validation before any remote call and completes read-back attribute
//! maps so that every declared field carries a value.

use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

use crate::resource::Value;

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    String,
    Int,
    Bool,
    /// Enum (list of allowed values)
    Enum(Vec<String>),
    /// String whose character count must fall in `min..=max`
    BoundedString { min: usize, max: usize },
    /// Integer in `min..=max`
    BoundedInt { min: i64, max: i64 },
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    List(Box<AttributeType>),
    /// List whose length must fall in `min..=max`
    BoundedList {
        inner: Box<AttributeType>,
        min: usize,
        max: usize,
    },
    Map(Box<AttributeType>),
}

impl AttributeType {
    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::Enum(variants), Value::String(s)) => {
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(TypeError::InvalidEnumVariant {
                        value: s.clone(),
                        expected: variants.clone(),
                    })
                }
            }

            (AttributeType::BoundedString { min, max }, Value::String(s)) => {
                let len = s.chars().count();
                if len < *min || len > *max {
                    Err(TypeError::OutOfRange {
                        what: format!("length of '{}'", s),
                        got: len as i64,
                        min: *min as i64,
                        max: *max as i64,
                    })
                } else {
                    Ok(())
                }
            }

            (AttributeType::BoundedInt { min, max }, Value::Int(n)) => {
                if n < min || n > max {
                    Err(TypeError::OutOfRange {
                        what: "value".to_string(),
                        got: *n,
                        min: *min,
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }

            (AttributeType::Custom { validate, .. }, v) => {
                validate(v).map_err(|msg| TypeError::ValidationFailed { message: msg })
            }

            (AttributeType::List(inner), Value::List(items)) => validate_items(inner, items),

            (AttributeType::BoundedList { inner, min, max }, Value::List(items)) => {
                if items.len() < *min || items.len() > *max {
                    return Err(TypeError::OutOfRange {
                        what: "list length".to_string(),
                        got: items.len() as i64,
                        min: *min as i64,
                        max: *max as i64,
                    });
                }
                validate_items(inner, items)
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name(),
            }),
        }
    }

    /// The value a declared attribute takes when the remote entity lacks it
    pub fn zero_value(&self) -> Value {
        match self {
            AttributeType::String
            | AttributeType::Enum(_)
            | AttributeType::BoundedString { .. } => Value::String(String::new()),
            AttributeType::Int | AttributeType::BoundedInt { .. } => Value::Int(0),
            AttributeType::Bool => Value::Bool(false),
            AttributeType::Custom { base, .. } => base.zero_value(),
            AttributeType::List(_) | AttributeType::BoundedList { .. } => Value::List(Vec::new()),
            AttributeType::Map(_) => Value::Map(HashMap::new()),
        }
    }

    /// Human-readable type, e.g. `List<String>[1..=4]`
    pub fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::BoundedString { min, max } => format!("String[{}..={}]", min, max),
            AttributeType::BoundedInt { min, max } => format!("Int[{}..={}]", min, max),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::BoundedList { inner, min, max } => {
                format!("List<{}>[{}..={}]", inner.type_name(), min, max)
            }
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
        }
    }
}

fn validate_items(inner: &AttributeType, items: &[Value]) -> Result<(), TypeError> {
    for (i, item) in items.iter().enumerate() {
        inner.validate(item).map_err(|e| TypeError::ListItemError {
            index: i,
            inner: Box::new(e),
        })?;
    }
    Ok(())
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("{what} is {got}, expected [{min}, {max}]")]
    OutOfRange {
        what: String,
        got: i64,
        min: i64,
        max: i64,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Attribute '{name}': {inner}")]
    AttributeError { name: String, inner: Box<TypeError> },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },
}

impl Value {
    fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
        }
    }
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    /// Filled in by the remote side when not given
    pub computed: bool,
    /// Changing this attribute requires recreating the resource
    pub force_new: bool,
    /// Sent to the API but never read back (e.g., passwords)
    pub write_only: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            computed: false,
            force_new: false,
            write_only: false,
            default: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();

        for (name, schema) in &self.attributes {
            if schema.required && !attributes.contains_key(name) && schema.default.is_none() {
                errors.push(TypeError::MissingRequired { name: name.clone() });
            }
        }

        for (name, value) in attributes {
            if let Some(schema) = self.attributes.get(name)
                && let Err(e) = schema.attr_type.validate(value)
            {
                errors.push(TypeError::AttributeError {
                    name: name.clone(),
                    inner: Box::new(e),
                });
            }
            // Unknown attributes are allowed (for flexibility)
        }

        if errors.is_empty() {
            Ok(())
        } else {
            errors.sort_by_key(|e| e.to_string());
            Err(errors)
        }
    }

    /// Fill declared defaults into a desired attribute set
    pub fn apply_defaults(&self, attributes: &mut HashMap<String, Value>) {
        for (name, schema) in &self.attributes {
            if let Some(default) = &schema.default {
                attributes
                    .entry(name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
    }

    /// Give every readable attribute a value, using the zero value of its
    /// type where the mapped entity had none
    pub fn complete(&self, mut attributes: HashMap<String, Value>) -> HashMap<String, Value> {
        for (name, schema) in self.attributes.iter().filter(|(_, s)| !s.write_only) {
            attributes
                .entry(name.clone())
                .or_insert_with(|| schema.attr_type.zero_value());
        }
        attributes
    }

    /// Names of force-new attributes whose desired value differs from the
    /// current state, sorted
    pub fn force_new_changes(
        &self,
        current: &HashMap<String, Value>,
        desired: &HashMap<String, Value>,
    ) -> Vec<String> {
        let mut changed: Vec<String> = self
            .attributes
            .values()
            .filter(|schema| schema.force_new)
            .filter(|schema| match desired.get(&schema.name) {
                Some(value) => current.get(&schema.name) != Some(value),
                None => false,
            })
            .map(|schema| schema.name.clone())
            .collect();
        changed.sort();
        changed
    }
}

/// Helper functions for common types
pub mod types {
    use super::*;

    /// IPv4 CIDR network address (e.g., "10.0.0.0/16")
    pub fn cidr() -> AttributeType {
        AttributeType::Custom {
            name: "Cidr".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| {
                if let Value::String(s) = value {
                    validate_cidr(s)
                } else {
                    Err("Expected string".to_string())
                }
            },
        }
    }

    /// Resource name: 1 to 60 characters
    pub fn name() -> AttributeType {
        AttributeType::BoundedString { min: 1, max: 60 }
    }

    pub fn string_list() -> AttributeType {
        AttributeType::List(Box::new(AttributeType::String))
    }

    pub fn enum_of(values: &[&str]) -> AttributeType {
        AttributeType::Enum(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Validate that a string is an IPv4 CIDR whose address is the network
/// address of its prefix ("10.0.0.0/16" passes, "10.0.0.1/16" does not)
pub fn validate_cidr(cidr: &str) -> Result<(), String> {
    let Some((ip, prefix)) = cidr.split_once('/') else {
        return Err(format!(
            "Invalid CIDR format '{}': expected IP/prefix",
            cidr
        ));
    };

    let addr: Ipv4Addr = ip
        .parse()
        .map_err(|_| format!("Invalid IP address '{}' in CIDR '{}'", ip, cidr))?;

    let prefix: u32 = match prefix.parse() {
        Ok(p) if p <= 32 => p,
        Ok(p) => return Err(format!("Invalid prefix length '{}': must be 0-32", p)),
        Err(_) => {
            return Err(format!(
                "Invalid prefix length '{}': must be a number",
                prefix
            ));
        }
    };

    let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
    let bits = u32::from(addr);
    if bits & mask != bits {
        return Err(format!(
            "'{}' is not a network address, expected {}/{}",
            cidr,
            Ipv4Addr::from(bits & mask),
            prefix
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_enum_type() {
        let t = types::enum_of(&["CVM", "EIP"]);
        assert!(t.validate(&Value::from("CVM")).is_ok());
        assert!(t.validate(&Value::from("cvm")).is_err());
        assert!(t.validate(&Value::Int(1)).is_err());
    }

    #[test]
    fn bounded_list_rejects_out_of_range_length() {
        let t = AttributeType::BoundedList {
            inner: Box::new(AttributeType::String),
            min: 1,
            max: 4,
        };
        assert!(t.validate(&Value::string_list(["119.29.29.29"])).is_ok());
        assert!(t.validate(&Value::List(vec![])).is_err());
        let five = Value::string_list(["a", "b", "c", "d", "e"]);
        assert!(matches!(
            t.validate(&five),
            Err(TypeError::OutOfRange { got: 5, .. })
        ));
    }

    #[test]
    fn name_length_counts_characters() {
        let t = types::name();
        assert!(t.validate(&Value::from("a")).is_ok());
        assert!(t.validate(&Value::from("")).is_err());
        assert!(t.validate(&Value::from("x".repeat(61))).is_err());
        assert!(t.validate(&Value::from("网".repeat(60))).is_ok());
    }

    #[test]
    fn missing_required_attribute() {
        let schema = ResourceSchema::new("vpc")
            .attribute(AttributeSchema::new("cidr_block", types::cidr()).required());

        let result = schema.validate(&HashMap::new());
        assert!(matches!(
            result.unwrap_err().as_slice(),
            [TypeError::MissingRequired { name }] if name == "cidr_block"
        ));
    }

    #[test]
    fn complete_fills_zero_values() {
        let schema = ResourceSchema::new("subnet")
            .attribute(AttributeSchema::new("name", AttributeType::String))
            .attribute(AttributeSchema::new("available_ip_count", AttributeType::Int))
            .attribute(AttributeSchema::new("is_default", AttributeType::Bool))
            .attribute(AttributeSchema::new("subnet_ids", types::string_list()))
            .attribute(AttributeSchema::new("password", AttributeType::String).write_only());

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::from("app"));
        let complete = schema.complete(attrs);

        assert!(!complete.contains_key("password"));
        assert_eq!(complete["name"], Value::from("app"));
        assert_eq!(complete["available_ip_count"], Value::Int(0));
        assert_eq!(complete["is_default"], Value::Bool(false));
        assert_eq!(complete["subnet_ids"], Value::List(vec![]));
    }

    #[test]
    fn apply_defaults_keeps_given_values() {
        let schema = ResourceSchema::new("vpc").attribute(
            AttributeSchema::new("is_multicast", AttributeType::Bool).with_default(true),
        );
        let mut attrs = HashMap::new();
        schema.apply_defaults(&mut attrs);
        assert_eq!(attrs["is_multicast"], Value::Bool(true));

        attrs.insert("is_multicast".to_string(), Value::Bool(false));
        schema.apply_defaults(&mut attrs);
        assert_eq!(attrs["is_multicast"], Value::Bool(false));
    }

    #[test]
    fn force_new_changes_only_reports_changed_immutables() {
        let schema = ResourceSchema::new("vpc")
            .attribute(AttributeSchema::new("cidr_block", types::cidr()).force_new())
            .attribute(AttributeSchema::new("name", types::name()));

        let current = HashMap::from([
            ("cidr_block".to_string(), Value::from("10.0.0.0/16")),
            ("name".to_string(), Value::from("old")),
        ]);
        let renamed = HashMap::from([
            ("cidr_block".to_string(), Value::from("10.0.0.0/16")),
            ("name".to_string(), Value::from("new")),
        ]);
        assert!(schema.force_new_changes(&current, &renamed).is_empty());

        let moved = HashMap::from([("cidr_block".to_string(), Value::from("10.1.0.0/16"))]);
        assert_eq!(schema.force_new_changes(&current, &moved), vec!["cidr_block"]);
    }

    #[test]
    fn validate_cidr_type() {
        let t = types::cidr();

        assert!(t.validate(&Value::from("10.0.0.0/16")).is_ok());
        assert!(t.validate(&Value::from("192.168.1.0/24")).is_ok());
        assert!(t.validate(&Value::from("0.0.0.0/0")).is_ok());
        assert!(t.validate(&Value::from("255.255.255.255/32")).is_ok());

        assert!(t.validate(&Value::from("10.0.0.0")).is_err()); // no prefix
        assert!(t.validate(&Value::from("10.0.0.0/33")).is_err()); // prefix too large
        assert!(t.validate(&Value::from("10.0.0.256/16")).is_err()); // octet > 255
        assert!(t.validate(&Value::from("10.0.0/16")).is_err()); // only 3 octets
        assert!(t.validate(&Value::from("10.0.0.1/16")).is_err()); // host bits set
        assert!(t.validate(&Value::Int(42)).is_err());
    }
}
