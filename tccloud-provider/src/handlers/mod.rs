//! Per-entity lifecycle handlers
//!
//! Each handler turns one resource type's create/read/update/delete into
//! service calls and maps the fetched entity into flat attributes. Schema
//! validation, read-back after mutation and zero-value completion happen in
//! [`crate::provider`].

pub mod mysql_account;
pub mod mysql_backup_policy;
pub mod mysql_privilege;
pub mod route_table;
pub mod route_table_entry;
pub mod subnet;
pub mod vpc;

use std::collections::HashMap;

use async_trait::async_trait;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::{ProviderError, ProviderResult};
use tccloud_core::resource::{Resource, State, Value};

/// Flat attribute set produced by a mapper
pub type Attributes = HashMap<String, Value>;

#[async_trait]
pub trait Lifecycle: Send + Sync {
    fn resource_type(&self) -> &'static str;

    /// Rules spanning several attributes, checked before any remote call
    fn check(&self, _resource: &Resource) -> ProviderResult<()> {
        Ok(())
    }

    /// Create the entity and return its identifier
    async fn create(&self, ctx: &RequestContext, resource: &Resource) -> ProviderResult<String>;

    /// Fetch the entity; `None` when it does not exist
    async fn read(
        &self,
        ctx: &RequestContext,
        identifier: &str,
    ) -> ProviderResult<Option<Attributes>>;

    /// Apply the desired state of the mutable attributes
    async fn update(
        &self,
        ctx: &RequestContext,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<()>;

    /// Remove the entity; absent entities are not an error
    async fn delete(&self, ctx: &RequestContext, identifier: &str) -> ProviderResult<()>;
}

/// A string attribute that must be present and non-empty
pub(crate) fn required_str<'a>(resource: &'a Resource, key: &str) -> ProviderResult<&'a str> {
    resource
        .get_string(key)
        .ok_or_else(|| ProviderError::validation(format!("{} should be a non-empty string", key)))
}

/// Split a `#`-joined identifier into exactly `N` non-empty parts
pub(crate) fn split_identifier<'a, const N: usize>(
    identifier: &'a str,
    shape: &str,
) -> ProviderResult<[&'a str; N]> {
    let parts: Vec<&str> = identifier.split('#').collect();
    let parts: [&str; N] = parts.try_into().map_err(|_| {
        ProviderError::validation(format!("identifier '{}' must look like {}", identifier, shape))
    })?;
    if parts.iter().any(|p| p.is_empty()) {
        return Err(ProviderError::validation(format!(
            "identifier '{}' must look like {}",
            identifier, shape
        )));
    }
    Ok(parts)
}

/// Owned string attribute
pub(crate) fn string(value: &str) -> Value {
    Value::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_identifier_checks_shape() {
        let [mysql_id, name] = split_identifier::<2>("cdb-1#app", "<mysql_id>#<name>").unwrap();
        assert_eq!((mysql_id, name), ("cdb-1", "app"));

        assert!(split_identifier::<2>("cdb-1", "<mysql_id>#<name>").unwrap_err().is_validation());
        assert!(split_identifier::<2>("cdb-1#", "<mysql_id>#<name>").is_err());
        assert!(split_identifier::<3>("cdb-1#app", "<a>#<b>#<c>").is_err());
    }

    #[test]
    fn required_str_rejects_empty() {
        let resource = Resource::new("subnet", "app").with_attribute("vpc_id", "");
        assert!(required_str(&resource, "vpc_id").unwrap_err().is_validation());
        assert!(required_str(&resource, "zone").is_err());
    }
}
