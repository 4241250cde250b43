//! Tencent Cloud Provider
//!
//! VPC and MySQL provider over the Tencent Cloud API.
//!
//! ## Module Structure
//!
//! - `config` - Provider configuration file and environment overrides
//! - `transport` / `http` - Request transport and the signed HTTP implementation
//! - `service` - Typed VPC and MySQL API operations
//! - `async_request` - Polling of asynchronous MySQL requests
//! - `handlers` - Per-resource lifecycle and attribute mapping
//! - `data_sources` - Read-only queries
//! - `schemas` / `resources` - Resource schemas and type definitions
//! - `provider` - TencentCloudProvider orchestration

pub mod async_request;
pub mod config;
pub mod data_sources;
pub mod handlers;
pub mod http;
pub mod provider;
pub mod resources;
pub mod route_entry_id;
pub mod schemas;
pub mod service;
pub mod transport;

// Re-export main types
pub use config::{ConfigError, ProviderConfig};
pub use provider::TencentCloudProvider;
pub use route_entry_id::RouteEntryId;
pub use transport::{Service, Transport};

use tccloud_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use tccloud_core::resource::{Resource, ResourceId, State};

use resources::resource_types;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for TencentCloudProvider {
    fn name(&self) -> &'static str {
        "tencentcloud"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resource_types()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_resource(&id, identifier.as_deref()).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(&resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.update_resource(&id, &identifier, &from, &to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&id, &identifier).await })
    }

    fn query(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.query_data_source(&resource).await })
    }
}
