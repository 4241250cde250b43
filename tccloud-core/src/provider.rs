//! Provider - Trait abstracting resource operations
//!
//! A Provider maps the four lifecycle operations onto a cloud API.
//! It is responsible for turning declared resources into remote calls and
//! remote entities back into flat state.

use std::future::Future;
use std::pin::Pin;

use crate::resource::{Resource, ResourceId, State};
use crate::schema::ResourceSchema;

/// Error returned by the remote API (or the transport in front of it)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("api[{action}] failed with code {code}: {message}")]
pub struct ApiError {
    /// Action that failed (e.g., "DescribeVpcs")
    pub action: String,
    /// Machine-readable error code (e.g., "ResourceNotFound")
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

impl ApiError {
    pub fn new(
        action: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Whether the error code is one of the given not-found codes
    pub fn is_not_found(&self, not_found_codes: &[&str]) -> bool {
        not_found_codes.contains(&self.code.as_str())
    }
}

/// What went wrong in a provider operation
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Local check failed before any remote call
    #[error("validation failed: {0}")]
    Validation(String),

    /// A lookup expected to be unique matched more than one entity
    #[error("expected at most one {entity} for {key}, found {count}")]
    Integrity {
        entity: String,
        key: String,
        count: usize,
    },

    #[error(transparent)]
    Remote(#[from] ApiError),

    /// A polled async request reached a failed terminal status
    #[error("async request {request_id} failed: {message}")]
    AsyncFailure { request_id: String, message: String },

    #[error("async request {request_id} did not finish after {attempts} polls")]
    AsyncTimeout { request_id: String, attempts: u32 },

    /// A response was missing a field the operation depends on
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Error type for Provider operations
#[derive(Debug)]
pub struct ProviderError {
    pub kind: ErrorKind,
    pub resource_id: Option<ResourceId>,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.resource_id {
            write!(f, "[{}.{}] {}", id.resource_type, id.name, self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Remote(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ErrorKind> for ProviderError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            resource_id: None,
        }
    }
}

impl From<ApiError> for ProviderError {
    fn from(err: ApiError) -> Self {
        ErrorKind::Remote(err).into()
    }
}

impl ProviderError {
    pub fn validation(message: impl Into<String>) -> Self {
        ErrorKind::Validation(message.into()).into()
    }

    pub fn integrity(entity: impl Into<String>, key: impl Into<String>, count: usize) -> Self {
        ErrorKind::Integrity {
            entity: entity.into(),
            key: key.into(),
            count,
        }
        .into()
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ErrorKind::Malformed(message.into()).into()
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        ErrorKind::Unsupported(message.into()).into()
    }

    /// Attach the resource the error belongs to, keeping an existing one
    pub fn for_resource(mut self, id: ResourceId) -> Self {
        if self.resource_id.is_none() {
            self.resource_id = Some(id);
        }
        self
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.kind, ErrorKind::Validation(_))
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self.kind, ErrorKind::Integrity { .. })
    }

    /// The remote error, if this failure came from the API
    pub fn api_error(&self) -> Option<&ApiError> {
        match &self.kind {
            ErrorKind::Remote(e) => Some(e),
            _ => None,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Return type for async operations
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Definition of resource types that a Provider can handle
pub trait ResourceType: Send + Sync {
    /// Resource type name (e.g., "vpc")
    fn name(&self) -> &'static str;

    /// Attribute schema for this resource type
    fn schema(&self) -> ResourceSchema;

    /// Data sources only support `Provider::query`
    fn is_data_source(&self) -> bool {
        false
    }
}

/// Main Provider trait
///
/// All operations are async and involve side effects, except `read` and
/// `query` which never mutate remote state.
pub trait Provider: Send + Sync {
    /// Name of this Provider (e.g., "tencentcloud")
    fn name(&self) -> &'static str;

    /// List of resource types this Provider can handle
    fn resource_types(&self) -> Vec<Box<dyn ResourceType>>;

    /// Get the current state of a resource
    ///
    /// Returns `State::not_found()` if the resource does not exist or if no
    /// identifier is known yet.
    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Create a resource
    ///
    /// Returns State with identifier set to the provider-issued ID
    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;

    /// Update a resource in place
    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>>;

    /// Delete a resource; deleting an absent resource succeeds
    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>>;

    /// Evaluate a data source (read-only resource) against its filters
    fn query(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>>;
}

/// Provider implementation for Box<dyn Provider>
/// This enables dynamic dispatch for Providers
impl Provider for Box<dyn Provider> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        (**self).resource_types()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).read(id, identifier)
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).create(resource)
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).update(id, identifier, from, to)
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        (**self).delete(id, identifier)
    }

    fn query(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        (**self).query(resource)
    }
}
