//! Transport seam between the services and the Tencent Cloud API
//!
//! Services only ever speak JSON through [`Transport`]. The HTTP
//! implementation lives in [`crate::http`]; tests plug in an in-memory fake.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::ApiError;

/// Tencent Cloud product an action belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Vpc,
    /// Cloud database (MySQL)
    Cdb,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::Vpc => "vpc",
            Service::Cdb => "cdb",
        }
    }

    /// API version sent in `X-TC-Version`
    pub fn version(&self) -> &'static str {
        match self {
            Service::Vpc => "2017-03-12",
            Service::Cdb => "2017-03-20",
        }
    }

    pub fn host(&self) -> String {
        format!("{}.tencentcloudapi.com", self.name())
    }

    /// Error codes meaning the addressed entity does not exist
    pub fn not_found_codes(&self) -> &'static [&'static str] {
        match self {
            Service::Vpc => &["ResourceNotFound"],
            Service::Cdb => &["InvalidParameter.InstanceNotFound", "InvalidParameter"],
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Executes one API action
///
/// `request` is the action's parameter object. On success the returned value
/// is the content of the `Response` envelope; an error envelope becomes an
/// [`ApiError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        ctx: &RequestContext,
        service: Service,
        action: &str,
        request: JsonValue,
    ) -> Result<JsonValue, ApiError>;
}
