//! Service layer
//!
//! `VpcService` and `MysqlService` translate provider operations into API
//! actions. Both talk to the API through [`ApiClient`], which encodes typed
//! requests, logs every call and decodes typed responses.

pub mod mysql;
pub mod vpc;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tccloud_core::context::RequestContext;
use tccloud_core::provider::{ProviderError, ProviderResult};

use crate::transport::{Service, Transport};

pub use mysql::MysqlService;
pub use vpc::VpcService;

/// Request fields never written to the log
const REDACTED_FIELDS: &[&str] = &["Password", "NewPassword"];

fn redact(mut body: JsonValue) -> JsonValue {
    if let JsonValue::Object(map) = &mut body {
        for field in REDACTED_FIELDS {
            if let Some(value) = map.get_mut(*field) {
                *value = JsonValue::String("******".to_string());
            }
        }
    }
    body
}

/// Deserialize `null` as the type's default (the API sends `null` for empty sets)
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat a remote not-found error as success
pub(crate) fn ignore_not_found(result: ProviderResult<()>, service: Service) -> ProviderResult<()> {
    match result {
        Err(e) if is_not_found(&e, service) => {
            tracing::debug!(error = %e, "entity already gone");
            Ok(())
        }
        other => other,
    }
}

/// Whether an error is the service's not-found signal
pub(crate) fn is_not_found(err: &ProviderError, service: Service) -> bool {
    err.api_error()
        .is_some_and(|api| api.is_not_found(service.not_found_codes()))
}

/// Typed, logged access to a [`Transport`]
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn call<Req, Resp>(
        &self,
        ctx: &RequestContext,
        service: Service,
        action: &str,
        request: &Req,
    ) -> ProviderResult<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let body = serde_json::to_value(request).map_err(|e| {
            ProviderError::malformed(format!("failed to encode {} request: {}", action, e))
        })?;

        match self
            .transport
            .call(ctx, service, action, body.clone())
            .await
        {
            Ok(response) => {
                tracing::debug!(
                    log_id = %ctx.log_id,
                    %service,
                    action,
                    request = %redact(body),
                    response = %response,
                    "api success"
                );
                serde_json::from_value(response).map_err(|e| {
                    ProviderError::malformed(format!("failed to decode {} response: {}", action, e))
                })
            }
            Err(err) => {
                tracing::error!(
                    log_id = %ctx.log_id,
                    %service,
                    action,
                    request = %redact(body),
                    reason = %err,
                    "api fail"
                );
                Err(err.into())
            }
        }
    }
}
