//! HTTP transport for the Tencent Cloud API
//!
//! Every action is a JSON `POST /` against the service host, signed with
//! TC3-HMAC-SHA256.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use tccloud_core::context::RequestContext;
use tccloud_core::provider::ApiError;

use crate::config::{ConfigError, Credentials, ProviderConfig};
use crate::transport::{Service, Transport};

const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host";

type HmacSha256 = Hmac<Sha256>;

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

fn truncate_for_log(body: &str) -> String {
    if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    }
}

/// Signed JSON-over-HTTPS transport
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
    region: String,
    endpoint: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let credentials = config.credentials()?;
        let client = Client::builder()
            .user_agent(concat!("tccloud/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    /// URL to post to and the host it is signed for
    fn target(&self, service: Service) -> Result<(String, String), ApiError> {
        match &self.endpoint {
            None => {
                let host = service.host();
                Ok((format!("https://{}/", host), host))
            }
            Some(endpoint) => {
                let url = reqwest::Url::parse(endpoint).map_err(|e| {
                    ApiError::new("", "ClientError.InvalidEndpoint", e.to_string())
                })?;
                let host = match (url.host_str(), url.port()) {
                    (Some(h), Some(p)) => format!("{}:{}", h, p),
                    (Some(h), None) => h.to_string(),
                    (None, _) => {
                        return Err(ApiError::new(
                            "",
                            "ClientError.InvalidEndpoint",
                            format!("endpoint '{}' has no host", endpoint),
                        ));
                    }
                };
                Ok((url.to_string(), host))
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        ctx: &RequestContext,
        service: Service,
        action: &str,
        request: JsonValue,
    ) -> Result<JsonValue, ApiError> {
        let (url, host) = self
            .target(service)
            .map_err(|e| ApiError { action: action.to_string(), ..e })?;
        let payload = request.to_string();
        let now = Utc::now();
        let authorization = sign(&self.credentials, service, &host, &payload, now)
            .map_err(|e| ApiError::new(action, "ClientError.SigningError", e.to_string()))?;

        tracing::debug!(log_id = %ctx.log_id, action, %url, "POST");

        let response = self
            .client
            .post(&url)
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("Host", &host)
            .header("X-TC-Action", action)
            .header("X-TC-Version", service.version())
            .header("X-TC-Region", &self.region)
            .header("X-TC-Timestamp", now.timestamp().to_string())
            .body(payload)
            .send()
            .await
            .map_err(|e| ApiError::new(action, "ClientError.NetworkError", e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::new(action, "ClientError.NetworkError", e.to_string()))?;

        if !status.is_success() {
            tracing::error!(
                log_id = %ctx.log_id,
                action,
                %status,
                body = %truncate_for_log(&body),
                "API error"
            );
            return Err(ApiError::new(
                action,
                "ClientError.HttpStatusCodeError",
                format!("{} - {}", status, truncate_for_log(&body)),
            ));
        }

        parse_envelope(action, &body)
    }
}

/// Unwrap `{"Response": {...}}`, turning `Response.Error` into an [`ApiError`]
pub fn parse_envelope(action: &str, body: &str) -> Result<JsonValue, ApiError> {
    let parse_error = |msg: String| ApiError::new(action, "ClientError.ParseJsonError", msg);

    let mut envelope: JsonValue =
        serde_json::from_str(body).map_err(|e| parse_error(e.to_string()))?;
    let response = envelope
        .get_mut("Response")
        .map(JsonValue::take)
        .ok_or_else(|| parse_error("response has no Response field".to_string()))?;

    let request_id = response
        .get("RequestId")
        .and_then(JsonValue::as_str)
        .map(String::from);

    if let Some(error) = response.get("Error") {
        let code = error.get("Code").and_then(JsonValue::as_str).unwrap_or("");
        let message = error.get("Message").and_then(JsonValue::as_str).unwrap_or("");
        let err = ApiError::new(action, code, message);
        return Err(match request_id {
            Some(id) => err.with_request_id(id),
            None => err,
        });
    }

    Ok(response)
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32], InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Build the TC3-HMAC-SHA256 `Authorization` header value
fn sign(
    credentials: &Credentials,
    service: Service,
    host: &str,
    payload: &str,
    now: DateTime<Utc>,
) -> Result<String, InvalidLength> {
    let date = now.format("%Y-%m-%d").to_string();
    let scope = format!("{}/{}/tc3_request", date, service.name());

    let canonical_request = format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\n\n{}\n{}",
        CONTENT_TYPE,
        host,
        SIGNED_HEADERS,
        sha256_hex(payload.as_bytes())
    );
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        now.timestamp(),
        scope,
        sha256_hex(canonical_request.as_bytes())
    );

    let secret_date = hmac_sha256(
        format!("TC3{}", credentials.secret_key).as_bytes(),
        date.as_bytes(),
    )?;
    let secret_service = hmac_sha256(&secret_date, service.name().as_bytes())?;
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, credentials.secret_id, scope, SIGNED_HEADERS, signature
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hmac_matches_rfc4231_case_1() {
        let mac = hmac_sha256(&[0x0bu8; 20], b"Hi There").unwrap();
        assert_eq!(
            hex::encode(mac),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn hmac_matches_rfc4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(mac),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn hmac_hashes_long_keys() {
        let key = [0xaau8; 131];
        let mac =
            hmac_sha256(&key, b"Test Using Larger Than Block-Size Key - Hash Key First").unwrap();
        assert_eq!(
            hex::encode(mac),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
    }

    #[test]
    fn authorization_header_layout() {
        let credentials = Credentials {
            secret_id: "AKIDEXAMPLE".to_string(),
            secret_key: "secret".to_string(),
        };
        let now = Utc.with_ymd_and_hms(2019, 2, 25, 8, 44, 11).unwrap();
        let header = sign(
            &credentials,
            Service::Cdb,
            "cdb.tencentcloudapi.com",
            "{}",
            now,
        )
        .unwrap();

        assert!(header.starts_with(concat!(
            "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2019-02-25/cdb/tc3_request, ",
            "SignedHeaders=content-type;host, Signature="
        )));
        let signature = header.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);

        let again =
            sign(&credentials, Service::Cdb, "cdb.tencentcloudapi.com", "{}", now).unwrap();
        assert_eq!(header, again);
    }

    #[test]
    fn envelope_error_becomes_api_error() {
        let body = r#"{"Response":{
            "Error":{"Code":"ResourceNotFound","Message":"no such vpc"},
            "RequestId":"req-1"
        }}"#;
        let err = parse_envelope("DescribeVpcs", body).unwrap_err();
        assert_eq!(err.code, "ResourceNotFound");
        assert_eq!(err.message, "no such vpc");
        assert_eq!(err.action, "DescribeVpcs");
        assert_eq!(err.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn envelope_success_unwraps_response() {
        let body = r#"{"Response":{"TotalCount":0,"VpcSet":[],"RequestId":"req-2"}}"#;
        let response = parse_envelope("DescribeVpcs", body).unwrap();
        assert_eq!(response["TotalCount"], 0);
    }

    #[test]
    fn envelope_without_response_is_parse_error() {
        let err = parse_envelope("DescribeVpcs", r#"{"foo":1}"#).unwrap_err();
        assert_eq!(err.code, "ClientError.ParseJsonError");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "网".repeat(100);
        let truncated = truncate_for_log(&body);
        assert!(truncated.contains("truncated"));
    }
}
