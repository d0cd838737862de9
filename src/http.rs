//! HTTP plumbing shared by the streaming and non-streaming paths.
//!
//! Builds the `reqwest` client, the header set the API expects, and maps
//! failure responses to [`ClientError::Api`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::client::{ApiErrorDetail, ClientError};
use crate::options::ClientConfig;

/// Authentication header. The API does not use `Authorization: Bearer`.
pub const API_KEY_HEADER: &str = "api-key";

/// Media type requested for streaming responses.
pub const EVENT_STREAM: &str = "text/event-stream";

/// Build a configured HTTP client from the client config.
///
/// This applies common configuration like timeouts and proxies.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut builder = Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    Ok(builder.build()?)
}

/// Headers sent with every request.
///
/// Streaming requests ask for an event stream and disable caching. Extra
/// headers from the config are applied last and replace a default of the
/// same name.
pub fn default_headers(config: &ClientConfig, stream: bool) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| ClientError::Config("Invalid API key".to_string()))?,
    );

    if stream {
        headers.insert(ACCEPT, HeaderValue::from_static(EVENT_STREAM));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    } else {
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    }

    if let Some(extra) = &config.extra_headers {
        for (key, value) in extra {
            let name = HeaderName::try_from(key.as_str())
                .map_err(|e| ClientError::Config(format!("Invalid header name {key}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::Config(format!("Invalid value for header {key}: {e}")))?;
            headers.insert(name, value);
        }
    }

    Ok(headers)
}

/// Statuses in `[200, 400)` count as success.
pub fn is_success(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

/// Map a failure response to an error.
///
/// The body is parsed on a best-effort basis; if it is not the usual
/// `{"error": {...}}` shape the error carries only the status code.
pub fn handle_error_response(status: StatusCode, body: &str) -> ClientError {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|resp| ApiErrorDetail {
            message: resp.error.message.unwrap_or_default(),
            error_type: resp.error.error_type.unwrap_or_default(),
            code: match resp.error.code {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(code)) => code,
                Some(other) => other.to_string(),
            },
        });

    ClientError::Api {
        status: status.as_u16(),
        detail,
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    /// Some deployments send a numeric code.
    code: Option<Value>,
}
