//! Thin HTTP client for the hosted data service.
//!
//! Every request carries the project `apikey` plus a bearer token: the
//! signed-in user's access token when there is one, the anon key otherwise.

use std::time::Duration;

use reqwest::{header::HeaderValue, Method, RequestBuilder, Response, StatusCode};
use url::Url;

use super::error::BackendError;

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

impl RestClient {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, BackendInitError> {
        let base_url = Url::parse(base_url).map_err(|error| BackendInitError::InvalidUrl {
            url: base_url.to_owned(),
            details: error.to_string(),
        })?;
        HeaderValue::from_str(anon_key).map_err(|_| BackendInitError::InvalidKey)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("codebluer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| BackendInitError::Client(error.to_string()))?;

        Ok(Self {
            http,
            base_url,
            anon_key: anon_key.to_owned(),
        })
    }

    /// Absolute URL for a service path such as `/rest/v1/rooms`.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| BackendError::Decode {
                url: path.to_owned(),
                details: error.to_string(),
            })
    }

    pub fn request(&self, method: Method, url: &Url, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        self.http
            .request(method, url.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    pub async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, BackendError> {
        tracing::debug!(url = %redacted(url), "backend request");
        let response = request.send().await.map_err(|source| BackendError::Transport {
            url: redacted(url),
            source,
        })?;
        check_response(response, url).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendInitError {
    InvalidUrl { url: String, details: String },
    InvalidKey,
    Client(String),
}

impl std::fmt::Display for BackendInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl { url, details } => write!(f, "invalid backend url `{url}`: {details}"),
            Self::InvalidKey => f.write_str("anon key contains characters not allowed in a header"),
            Self::Client(details) => write!(f, "http client could not be built: {details}"),
        }
    }
}

impl std::error::Error for BackendInitError {}

async fn check_response(response: Response, url: &Url) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = redacted(url);
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);

    Err(match status {
        StatusCode::UNAUTHORIZED => BackendError::Unauthorized { url, message },
        StatusCode::NOT_FOUND => BackendError::NotFound { url },
        _ => BackendError::Status {
            status: status.as_u16(),
            url,
            message,
        },
    })
}

/// Pulls the human-readable part out of an error body. The auth and REST
/// services use different field names for it.
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_owned();
    };

    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|field| value.get(field).and_then(serde_json::Value::as_str))
        .map(str::to_owned)
        .unwrap_or_else(|| body.trim().to_owned())
}

/// Query strings can carry tokens; keep only scheme, host and path.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}
