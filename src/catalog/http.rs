//! HTTP plumbing shared by the catalog clients.

use std::time::Duration;

use super::domain::CatalogError;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// How much of an error body ends up in the error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Build the HTTP client shared by both catalogs.
///
/// One client means one connection pool for every concurrent workflow.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, CatalogError> {
    reqwest::Client::builder()
        .gzip(true)
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {}", e)))
}

/// Turn an error status into a [`CatalogError`], passing successful responses through.
pub async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(CatalogError::Unauthorized(status.as_u16()));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(CatalogError::RateLimited);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CatalogError::Http {
        status: status.as_u16(),
        body: truncate_body(&body),
    })
}

/// Decode a JSON body into a DTO
pub async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CatalogError> {
    response
        .json::<T>()
        .await
        .map_err(|e| CatalogError::Parse(e.to_string()))
}

/// Map a transport failure (connect, timeout, reset) to a [`CatalogError`]
pub fn network_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Network(format!("request timed out: {}", e))
    } else {
        CatalogError::Network(e.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut short: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    short.push('…');
    short
}
