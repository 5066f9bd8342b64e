//! One-shot JSON requests shared by both provider clients.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;

/// Upper bound on every provider call. Not configurable.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_BODY_IN_ERROR: usize = 200;

/// Send `request` once, bounded by [`HTTP_TIMEOUT`], and decode a 2xx body as `T`.
pub(crate) async fn get_json<T>(request: RequestBuilder) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let res = request.timeout(HTTP_TIMEOUT).send().await?;

    let status = res.status();
    let body = res.text().await?;
    debug!(status = %status, bytes = body.len(), "provider responded");

    if !status.is_success() {
        return Err(ClientError::Status { status, body: truncate_body(&body) });
    }

    Ok(serde_json::from_str(&body)?)
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_IN_ERROR) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
