use reqwest::StatusCode;
use thiserror::Error;

/// Why a single provider call produced no data.
///
/// The public `get_*` operations collapse every variant into `None`; the
/// `fetch_*` twins hand it back so callers can tell the cases apart.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider responded with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("provider reported an error: {kind}")]
    Remote { kind: String },
}

impl ClientError {
    /// True when the provider answered but rejected the request itself.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Remote { .. })
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Replace every occurrence of `secret` in the error text.
    ///
    /// Needed for providers that put the API key in the URL path.
    pub fn scrubbed(self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }
        let scrub = |s: String| s.replace(secret, "<redacted>");

        match self {
            ClientError::Timeout(m) => ClientError::Timeout(scrub(m)),
            ClientError::Transport(m) => ClientError::Transport(scrub(m)),
            ClientError::Parse(m) => ClientError::Parse(scrub(m)),
            ClientError::Status { status, body } => ClientError::Status { status, body: scrub(body) },
            remote @ ClientError::Remote { .. } => remote,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest includes the full URL in its message, query string and all.
        let msg = redact(&e.to_string());
        if e.is_timeout() {
            ClientError::Timeout(msg)
        } else if e.is_decode() {
            ClientError::Parse(msg)
        } else {
            ClientError::Transport(msg)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Parse(e.to_string())
    }
}

/// Strip query strings out of an error message so API keys never reach logs.
pub(crate) fn redact(msg: &str) -> String {
    let mut out = String::with_capacity(msg.len());
    let mut rest = msg;

    while let Some(idx) = rest.find('?') {
        out.push_str(&rest[..idx]);
        out.push_str("?<query redacted>");
        rest = &rest[idx + 1..];
        let end = rest
            .find(|c: char| c.is_whitespace() || c == ')' || c == '"')
            .unwrap_or(rest.len());
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}
