#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rate limited")]
    RateLimited,

    #[error("API request failed (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: String },

    #[error("embedding not supported by {provider}")]
    EmbedUnsupported { provider: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;

/// Best-effort extraction of an upstream error message from a JSON body.
///
/// Falls back to a truncated excerpt of the raw body when no `message` or
/// `error.message` field is present.
#[must_use]
pub fn api_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.get("message").and_then(|v| v.as_str()) {
            return msg.to_owned();
        }
        if let Some(msg) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
        {
            return msg.to_owned();
        }
    }
    let mut excerpt: String = body.chars().take(200).collect();
    if excerpt.is_empty() {
        excerpt = "no response body".to_owned();
    }
    excerpt
}
