#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API request failed (status {status}): {message}")]
    Api { status: u16, message: String },
}
