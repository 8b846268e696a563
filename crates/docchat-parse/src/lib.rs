//! Client for the external document-digitization API.
//!
//! The service does no parsing of its own: an uploaded file is streamed to
//! the digitization endpoint and the structured payload (HTML/text) comes
//! back verbatim.

pub mod error;

use std::fmt;

use docchat_llm::error::api_message;
use docchat_llm::http::default_client;

pub use error::ParseError;

/// Output formats requested from the digitization API.
const OUTPUT_FORMATS: [&str; 2] = ["html", "text"];

pub struct ParseClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl fmt::Debug for ParseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Clone for ParseClient {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
        }
    }
}

impl ParseClient {
    #[must_use]
    pub fn new(api_key: String, mut base_url: String, model: String) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: default_client(),
            api_key,
            base_url,
            model,
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Forward an uploaded file to the digitization API and return its JSON
    /// payload verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails, the API responds with a non-2xx
    /// status, or the response body is not valid JSON.
    pub async fn parse(
        &self,
        file: Vec<u8>,
        filename: String,
        content_type: String,
    ) -> Result<serde_json::Value, ParseError> {
        let part = reqwest::multipart::Part::bytes(file)
            .file_name(filename)
            .mime_str(&content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("document", part)
            .text(
                "output_formats",
                serde_json::to_string(&OUTPUT_FORMATS)?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post(format!("{}/document-digitization", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!("document digitization API error {status}: {text}");
            return Err(ParseError::Api {
                status: status.as_u16(),
                message: api_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
