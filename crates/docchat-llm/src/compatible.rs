//! Provider for OpenAI-compatible chat-completion and embedding APIs.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, api_message};
use crate::provider::{LlmProvider, Message, Role};

pub struct CompatibleProvider {
    client: reqwest::Client,
    provider_name: String,
    api_key: String,
    base_url: String,
    chat_model: String,
    embedding_model: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl fmt::Debug for CompatibleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatibleProvider")
            .field("provider_name", &self.provider_name)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl Clone for CompatibleProvider {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            provider_name: self.provider_name.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            chat_model: self.chat_model.clone(),
            embedding_model: self.embedding_model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl CompatibleProvider {
    #[must_use]
    pub fn new(
        provider_name: String,
        api_key: String,
        mut base_url: String,
        chat_model: String,
        embedding_model: Option<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: crate::http::default_client(),
            provider_name,
            api_key,
            base_url,
            chat_model,
            embedding_model,
            max_tokens,
            temperature,
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    async fn send_chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        let api_messages = convert_messages(messages);
        let body = ChatRequest {
            model: &self.chat_model,
            messages: &api_messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            tracing::error!("chat completion API error {status}: {text}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_message(&text),
            });
        }

        let resp: ChatResponse = serde_json::from_str(&text)?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::EmptyResponse {
                provider: self.provider_name.clone(),
            })
    }

    async fn send_embeddings(
        &self,
        input: EmbeddingInput<'_>,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, LlmError> {
        let model = self
            .embedding_model
            .as_deref()
            .ok_or_else(|| LlmError::EmbedUnsupported {
                provider: self.provider_name.clone(),
            })?;

        let body = EmbeddingRequest { input, model };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            tracing::error!("embedding API error {status}: {text}");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_message(&text),
            });
        }

        let resp: EmbeddingResponse = serde_json::from_str(&text)?;
        let mut data = resp.data;
        if data.is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: self.provider_name.clone(),
            });
        }
        if data.len() != expected {
            return Err(LlmError::Other(format!(
                "embedding count mismatch: requested {expected}, received {}",
                data.len()
            )));
        }
        // The API may return entries out of order; the index field is authoritative.
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

impl LlmProvider for CompatibleProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        match self.send_chat(messages).await {
            Err(LlmError::RateLimited) => {
                tracing::warn!("{} rate limited, retrying in 1s", self.provider_name);
                tokio::time::sleep(Duration::from_secs(1)).await;
                self.send_chat(messages).await
            }
            other => other,
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let mut vectors = self.send_embeddings(EmbeddingInput::Single(text), 1).await?;
        Ok(vectors.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.send_embeddings(EmbeddingInput::Batch(texts), texts.len())
            .await
    }

    fn name(&self) -> &str {
        &self.provider_name
    }
}

fn convert_messages(messages: &[Message]) -> Vec<ApiMessage<'_>> {
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            ApiMessage {
                role,
                content: &msg.content,
            }
        })
        .collect()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ApiMessage<'a>],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EmbeddingInput<'a> {
    Single(&'a str),
    Batch(&'a [String]),
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: EmbeddingInput<'a>,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
