//! Test-only mock LLM provider with deterministic embeddings and call counters.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    pub default_response: String,
    pub dimension: usize,
    pub fail_chat: bool,
    pub fail_embed: bool,
    chat_calls: Arc<AtomicUsize>,
    embed_calls: Arc<AtomicUsize>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            dimension: 8,
            fail_chat: false,
            fail_embed: false,
            chat_calls: Arc::new(AtomicUsize::new(0)),
            embed_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            fail_embed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Number of `chat` calls made against this mock (shared across clones).
    #[must_use]
    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    /// Number of `embed`/`embed_batch` calls made against this mock (shared
    /// across clones).
    #[must_use]
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        // Deterministic pseudo-embedding seeded from the input bytes so tests
        // get stable, text-dependent vectors without a model.
        let mut state = 0x9E37_79B9u32;
        for b in text.bytes() {
            state = state.wrapping_mul(31).wrapping_add(u32::from(b));
        }
        (0..self.dimension)
            .map(|i| {
                state = state
                    .wrapping_mul(1_664_525)
                    .wrapping_add(1_013_904_223 ^ u32::try_from(i).unwrap_or(0));
                #[allow(clippy::cast_precision_loss)]
                let v = (state >> 16) as f32 / 65_536.0;
                v
            })
            .collect()
    }
}

impl LlmProvider for MockProvider {
    async fn chat(&self, _messages: &[Message]) -> Result<String, LlmError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_chat {
            return Err(LlmError::Other("mock chat error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_embed {
            return Err(LlmError::Other("mock embed error".into()));
        }
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_embed {
            return Err(LlmError::Other("mock embed error".into()));
        }
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}
