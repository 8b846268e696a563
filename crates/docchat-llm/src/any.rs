//! Enum dispatch over the available provider backends.

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

use crate::compatible::CompatibleProvider;
#[cfg(any(test, feature = "mock"))]
use crate::mock::MockProvider;

#[derive(Debug, Clone)]
pub enum AnyProvider {
    Compatible(CompatibleProvider),
    #[cfg(any(test, feature = "mock"))]
    Mock(MockProvider),
}

impl LlmProvider for AnyProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        match self {
            Self::Compatible(p) => p.chat(messages).await,
            #[cfg(any(test, feature = "mock"))]
            Self::Mock(p) => p.chat(messages).await,
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        match self {
            Self::Compatible(p) => p.embed(text).await,
            #[cfg(any(test, feature = "mock"))]
            Self::Mock(p) => p.embed(text).await,
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        match self {
            Self::Compatible(p) => p.embed_batch(texts).await,
            #[cfg(any(test, feature = "mock"))]
            Self::Mock(p) => p.embed_batch(texts).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Compatible(p) => p.name(),
            #[cfg(any(test, feature = "mock"))]
            Self::Mock(p) => p.name(),
        }
    }
}
