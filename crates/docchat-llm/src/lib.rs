//! LLM provider abstraction and the OpenAI-compatible HTTP backend.

pub mod any;
pub mod compatible;
pub mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod provider;

pub use any::AnyProvider;
pub use error::LlmError;
pub use provider::LlmProvider;
