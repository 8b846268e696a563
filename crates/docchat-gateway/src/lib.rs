//! HTTP gateway for the docchat RAG service: JSON API endpoints plus the
//! embedded chat and upload pages.

mod error;
mod handlers;
mod router;
mod server;

pub use error::{ApiError, GatewayError};
pub use router::build_router;
pub use server::{AppState, GatewayServer};
