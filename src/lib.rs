//! qwikgen-proxy: JSON API in front of a hosted LLM completion endpoint
//!
//! Features:
//! - Text, chat, code, summarization and translation endpoints
//! - Fixed system instructions per tool, chat history windowed to 10 turns
//! - Per-tool model and decoding profiles
//! - Uniform `{success: false, error}` envelope for upstream failures
//! - Static frontend serving and request stats logging

pub mod api;
pub mod config;
pub mod prompt;
pub mod proxy;
pub mod stats;
pub mod upstream;

pub use config::AppConfig;
pub use proxy::{router, run_server, ProxyState};
pub use upstream::{CompletionBackend, TogetherClient};
