//! HTTP API server

mod error;
mod handler;
pub mod server;

pub use error::{ApiError, ProxyError};
pub use handler::ToolHandler;
pub use server::{router, run_server, ProxyState};
