//! HTTP surface: upload a PDF, get a validated quiz back as JSON.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppState, ServerConfig};
