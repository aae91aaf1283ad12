pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod json_utils;
pub mod quiz;
pub mod request;
pub mod response;
pub mod server;
pub mod session;

// Convenient re-exports
pub use crate::core::{LowLevelClient, QuizGenerator};
pub use error::{AIError, QuizError};
pub use quiz::{Question, Quiz};
pub use request::Document;
pub use response::parse_quiz_reply;
