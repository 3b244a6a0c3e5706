pub mod assertion;
pub mod auth;
pub mod config;
pub mod error;
pub mod expectations;
pub mod http;
pub mod logger;
pub mod reporter;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, RuprobeError};
