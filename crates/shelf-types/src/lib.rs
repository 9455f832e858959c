//! Shared types and error types for ModelShelf

pub mod errors;

pub use errors::{AppError, AppResult};
