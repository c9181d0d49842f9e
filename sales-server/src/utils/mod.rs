//! Common utilities: error types, logging, time helpers

pub mod error;
pub mod id;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResult};
