//! Application services and error types.

pub mod error;
pub mod settings;
