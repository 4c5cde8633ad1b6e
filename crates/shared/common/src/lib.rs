//! Common utilities shared across the workspace.
//!
//! This crate provides unified error handling for the HTTP surface and
//! the `AppResult` alias used by every layer.

pub mod error;

pub use error::{AppError, AppResult, OptionExt};
