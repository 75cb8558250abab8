//! Daybook Shared Library
//!
//! This crate contains shared types, models, and utilities used across
//! the backend, frontend, and WASM modules.

pub mod capture;
pub mod errors;
pub mod models;
pub mod mood;
pub mod questions;
pub mod search;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use mood::*;
pub use search::*;
pub use types::*;

// Export models (capture and questions stay behind their module paths)
pub use models::{EntryKind, Tag, User, UserSettings};
