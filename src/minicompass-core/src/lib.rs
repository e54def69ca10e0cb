//! Mini Compass Core Library
//!
//! Pure building blocks for talking to a Mini Compass document API:
//! - REST path and query-string construction
//! - Normalization of document arrays into a rectangular DocumentSet
//! - Client configuration

pub mod config;
pub mod models;
pub mod path;

// Re-export commonly used types
pub use config::Config;
pub use models::{Cell, ColumnTemplate, DocumentSet, ShapeError};
pub use path::{InvalidArgument, QueryParams};
