//! # zetria-core
//!
//! Core types, traits, and abstractions for Zetria.
//!
//! This crate provides the domain models, the repository traits implemented by
//! `zetria-db`, the shared error type, the `#tag` / `[[link]]` extractor and the
//! queue event types exchanged between the API and the consumer.

pub mod defaults;
pub mod error;
pub mod events;
pub mod extraction;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{GraphEvent, QueueMessage};
pub use extraction::{extract_links, extract_tags};
pub use models::*;
pub use traits::*;
pub use uuid_utils::new_v7;
