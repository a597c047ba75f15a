//! Storage implementations for imgkit
//!
//! Includes the local directory store for downloaded images.

pub mod images;
pub use images::{mime_type_for, LocalImageStore};
