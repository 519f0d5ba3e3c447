//! Document module for schema-less indexing.
//!
//! Documents are flexible collections of field/value pairs. Records enter
//! the index as documents, usually through the JSON converter, and search
//! hits hand back projected field values with their stored types.

pub mod converter;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;

// Re-export commonly used types
pub use converter::JsonDocumentConverter;
pub use document::{Document, DocumentBuilder};
pub use field_value::FieldValue;
