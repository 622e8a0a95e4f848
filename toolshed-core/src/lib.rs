//! Toolshed registry pipeline
//!
//! Loads tool entries from a category-organized directory tree, validates
//! them against the registry schema, verifies their external links, scores
//! them, and aggregates everything into the published JSON catalogs.
//!
//! Data flow: registry (load) -> validate -> verify -> score -> catalog.

pub mod catalog;
pub mod error;
pub mod registry;
pub mod schema;
pub mod score;
pub mod validate;
pub mod verify;

pub use error::RegistryError;
