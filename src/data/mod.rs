//! Loaders for the read-only inputs of a recommendation run.
//!
//! Both files are read once at startup; the returned values are immutable and are
//! passed explicitly to the services that need them.

pub mod catalog;
pub mod embeddings;

pub use catalog::{load_catalog, read_catalog_rows};
pub use embeddings::{load_embeddings, parse_embeddings};
