//! TV show recommendations from a handful of favorite titles.
//!
//! Free-text favorites are reconciled against the catalog by fuzzy title matching,
//! then every other show is ranked by cosine similarity to the centroid of the
//! favorites' embeddings. Generated shows and posters are optional extras layered on
//! top of the ranking.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod services;

pub use error::{AppError, AppResult};
