use std::collections::HashMap;

use serde::Deserialize;

use super::{Embedding, EmbeddingTable};
use crate::error::{AppError, AppResult};

/// Raw row from the catalog source
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CatalogRow {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Genres", default)]
    pub genres: String,
}

/// A TV show in the catalog, optionally joined with its embedding
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    pub description: String,
    pub genres: String,
    pub embedding: Option<Embedding>,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            genres: String::new(),
            embedding: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_embedding(mut self, values: Vec<f64>) -> Self {
        self.embedding = Some(Embedding::new(values));
        self
    }
}

/// Read-only catalog of shows in source order
///
/// Titles are the join key. Duplicates are tolerated: lookups resolve to the first
/// occurrence. All embeddings share one dimension.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
    dimension: Option<usize>,
}

impl Catalog {
    /// Builds a catalog, rejecting non-finite embeddings and mixed dimensions
    pub fn new(entries: Vec<CatalogEntry>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut dimension = None;

        for (position, entry) in entries.iter().enumerate() {
            if index.contains_key(&entry.title) {
                tracing::warn!(title = %entry.title, "Duplicate catalog title; first occurrence wins");
            } else {
                index.insert(entry.title.clone(), position);
            }

            let Some(embedding) = &entry.embedding else {
                continue;
            };
            if embedding.as_slice().iter().any(|v| !v.is_finite()) {
                return Err(AppError::invalid_embedding(
                    &entry.title,
                    "vector contains a non-finite value",
                ));
            }
            match dimension {
                None => dimension = Some(embedding.dimension()),
                Some(expected) if expected != embedding.dimension() => {
                    return Err(AppError::invalid_embedding(
                        &entry.title,
                        format!(
                            "expected dimension {}, found {}",
                            expected,
                            embedding.dimension()
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            entries,
            index,
            dimension,
        })
    }

    /// Joins catalog rows with their precomputed embeddings
    ///
    /// Rows without an embedding are kept; ranking skips them.
    pub fn from_rows(rows: Vec<CatalogRow>, embeddings: &EmbeddingTable) -> AppResult<Self> {
        let mut missing = 0usize;
        let mut entries = Vec::with_capacity(rows.len());

        for (line, row) in rows.into_iter().enumerate() {
            if row.title.trim().is_empty() {
                return Err(AppError::InvalidCatalog(format!(
                    "row {} has an empty title",
                    line + 1
                )));
            }

            let embedding = embeddings.get(&row.title).cloned();
            if embedding.is_none() {
                missing += 1;
            }

            entries.push(CatalogEntry {
                title: row.title,
                description: row.description,
                genres: row.genres,
                embedding,
            });
        }

        if missing > 0 {
            tracing::debug!(missing, "Catalog entries without an embedding");
        }

        Self::new(entries)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.title.as_str())
    }

    pub fn get(&self, title: &str) -> Option<&CatalogEntry> {
        self.index.get(title).map(|&position| &self.entries[position])
    }

    /// Embedding dimension shared by the catalog, `None` if nothing is embedded
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Entries that carry an embedding of the catalog dimension, in catalog order
    pub fn embedded(&self) -> impl Iterator<Item = (&CatalogEntry, &Embedding)> {
        let dimension = self.dimension;
        self.entries.iter().filter_map(move |entry| {
            entry
                .embedding
                .as_ref()
                .filter(|embedding| Some(embedding.dimension()) == dimension)
                .map(|embedding| (entry, embedding))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
