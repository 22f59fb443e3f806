mod embedding;
mod show;

pub use embedding::{Embedding, EmbeddingTable};
pub use show::{Catalog, CatalogEntry, CatalogRow};

/// A catalog entry scored against the user's favorites
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub entry: CatalogEntry,
    /// Cosine similarity in [-1, 1]
    pub score: f64,
}

impl Recommendation {
    pub fn title(&self) -> &str {
        &self.entry.title
    }

    /// Score as a whole percentage, as shown to the user
    pub fn percent(&self) -> i64 {
        (self.score * 100.0).round() as i64
    }
}

/// A fictional show invented by the generative content service
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedShow {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
}

/// Two generated shows: one inspired by the favorites, one by the recommendations
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedContent {
    pub from_favorites: GeneratedShow,
    pub from_recommendations: GeneratedShow,
}

impl EnrichedContent {
    /// Poster URLs in display order; empty when either show lacks one
    pub fn poster_urls(&self) -> Vec<&str> {
        match (
            self.from_favorites.image_url.as_deref(),
            self.from_recommendations.image_url.as_deref(),
        ) {
            (Some(first), Some(second)) => vec![first, second],
            _ => Vec::new(),
        }
    }
}
