use std::collections::HashSet;

use tracing::instrument;

use crate::{
    models::{Catalog, Recommendation},
    services::similarity::{centroid, cosine_similarity},
};

/// Default number of recommended shows
pub const RECOMMENDATION_LIMIT: usize = 5;

/// Ranks catalog shows by similarity to the user's favorites
///
/// Scores every embedded catalog entry against the centroid of the favorites'
/// embeddings. The favorites themselves are never recommended.
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    catalog: &'a Catalog,
    limit: usize,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over a loaded catalog
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            limit: RECOMMENDATION_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the top-scoring shows, best first
    ///
    /// Empty favorites, or favorites none of which has an embedding, produce an empty
    /// result. Equal scores keep catalog order.
    #[instrument(skip_all, fields(favorites = favorites.len(), limit = self.limit))]
    pub fn rank<S: AsRef<str>>(&self, favorites: &[S]) -> Vec<Recommendation> {
        if favorites.is_empty() {
            return Vec::new();
        }

        let embedded: Vec<_> = self.catalog.embedded().collect();
        let favorite_set: HashSet<&str> = favorites.iter().map(|f| f.as_ref()).collect();

        // Lookups go through the catalog index so duplicate titles resolve to their first occurrence
        let favorite_vectors = favorites.iter().filter_map(|title| {
            self.catalog
                .get(title.as_ref())
                .and_then(|entry| entry.embedding.as_ref())
                .filter(|embedding| Some(embedding.dimension()) == self.catalog.dimension())
        });

        let Some(target) = centroid(favorite_vectors) else {
            tracing::info!(
                favorites = favorites.len(),
                "No favorite has an embedding; nothing to rank"
            );
            return Vec::new();
        };

        let mut scored: Vec<Recommendation> = embedded
            .into_iter()
            .filter(|(entry, _)| !favorite_set.contains(entry.title.as_str()))
            .map(|(entry, embedding)| Recommendation {
                entry: entry.clone(),
                score: cosine_similarity(embedding.as_slice(), target.as_slice()),
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.limit);

        tracing::info!(
            favorites = favorites.len(),
            recommendations = scored.len(),
            top_score = scored.first().map(|r| r.score),
            "Ranked catalog"
        );

        scored
    }
}

/// Ranks the catalog against reconciled favorites with the default limit
pub fn rank<S: AsRef<str>>(favorites: &[S], catalog: &Catalog) -> Vec<Recommendation> {
    Recommender::new(catalog).rank(favorites)
}
