use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Dense embedding vector of a show's genres and description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f64>);

impl Embedding {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Precomputed title → embedding mapping
///
/// Every vector is finite, non-empty and shares the same dimension. The table is built
/// once and handed to the catalog loader; nothing mutates it afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingTable {
    dimension: Option<usize>,
    vectors: HashMap<String, Embedding>,
}

impl EmbeddingTable {
    /// Validates raw vectors and builds the table
    ///
    /// The first vector in title order fixes the dimension so that error messages are
    /// reproducible regardless of hash ordering.
    pub fn from_map(raw: HashMap<String, Vec<f64>>) -> AppResult<Self> {
        let mut titles: Vec<&String> = raw.keys().collect();
        titles.sort();

        let mut dimension = None;
        for title in titles {
            let values = &raw[title];
            if values.is_empty() {
                return Err(AppError::invalid_embedding(title, "vector is empty"));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(AppError::invalid_embedding(
                    title,
                    "vector contains a non-finite value",
                ));
            }
            match dimension {
                None => dimension = Some(values.len()),
                Some(expected) if expected != values.len() => {
                    return Err(AppError::invalid_embedding(
                        title,
                        format!("expected dimension {}, found {}", expected, values.len()),
                    ));
                }
                Some(_) => {}
            }
        }

        let vectors = raw
            .into_iter()
            .map(|(title, values)| (title, Embedding::new(values)))
            .collect();

        Ok(Self { dimension, vectors })
    }

    /// Dimension shared by every vector, `None` for an empty table
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn get(&self, title: &str) -> Option<&Embedding> {
        self.vectors.get(title)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, Vec<f64>)]) -> HashMap<String, Vec<f64>> {
        pairs
            .iter()
            .map(|(title, values)| (title.to_string(), values.clone()))
            .collect()
    }

    #[test]
    fn test_from_map_valid() {
        let table = EmbeddingTable::from_map(raw(&[
            ("Lupin", vec![0.1, 0.2]),
            ("Friends", vec![0.3, 0.4]),
        ]))
        .unwrap();

        assert_eq!(table.dimension(), Some(2));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Lupin").unwrap().as_slice(), &[0.1, 0.2]);
        assert!(table.get("Dark").is_none());
    }

    #[test]
    fn test_from_map_empty_table() {
        let table = EmbeddingTable::from_map(HashMap::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.dimension(), None);
    }

    #[test]
    fn test_from_map_rejects_dimension_mismatch() {
        let err = EmbeddingTable::from_map(raw(&[
            ("A", vec![0.1, 0.2]),
            ("B", vec![0.1, 0.2, 0.3]),
        ]))
        .unwrap_err();

        match err {
            AppError::InvalidEmbedding { title, reason } => {
                assert_eq!(title, "B");
                assert_eq!(reason, "expected dimension 2, found 3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_map_rejects_empty_vector() {
        let err = EmbeddingTable::from_map(raw(&[("A", vec![])])).unwrap_err();
        assert!(matches!(err, AppError::InvalidEmbedding { .. }));
    }

    #[test]
    fn test_from_map_rejects_nan() {
        let err = EmbeddingTable::from_map(raw(&[("A", vec![0.1, f64::NAN])])).unwrap_err();
        assert!(matches!(err, AppError::InvalidEmbedding { .. }));
    }

    #[test]
    fn test_embedding_serde_is_transparent() {
        let embedding: Embedding = serde_json::from_str("[0.5, 1.0]").unwrap();
        assert_eq!(embedding.dimension(), 2);
        assert_eq!(serde_json::to_string(&embedding).unwrap(), "[0.5,1.0]");
    }
}
