use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::{error::AppResult, models::EmbeddingTable};

/// Loads the precomputed embedding table from a JSON file
///
/// The file is an object mapping each title to an array of numbers. Malformed data is
/// a hard error: ranking assumes every vector it touches is numeric and uniform.
pub fn load_embeddings(path: &Path) -> AppResult<EmbeddingTable> {
    let file = File::open(path)?;
    let table = parse_embeddings(BufReader::new(file))?;

    tracing::info!(
        path = %path.display(),
        titles = table.len(),
        dimension = ?table.dimension(),
        "Loaded embedding table"
    );

    Ok(table)
}

pub fn parse_embeddings<R: Read>(reader: R) -> AppResult<EmbeddingTable> {
    let raw: HashMap<String, Vec<f64>> = serde_json::from_reader(reader)?;
    EmbeddingTable::from_map(raw)
}
