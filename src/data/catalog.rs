use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{
    error::AppResult,
    models::{Catalog, CatalogRow, EmbeddingTable},
};

/// Loads the show catalog and joins it with the embedding table
pub fn load_catalog(path: &Path, embeddings: &EmbeddingTable) -> AppResult<Catalog> {
    let rows = read_catalog_rows(File::open(path)?)?;
    let catalog = Catalog::from_rows(rows, embeddings)?;

    tracing::info!(
        path = %path.display(),
        shows = catalog.len(),
        embedded = catalog.embedded().count(),
        "Loaded catalog"
    );

    Ok(catalog)
}

/// Reads `Title`, `Description` and `Genres` columns; other columns are ignored
pub fn read_catalog_rows<R: Read>(reader: R) -> AppResult<Vec<CatalogRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.deserialize::<CatalogRow>() {
        rows.push(record?);
    }

    Ok(rows)
}
