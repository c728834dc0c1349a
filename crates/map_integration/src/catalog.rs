//! Layer catalogs backing the in-memory controller.

use std::{fs, path::Path};

use shared::domain::LayerRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read layer catalog '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid layer catalog '{path}': {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("duplicate layer id '{0}' in catalog")]
    DuplicateId(String),
}

/// Reads a JSON array of layer records.
pub fn load_catalog(path: &Path) -> Result<Vec<LayerRecord>, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let layers: Vec<LayerRecord> =
        serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    ensure_unique_ids(&layers)?;
    Ok(layers)
}

fn ensure_unique_ids(layers: &[LayerRecord]) -> Result<(), CatalogError> {
    let mut seen = std::collections::HashSet::new();
    for layer in layers {
        if !seen.insert(&layer.id) {
            return Err(CatalogError::DuplicateId(layer.id.to_string()));
        }
    }
    Ok(())
}

/// Built-in catalog used when no catalog file is configured.
pub fn demo_catalog() -> Vec<LayerRecord> {
    vec![
        LayerRecord::new("schools", "Schools").with_caption("Public and private K-12 campuses"),
        LayerRecord::new("parks", "Parks").with_caption("Green spaces"),
        LayerRecord::new("tracts", "Census Tracts").with_caption("2020 tract boundaries"),
        LayerRecord::new("zip-codes", "Zip Codes"),
        LayerRecord::new("clinics", "Health Clinics").with_caption("Community health centers"),
        LayerRecord::new("median-income", "Median Household Income")
            .with_caption("Economic indicator by tract"),
    ]
}
