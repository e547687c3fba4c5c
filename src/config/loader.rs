//! Load a catalog from a JSON file (array of entity definitions).

use crate::config::{Catalog, EntityDef};
use crate::error::ConfigError;
use std::path::Path;

pub fn parse_catalog(json: &str) -> Result<Catalog, ConfigError> {
    let entities: Vec<EntityDef> =
        serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
    Catalog::new(entities)
}

pub async fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let catalog = parse_catalog(&text)?;
    tracing::info!(path = %path.display(), entities = catalog.entities.len(), "catalog loaded");
    Ok(catalog)
}
