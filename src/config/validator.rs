//! Catalog validation: routable unique paths, unique tables, no reserved or repeated field names.

use crate::config::EntityDef;
use crate::error::ConfigError;
use crate::record::ID_FIELD;
use regex::Regex;
use std::collections::HashSet;

/// Segments owned by the health and version routes; an entity mounted there could never be reached.
pub const RESERVED_PATH_SEGMENTS: &[&str] = &["health", "ready", "version", "info"];

pub fn validate(entities: &[EntityDef]) -> Result<(), ConfigError> {
    let segment_re = Regex::new(r"^[A-Za-z0-9_-]+$").map_err(|e| ConfigError::Load(e.to_string()))?;
    let mut path_segments = HashSet::new();
    let mut tables = HashSet::new();
    for e in entities {
        if !segment_re.is_match(&e.path_segment) {
            return Err(ConfigError::InvalidPathSegment(e.path_segment.clone()));
        }
        if RESERVED_PATH_SEGMENTS.contains(&e.path_segment.as_str()) {
            return Err(ConfigError::ReservedPathSegment(e.path_segment.clone()));
        }
        if !path_segments.insert(e.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(e.path_segment.clone()));
        }
        if !tables.insert(e.table.as_str()) {
            return Err(ConfigError::DuplicateTable(e.table.clone()));
        }
        let mut names = HashSet::new();
        for f in &e.fields {
            if f.name == ID_FIELD {
                return Err(ConfigError::ReservedField {
                    entity: e.path_segment.clone(),
                    field: f.name.clone(),
                });
            }
            if !names.insert(f.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    entity: e.path_segment.clone(),
                    field: f.name.clone(),
                });
            }
            if let Some(pattern) = &f.pattern {
                Regex::new(pattern).map_err(|err| ConfigError::InvalidPattern {
                    entity: e.path_segment.clone(),
                    field: f.name.clone(),
                    reason: err.to_string(),
                })?;
            }
        }
    }
    Ok(())
}
