//! Generic CRUD over any [`RecordStore`]. Stateless; the store and entity come in with each call.

use crate::config::EntityDef;
use crate::error::AppError;
use crate::record::{Fields, Record};
use crate::store::RecordStore;
use serde::Serialize;

pub struct CrudService;

/// Confirmation payload for a delete.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Deleted {
    pub message: String,
}

impl CrudService {
    /// Append a record with the next id. No uniqueness check on the supplied fields.
    pub async fn create(store: &dyn RecordStore, entity: &EntityDef, fields: Fields) -> Result<Record, AppError> {
        let record = store.insert(entity, fields).await?;
        tracing::info!(entity = %entity.path_segment, id = record.id, "created");
        Ok(record)
    }

    /// Every record, in creation order.
    pub async fn read_all(store: &dyn RecordStore, entity: &EntityDef) -> Result<Vec<Record>, AppError> {
        store.all(entity).await
    }

    pub async fn read_one(store: &dyn RecordStore, entity: &EntityDef, id: i64) -> Result<Record, AppError> {
        store
            .get(entity, id)
            .await?
            .ok_or_else(|| not_found(entity))
    }

    /// Overlay `fields` onto the record; fields not supplied are kept and the id never changes.
    pub async fn update(
        store: &dyn RecordStore,
        entity: &EntityDef,
        id: i64,
        fields: Fields,
    ) -> Result<Record, AppError> {
        let record = store
            .update(entity, id, fields)
            .await?
            .ok_or_else(|| not_found(entity))?;
        tracing::info!(entity = %entity.path_segment, id, "updated");
        Ok(record)
    }

    pub async fn delete(store: &dyn RecordStore, entity: &EntityDef, id: i64) -> Result<Deleted, AppError> {
        store
            .remove(entity, id)
            .await?
            .ok_or_else(|| not_found(entity))?;
        tracing::info!(entity = %entity.path_segment, id, "deleted");
        Ok(Deleted {
            message: format!("{} deleted successfully", entity.label),
        })
    }
}

fn not_found(entity: &EntityDef) -> AppError {
    AppError::NotFound(entity.label.clone())
}
