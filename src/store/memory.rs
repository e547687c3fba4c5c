//! In-memory record store: one [`RecordTable`] per catalog entity.

use crate::config::{Catalog, EntityDef};
use crate::error::AppError;
use crate::record::{Fields, Record};
use crate::store::{RecordStore, RecordTable};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Each table has its own lock; id allocation happens under it, so concurrent
/// creates on one entity always get distinct ids.
#[derive(Debug)]
pub struct MemoryStore {
    tables: HashMap<String, Mutex<RecordTable>>,
}

impl MemoryStore {
    pub fn new(catalog: &Catalog) -> Self {
        let tables = catalog
            .entities
            .iter()
            .map(|e| (e.path_segment.clone(), Mutex::new(RecordTable::new())))
            .collect();
        MemoryStore { tables }
    }

    fn table(&self, entity: &EntityDef) -> Result<&Mutex<RecordTable>, AppError> {
        self.tables
            .get(&entity.path_segment)
            .ok_or_else(|| AppError::UnknownEntity(entity.path_segment.clone()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, entity: &EntityDef, fields: Fields) -> Result<Record, AppError> {
        let mut table = self.table(entity)?.lock().await;
        let record = table.insert(fields);
        tracing::debug!(entity = %entity.path_segment, id = record.id, "insert");
        Ok(record)
    }

    async fn all(&self, entity: &EntityDef) -> Result<Vec<Record>, AppError> {
        let table = self.table(entity)?.lock().await;
        Ok(table.records().to_vec())
    }

    async fn get(&self, entity: &EntityDef, id: i64) -> Result<Option<Record>, AppError> {
        let table = self.table(entity)?.lock().await;
        Ok(table.get(id).cloned())
    }

    async fn update(&self, entity: &EntityDef, id: i64, fields: Fields) -> Result<Option<Record>, AppError> {
        let mut table = self.table(entity)?.lock().await;
        tracing::debug!(entity = %entity.path_segment, id, "update");
        Ok(table.update(id, fields).cloned())
    }

    async fn remove(&self, entity: &EntityDef, id: i64) -> Result<Option<Record>, AppError> {
        let mut table = self.table(entity)?.lock().await;
        tracing::debug!(entity = %entity.path_segment, id, "remove");
        Ok(table.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn fields(v: serde_json::Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn entities_are_isolated() {
        let catalog = Catalog::builtin();
        let store = MemoryStore::new(&catalog);
        let sandwiches = catalog.entity_by_path("sandwiches").unwrap();
        let resources = catalog.entity_by_path("resources").unwrap();
        store.insert(sandwiches, fields(json!({ "sandwich_name": "BLT" }))).await.unwrap();
        let r = store.insert(resources, fields(json!({ "item": "bread" }))).await.unwrap();
        assert_eq!(r.id, 1);
        assert_eq!(store.all(sandwiches).await.unwrap().len(), 1);
        assert_eq!(store.all(resources).await.unwrap().len(), 1);
        assert!(store.get(resources, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_entity_is_rejected() {
        let store = MemoryStore::new(&Catalog::builtin());
        let mut stray = Catalog::builtin().entities[0].clone();
        stray.path_segment = "widgets".into();
        let err = store.all(&stray).await.unwrap_err();
        assert!(matches!(err, AppError::UnknownEntity(p) if p == "widgets"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_get_distinct_ids() {
        let catalog = Arc::new(Catalog::builtin());
        let store = Arc::new(MemoryStore::new(&catalog));
        let mut handles = Vec::new();
        for n in 0..64 {
            let store = store.clone();
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move {
                let entity = catalog.entity_by_path("orders").unwrap();
                store
                    .insert(entity, fields(json!({ "customer_name": format!("c{}", n) })))
                    .await
                    .unwrap()
                    .id
            }));
        }
        let mut ids = HashSet::new();
        for h in handles {
            assert!(ids.insert(h.await.unwrap()));
        }
        assert_eq!(ids.len(), 64);
        assert_eq!(ids.iter().copied().max(), Some(64));
    }
}
