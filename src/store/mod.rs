//! Record stores: the [`RecordStore`] seam plus in-memory and PostgreSQL backends.

mod memory;
mod postgres;
mod table;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};
pub use table::RecordTable;

use crate::config::EntityDef;
use crate::error::AppError;
use crate::record::{Fields, Record};
use async_trait::async_trait;

/// Storage for the records of every entity in a catalog.
///
/// `fields` passed to `insert` and `update` are already validated and contain declared
/// fields only. Lookups return `Ok(None)` when no record has the id; turning that into
/// a not-found error is the caller's job.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a record with a freshly allocated id.
    async fn insert(&self, entity: &EntityDef, fields: Fields) -> Result<Record, AppError>;

    /// All records in insertion order.
    async fn all(&self, entity: &EntityDef) -> Result<Vec<Record>, AppError>;

    async fn get(&self, entity: &EntityDef, id: i64) -> Result<Option<Record>, AppError>;

    /// Overlay `fields` onto the stored record; the id is never changed.
    async fn update(&self, entity: &EntityDef, id: i64, fields: Fields) -> Result<Option<Record>, AppError>;

    /// Remove and return the record.
    async fn remove(&self, entity: &EntityDef, id: i64) -> Result<Option<Record>, AppError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
