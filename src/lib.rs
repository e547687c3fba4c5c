//! Sandwich shop REST backend: CRUD for sandwiches, resources, recipes, orders and order details.

pub mod config;
pub mod error;
pub mod migration;
pub mod record;
pub mod response;
pub mod sql;
pub mod state;
pub mod store;
pub mod service;
pub mod handlers;
pub mod routes;

pub use config::{load_catalog, Catalog, EntityDef, FieldKind, FieldSpec, Settings, StoreKind};
pub use error::{AppError, ConfigError};
pub use migration::ensure_tables;
pub use record::{Fields, Record};
pub use response::{success_many, success_one, success_one_ok};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, RecordStore};
pub use routes::{build_router, common_routes, entity_routes};
pub use service::{CrudService, Deleted, RequestValidator};
