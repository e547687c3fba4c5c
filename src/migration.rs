//! Create the tables for a catalog: one per entity, `id BIGSERIAL` plus the declared columns.
//! Existing tables are left as they are.

use crate::config::{Catalog, EntityDef, FieldDefault};
use crate::error::AppError;
use crate::record::ID_FIELD;
use crate::sql::quoted;
use sqlx::PgPool;

/// `CREATE TABLE IF NOT EXISTS` for one entity.
pub fn create_table_sql(entity: &EntityDef) -> String {
    let mut col_defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted(ID_FIELD))];
    for f in &entity.fields {
        let mut def = format!("{} {}", quoted(&f.name), f.column_type());
        if let Some(FieldDefault::Now) = f.default {
            def.push_str(" DEFAULT NOW()");
        }
        col_defs.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(&entity.table),
        col_defs.join(", ")
    )
}

pub async fn ensure_tables(pool: &PgPool, catalog: &Catalog) -> Result<(), AppError> {
    for entity in &catalog.entities {
        let ddl = create_table_sql(entity);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(tables = catalog.entities.len(), "tables ensured");
    Ok(())
}
