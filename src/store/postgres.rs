//! PostgreSQL record store. SQL text comes from [`crate::sql`]; values are always bound.

use crate::config::{EntityDef, FieldKind};
use crate::error::{AppError, ConfigError};
use crate::record::{Fields, Record, ID_FIELD};
use crate::sql::{self, PgBindValue, QueryBuf};
use crate::store::RecordStore;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, PgPool, Row};
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_optional(&self, entity: &EntityDef, q: &QueryBuf) -> Result<Option<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| row_to_record(entity, &r)).transpose()
    }

    async fn fetch_all(&self, entity: &EntityDef, q: &QueryBuf) -> Result<Vec<Record>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(|r| row_to_record(entity, r)).collect()
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert(&self, entity: &EntityDef, fields: Fields) -> Result<Record, AppError> {
        let q = sql::insert(entity, &fields);
        self.fetch_optional(entity, &q)
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn all(&self, entity: &EntityDef) -> Result<Vec<Record>, AppError> {
        self.fetch_all(entity, &sql::select_all(entity)).await
    }

    async fn get(&self, entity: &EntityDef, id: i64) -> Result<Option<Record>, AppError> {
        self.fetch_optional(entity, &sql::select_by_id(entity, id)).await
    }

    async fn update(&self, entity: &EntityDef, id: i64, fields: Fields) -> Result<Option<Record>, AppError> {
        self.fetch_optional(entity, &sql::update(entity, id, &fields)).await
    }

    async fn remove(&self, entity: &EntityDef, id: i64) -> Result<Option<Record>, AppError> {
        self.fetch_optional(entity, &sql::delete(entity, id)).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Decode a row by the entity's declared field kinds. SQL NULL becomes JSON null.
fn row_to_record(entity: &EntityDef, row: &PgRow) -> Result<Record, AppError> {
    let id: i64 = row.try_get(ID_FIELD)?;
    let mut fields = Fields::new();
    for f in &entity.fields {
        let name = f.name.as_str();
        let value = match f.kind {
            FieldKind::Text => row.try_get::<Option<String>, _>(name)?.map(Value::String),
            FieldKind::Integer => row.try_get::<Option<i64>, _>(name)?.map(Value::from),
            FieldKind::Decimal => row
                .try_get::<Option<f64>, _>(name)?
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            FieldKind::Datetime => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name)?
                .map(|d| Value::String(d.to_rfc3339())),
        };
        fields.insert(f.name.clone(), value.unwrap_or(Value::Null));
    }
    Ok(Record::new(id, fields))
}

/// Create the database named in `database_url` when it does not exist yet.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| ConfigError::Env(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), ConfigError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| ConfigError::Env("DATABASE_URL: no path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}
