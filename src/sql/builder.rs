//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity definition.

use crate::config::{EntityDef, FieldKind};
use crate::record::{Fields, ID_FIELD};
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from the catalog).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// SELECT list: id, then each declared field. Decimals come back as float8 so rows decode to JSON numbers.
fn select_column_list(entity: &EntityDef) -> String {
    let mut cols = vec![quoted(ID_FIELD)];
    for f in &entity.fields {
        let q = quoted(&f.name);
        if f.kind == FieldKind::Decimal {
            cols.push(format!("{}::float8 AS {}", q, q));
        } else {
            cols.push(q);
        }
    }
    cols.join(", ")
}

/// `$n::<type>` so JSON-derived parameters bind to the column's type.
fn placeholder(entity: &EntityDef, column: &str, param_num: u32) -> String {
    entity
        .field(column)
        .map(|f| format!("${}::{}", param_num, f.kind.pg_cast()))
        .unwrap_or_else(|| format!("${}", param_num))
}

/// SELECT every row in insertion (id) order.
pub fn select_all(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(entity),
        quoted(&entity.table),
        quoted(ID_FIELD)
    );
    q
}

/// SELECT by id.
pub fn select_by_id(entity: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(entity),
        quoted(&entity.table),
        quoted(ID_FIELD),
        n
    );
    q
}

/// INSERT the declared fields present in `fields`; id comes from the sequence.
pub fn insert(entity: &EntityDef, fields: &Fields) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for f in &entity.fields {
        let Some(val) = fields.get(&f.name) else { continue };
        let n = q.push_param(val.clone());
        cols.push(quoted(&f.name));
        placeholders.push(placeholder(entity, &f.name, n));
    }
    let returning = select_column_list(entity);
    let table = quoted(&entity.table);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, returning)
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            returning
        )
    };
    q
}

/// UPDATE by id: SET only declared fields present in `fields`. id is never assigned.
/// With nothing to set this degrades to a SELECT by id.
pub fn update(entity: &EntityDef, id: i64, fields: &Fields) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for f in &entity.fields {
        let Some(val) = fields.get(&f.name) else { continue };
        let n = q.push_param(val.clone());
        sets.push(format!("{} = {}", quoted(&f.name), placeholder(entity, &f.name, n)));
    }
    if sets.is_empty() {
        return select_by_id(entity, id);
    }
    let id_param = q.push_param(Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(&entity.table),
        sets.join(", "),
        quoted(ID_FIELD),
        id_param,
        select_column_list(entity)
    );
    q
}

/// DELETE by id, returning the removed row.
pub fn delete(entity: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        quoted(&entity.table),
        quoted(ID_FIELD),
        n,
        select_column_list(entity)
    );
    q
}
