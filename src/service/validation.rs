//! Structural request validation from entity field declarations.

use crate::config::{EntityDef, FieldDefault, FieldKind, FieldSpec};
use crate::error::AppError;
use crate::record::{Fields, ID_FIELD};
use regex::Regex;
use serde_json::Value;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body. Every required field must be present and non-null; absent
    /// optional fields become null or their default. Undeclared keys (including `id`) are dropped.
    pub fn validate_create(entity: &EntityDef, body: Value) -> Result<Fields, AppError> {
        let mut body = body_to_map(body)?;
        warn_undeclared(entity, &body);
        let mut out = Fields::new();
        for spec in &entity.fields {
            let value = match body.remove(&spec.name) {
                Some(v) if !v.is_null() => validate_field(spec, &v)?,
                _ if spec.required => {
                    return Err(AppError::Validation(format!("{} is required", spec.name)));
                }
                _ => default_value(spec),
            };
            out.insert(spec.name.clone(), value);
        }
        Ok(out)
    }

    /// Validate an update body: only the fields present are checked. Required fields may be
    /// omitted but not set to null. Undeclared keys (including `id`) are dropped.
    pub fn validate_update(entity: &EntityDef, body: Value) -> Result<Fields, AppError> {
        let body = body_to_map(body)?;
        warn_undeclared(entity, &body);
        let mut out = Fields::new();
        for (name, v) in body {
            let Some(spec) = entity.field(&name) else { continue };
            let value = if v.is_null() {
                if spec.required {
                    return Err(AppError::Validation(format!("{} cannot be null", name)));
                }
                Value::Null
            } else {
                validate_field(spec, &v)?
            };
            out.insert(name, value);
        }
        Ok(out)
    }
}

fn body_to_map(value: Value) -> Result<Fields, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

fn warn_undeclared(entity: &EntityDef, body: &Fields) {
    for k in body.keys() {
        if k == ID_FIELD || entity.field(k).is_none() {
            tracing::warn!(entity = %entity.path_segment, field = %k, "ignoring undeclared field");
        }
    }
}

fn default_value(spec: &FieldSpec) -> Value {
    match spec.default {
        Some(FieldDefault::Now) => Value::String(chrono::Utc::now().to_rfc3339()),
        None => Value::Null,
    }
}

/// Check `v` against the field's kind and bounds; returns the value to store.
fn validate_field(spec: &FieldSpec, v: &Value) -> Result<Value, AppError> {
    let col = spec.name.as_str();
    match spec.kind {
        FieldKind::Text => {
            let s = v
                .as_str()
                .ok_or_else(|| AppError::Validation(format!("{} must be a string", col)))?;
            if let Some(max) = spec.max_length {
                if s.chars().count() > max as usize {
                    return Err(AppError::Validation(format!(
                        "{} must be at most {} characters",
                        col, max
                    )));
                }
            }
            if let Some(ref pattern) = spec.pattern {
                let re = Regex::new(pattern)
                    .map_err(|_| AppError::Validation(format!("invalid pattern for {}", col)))?;
                if !re.is_match(s) {
                    return Err(AppError::Validation(format!("{} does not match required pattern", col)));
                }
            }
            Ok(v.clone())
        }
        FieldKind::Integer => {
            if v.as_i64().is_none() {
                return Err(AppError::Validation(format!("{} must be an integer", col)));
            }
            Ok(v.clone())
        }
        FieldKind::Decimal => {
            let n = v
                .as_f64()
                .ok_or_else(|| AppError::Validation(format!("{} must be a number", col)))?;
            // Two places, matching the NUMERIC(10, 2) column.
            serde_json::Number::from_f64((n * 100.0).round() / 100.0)
                .map(Value::Number)
                .ok_or_else(|| AppError::Validation(format!("{} must be a finite number", col)))
        }
        FieldKind::Datetime => {
            let parsed = v
                .as_str()
                .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                .ok_or_else(|| AppError::Validation(format!("{} must be an RFC 3339 datetime", col)))?;
            Ok(Value::String(parsed.with_timezone(&chrono::Utc).to_rfc3339()))
        }
    }
}
