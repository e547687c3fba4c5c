//! Entity CRUD handlers: create, list, read, update, delete.

use crate::config::EntityDef;
use crate::error::AppError;
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::{CrudService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", id_str)))
}

/// Body extraction failures (bad JSON, wrong content type) get the same error envelope as everything else.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })
}

fn entity_for<'a>(state: &'a AppState, path_segment: &str) -> Result<&'a EntityDef, AppError> {
    state
        .catalog
        .entity_by_path(path_segment)
        .ok_or_else(|| AppError::UnknownEntity(path_segment.to_string()))
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let rows = CrudService::read_all(state.store.as_ref(), entity).await?;
    Ok(success_many(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let fields = RequestValidator::validate_create(entity, json_body(body)?)?;
    let row = CrudService::create(state.store.as_ref(), entity, fields).await?;
    Ok(success_one(row))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::read_one(state.store.as_ref(), entity, id).await?;
    Ok(success_one_ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let fields = RequestValidator::validate_update(entity, json_body(body)?)?;
    let row = CrudService::update(state.store.as_ref(), entity, id, fields).await?;
    Ok(success_one_ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let entity = entity_for(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let deleted = CrudService::delete(state.store.as_ref(), entity, id).await?;
    Ok(success_one_ok(deleted))
}
