//! `/notes` handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::app::AppState;
use crate::model::{ContentJson, CreatedJson, ListQuery, NoteJson, NoteListJson};
use crate::routes::error::ApiError;

pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<NoteListJson>, ApiError> {
    let Query(query) = query?;
    let page_size = query
        .page_size
        .as_deref()
        .map(parse_page_size)
        .transpose()?;
    let after_id = query.after_id;

    let page = state
        .run(move |notes| notes.list(page_size, after_id.as_deref()))
        .await?;
    Ok(Json(page.into()))
}

pub async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<ContentJson>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;

    let id = state.run(move |notes| notes.create(body.content)).await?;
    tracing::debug!(%id, "note created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/notes/{}", id))],
        Json(CreatedJson { id }),
    ))
}

pub async fn get_note(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<NoteJson>, ApiError> {
    let Path(id) = id?;

    let lookup = id.clone();
    match state.run(move |notes| notes.find_by_id(&lookup)).await? {
        Some(note) => Ok(Json(note.into())),
        None => Err(ApiError::NotFound(format!("Note {} not found", id))),
    }
}

pub async fn update_note(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<ContentJson>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let Json(body) = body?;

    state
        .run(move |notes| notes.update(&id, body.content))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_note(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;

    state.run(move |notes| notes.delete_by_id(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_page_size(value: &str) -> Result<i64, ApiError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("pageSize must be an integer, got {:?}", value)))
}
