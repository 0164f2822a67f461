use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::query::ListParams;
use crate::store::Card;
use crate::AppState;

/// Request body for create and update.
///
/// Only the amount is read. Callers may send `id` or `owner` fields; both are
/// ignored: ids are server-generated and ownership always comes from the
/// authenticated principal.
#[derive(Debug, Deserialize)]
pub struct CardPayload {
    pub amount: Decimal,
}

/// GET /cards/:id - fetch a single owned card
pub async fn card_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<Json<Card>, ApiError> {
    let card = state.service.get(&user, id).await?;
    Ok(Json(card))
}

/// POST /cards - create a card owned by the caller
pub async fn card_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.service.create(&user, payload.amount).await?;
    let location = format!("/cards/{}", card.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

/// GET /cards - paged, sorted list of the caller's cards
pub async fn card_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = state.service.list(&user, &params).await?;
    Ok(Json(cards))
}

/// PUT /cards/:id - replace the amount of an owned card
pub async fn card_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CardPayload>,
) -> Result<StatusCode, ApiError> {
    state.service.update(&user, id, payload.amount).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cards/:id - delete an owned card
pub async fn card_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
