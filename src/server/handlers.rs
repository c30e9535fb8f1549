// HTTP request handlers
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::{json, Value};

use crate::adapters::views::{BARS_VIEW, BAR_DETAIL_VIEW, INDEX_VIEW};
use crate::core::{Bar, BarPatch};
use crate::domain::model::BarUpdate;
use crate::server::state::AppState;
use crate::utils::error::{BarError, Result};

pub const DELETED_MESSAGE: &str = "Bar deleted from the database";

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Bar registry is running")
}

pub async fn list_bars(State(state): State<AppState>) -> Result<Json<Vec<Bar>>> {
    Ok(Json(state.service.list().await?))
}

pub async fn list_by_neighbourhood(
    State(state): State<AppState>,
    Path(neighbourhood): Path<String>,
) -> Result<Json<Vec<Bar>>> {
    Ok(Json(
        state.service.list_by_neighbourhood(&neighbourhood).await?,
    ))
}

pub async fn get_bar_json(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Bar>> {
    Ok(Json(state.service.get_by_id(&id).await?))
}

pub async fn create_bar(
    State(state): State<AppState>,
    Json(payload): Json<BarPatch>,
) -> Result<Json<Bar>> {
    Ok(Json(state.service.create(payload).await?))
}

pub async fn add_many(
    State(state): State<AppState>,
    Json(payload): Json<Vec<Value>>,
) -> Result<Json<Vec<Value>>> {
    tracing::info!("Received batch of {} bars", payload.len());
    Ok(Json(state.service.add_many(payload).await?))
}

pub async fn update_bar(
    State(state): State<AppState>,
    Json(payload): Json<BarUpdate>,
) -> Result<Json<Bar>> {
    Ok(Json(state.service.update(&payload.id, payload.patch).await?))
}

pub async fn delete_bar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.service.delete(&id).await?;
    Ok((StatusCode::OK, DELETED_MESSAGE))
}

pub async fn render_index(State(state): State<AppState>) -> Result<Html<String>> {
    Ok(Html(state.renderer.render(INDEX_VIEW, &json!({}))?))
}

pub async fn render_all(State(state): State<AppState>) -> Result<Html<String>> {
    let bars = state.service.list().await?;
    let context = json!({ "title": "All bars", "bars": bars });
    Ok(Html(state.renderer.render(BARS_VIEW, &context)?))
}

/// Unlike the JSON route, an unknown neighbourhood renders an empty list.
pub async fn render_neighbourhood(
    State(state): State<AppState>,
    Path(neighbourhood): Path<String>,
) -> Result<Html<String>> {
    let bars = match state.service.list_by_neighbourhood(&neighbourhood).await {
        Ok(bars) => bars,
        Err(BarError::NotFound { .. }) => Vec::new(),
        Err(e) => return Err(e),
    };

    let context = json!({ "title": format!("Bars in {}", neighbourhood), "bars": bars });
    Ok(Html(state.renderer.render(BARS_VIEW, &context)?))
}

pub async fn render_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let bar = state.service.get_by_id(&id).await?;
    Ok(Html(state.renderer.render(BAR_DETAIL_VIEW, &json!({ "bar": bar }))?))
}
