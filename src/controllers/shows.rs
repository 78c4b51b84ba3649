use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::booking::{classify, generate_layout, Selection, MAX_SELECTED_SEATS};
use crate::error::ApiError;
use crate::models::{row_name, SeatLabel, SeatStatus, Show};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows/{id}", get(get_show))
        .route("/shows/{id}/seats", get(seat_map))
}

#[derive(Debug, Deserialize)]
pub struct SeatMapQuery {
    pub session: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SeatView {
    pub label: SeatLabel,
    pub status: SeatStatus,
}

#[derive(Debug, Serialize)]
pub struct RowView {
    pub row: String,
    pub seats: Vec<SeatView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub show_id: String,
    pub price: u32,
    pub total_seats: u32,
    pub available_seats: u32,
    pub max_selectable: usize,
    pub rows: Vec<RowView>,
    pub selected_seats: Vec<SeatLabel>,
    pub total_amount: u64,
}

/// Seat grid for `show` with each seat classified against `selection`.
pub fn build_seat_map(show: &Show, selection: &Selection) -> SeatMap {
    let rows = generate_layout(show.total_seats)
        .into_iter()
        .enumerate()
        .map(|(index, seats)| RowView {
            row: row_name(index as u32),
            seats: seats
                .into_iter()
                .map(|label| SeatView {
                    status: classify(&label, &show.booked_seats, selection),
                    label,
                })
                .collect(),
        })
        .collect();

    SeatMap {
        show_id: show.id.clone(),
        price: show.price,
        total_seats: show.total_seats,
        available_seats: show.available_seats(),
        max_selectable: MAX_SELECTED_SEATS,
        rows,
        selected_seats: selection.seats().to_vec(),
        total_amount: selection.total(show.price),
    }
}

// GET /api/shows/{id}
async fn get_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let show = state.catalog.get_show(&id).await?;
    Ok(Json(json!({ "success": true, "show": show })))
}

// GET /api/shows/{id}/seats?session=
async fn seat_map(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<SeatMapQuery>,
) -> Result<Json<Value>, ApiError> {
    let show = state.catalog.get_show(&id).await?;

    // A session only contributes its picks when it is booking this show
    let selection = match params.session {
        Some(session_id) => state
            .sessions
            .read(session_id, |session| match session.selected_show() {
                Some(active) if active.id == show.id => session.selection().clone(),
                _ => Selection::new(),
            })
            .await?,
        None => Selection::new(),
    };

    Ok(Json(json!({
        "success": true,
        "seatMap": build_seat_map(&show, &selection),
    })))
}
