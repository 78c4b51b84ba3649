use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::booking::{BookingError, BookingStep};
use crate::error::ApiError;
use crate::models::SeatLabel;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/show", put(select_show))
        .route("/sessions/{id}/seats/toggle", post(toggle_seat))
        .route("/sessions/{id}/seats", delete(clear_seats))
        .route("/sessions/{id}/step", put(set_step))
        .route("/sessions/{id}/confirm", post(confirm_booking))
        .route("/sessions/{id}/bookings", get(list_bookings))
        .route("/sessions/{id}/reset", post(reset_session))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SelectShowRequest {
    #[validate(length(min = 1, max = 64))]
    pub show_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ToggleSeatRequest {
    #[validate(length(min = 2, max = 12))]
    pub seat: String,
}

#[derive(Debug, Deserialize)]
pub struct SetStepRequest {
    pub step: BookingStep,
}

// POST /api/sessions
async fn open_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "session": session.summary() })),
    )
}

// GET /api/sessions/{id}
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state.sessions.read(id, |s| s.summary()).await?;
    Ok(Json(json!({ "success": true, "session": summary })))
}

// PUT /api/sessions/{id}/show
async fn select_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectShowRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;

    // The lock is not held while the catalog answers; the ticket tells us
    // afterwards whether a newer load or a reset happened in between.
    let ticket = state.sessions.update(id, |s| s.begin_show_load()).await?;
    let show = state.catalog.get_show(&req.show_id).await?;

    let (applied, summary) = state
        .sessions
        .update(id, |s| s.finish_show_load(ticket, show).map(|applied| (applied, s.summary())))
        .await??;

    if !applied {
        tracing::warn!(session = %id, show = %req.show_id, "show load superseded");
    }

    Ok(Json(json!({
        "success": true,
        "applied": applied,
        "session": summary,
    })))
}

// POST /api/sessions/{id}/seats/toggle
async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleSeatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let seat: SeatLabel = req.seat.parse()?;

    let (outcome, summary) = state
        .sessions
        .update(id, |s| {
            let outcome = s.toggle_seat(seat);
            (outcome, s.summary())
        })
        .await?;

    if !outcome.changed() {
        tracing::debug!(session = %id, %seat, ?outcome, "seat toggle ignored");
    }

    Ok(Json(json!({
        "success": true,
        "outcome": outcome,
        "session": summary,
    })))
}

// DELETE /api/sessions/{id}/seats
async fn clear_seats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .sessions
        .update(id, |s| {
            s.clear_selection();
            s.summary()
        })
        .await?;
    Ok(Json(json!({ "success": true, "session": summary })))
}

// PUT /api/sessions/{id}/step
async fn set_step(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetStepRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .sessions
        .update(id, |s| s.set_step(req.step).map(|_| s.summary()))
        .await??;
    Ok(Json(json!({ "success": true, "session": summary })))
}

// POST /api/sessions/{id}/confirm
async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let (show_id, movie_id) = state
        .sessions
        .read(id, |s| {
            s.selected_show()
                .map(|show| (show.id.clone(), show.movie_id.clone()))
        })
        .await?
        .ok_or(BookingError::NoShowSelected)?;
    let movie = state.catalog.get_movie(&movie_id).await?;

    // The show may have changed while the title was loading
    let booking = state
        .sessions
        .update(id, |s| s.confirm(&show_id, &movie.title))
        .await??;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "booking": booking })),
    ))
}

// GET /api/sessions/{id}/bookings
async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = state.sessions.read(id, |s| s.bookings().to_vec()).await?;
    Ok(Json(json!({
        "success": true,
        "count": bookings.len(),
        "bookings": bookings,
    })))
}

// POST /api/sessions/{id}/reset
async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .sessions
        .update(id, |s| {
            s.reset();
            s.summary()
        })
        .await?;
    Ok(Json(json!({ "success": true, "session": summary })))
}
