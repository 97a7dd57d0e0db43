use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ruta_core::booking::{PassengerDetails, PaymentEntry};
use ruta_core::journey::SearchQuery;
use ruta_core::session::keys;
use ruta_flow::FlowSnapshot;
use ruta_seating::seat_map::SeatMap;
use ruta_seating::ToggleOutcome;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SessionCreatedResponse {
    session_id: Uuid,
    max_seats_per_booking: usize,
}

#[derive(Debug, Deserialize)]
struct SelectJourneyRequest {
    journey_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ToggleSeatRequest {
    seat_id: String,
}

#[derive(Debug, Serialize)]
struct ToggleSeatResponse {
    outcome: ToggleOutcome,
    state: FlowSnapshot,
}

#[derive(Debug, Deserialize)]
struct PaymentRequest {
    passenger: PassengerDetails,
    payment: PaymentEntry,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/booking/sessions", post(open_session))
        .route("/v1/booking/sessions/{id}", get(get_session))
        .route("/v1/booking/sessions/{id}/search", post(submit_search))
        .route("/v1/booking/sessions/{id}/journey", post(select_journey))
        .route("/v1/booking/sessions/{id}/seat-map", get(get_seat_map))
        .route("/v1/booking/sessions/{id}/seats/toggle", post(toggle_seat))
        .route("/v1/booking/sessions/{id}/continue", post(continue_to_payment))
        .route("/v1/booking/sessions/{id}/payment", post(submit_payment))
        .route("/v1/booking/sessions/{id}/back", post(back))
        .route("/v1/booking/sessions/{id}/restart", post(restart))
}

async fn open_session(State(state): State<AppState>) -> Json<SessionCreatedResponse> {
    let session_id = state.engine.open_session().await;
    Json(SessionCreatedResponse {
        session_id,
        max_seats_per_booking: state.booking_rules.max_seats_per_booking,
    })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    Ok(Json(state.engine.snapshot(id).await?))
}

async fn submit_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(query): Json<SearchQuery>,
) -> Result<Json<FlowSnapshot>, AppError> {
    Ok(Json(state.engine.submit_search(id, query).await?))
}

async fn select_journey(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectJourneyRequest>,
) -> Result<Json<FlowSnapshot>, AppError> {
    Ok(Json(state.engine.select_journey(id, req.journey_id).await?))
}

async fn get_seat_map(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SeatMap>, AppError> {
    Ok(Json(state.engine.seat_map(id).await?))
}

async fn toggle_seat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ToggleSeatRequest>,
) -> Result<Json<ToggleSeatResponse>, AppError> {
    let (outcome, snapshot) = state.engine.toggle_seat(id, &req.seat_id).await?;
    Ok(Json(ToggleSeatResponse {
        outcome,
        state: snapshot,
    }))
}

async fn continue_to_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    Ok(Json(state.engine.continue_to_payment(id).await?))
}

async fn submit_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<FlowSnapshot>, AppError> {
    let email = req.passenger.email.clone();
    let snapshot = state
        .engine
        .submit_payment(id, req.passenger, req.payment)
        .await?;
    if snapshot.confirmation.is_some() {
        // Remember the traveller for my-bookings style lookups
        state.session_ctx.put(keys::USER_EMAIL, &email);
    }
    Ok(Json(snapshot))
}

async fn back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    Ok(Json(state.engine.back(id).await?))
}

async fn restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    Ok(Json(state.engine.restart(id).await?))
}
