//! HTTP API for club bookings.
//!
//! - `GET  /health`                      liveness, 503 once bookings are halted
//! - `POST /summary`                     sign in by email, list competitions
//! - `GET  /book/:competition/:club`     booking form data
//! - `POST /purchase`                    book places
//! - `GET  /points`                      points board of every club

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::booking::{BookingReceipt, BookingService, BookingView, ClubPoints, ClubSummary};
use crate::core::validator::Rejection;
use crate::domain::ports::{Clock, Repository};
use crate::utils::error::BookingError;

/// Shared state for API handlers.
pub struct ApiState<R: Repository + 'static, C: Clock + 'static> {
    pub service: BookingService<R, C>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub club: String,
    pub competition: String,
    pub places: i64,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub message: String,
    #[serde(flatten)]
    pub receipt: BookingReceipt,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn create_router<R, C>(state: Arc<ApiState<R, C>>) -> Router
where
    R: Repository + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/health", get(health_handler::<R, C>))
        .route("/summary", post(summary_handler))
        .route("/book/:competition/:club", get(book_handler))
        .route("/purchase", post(purchase_handler))
        .route("/points", get(points_handler))
        .with_state(state)
}

async fn health_handler<R, C>(
    State(state): State<Arc<ApiState<R, C>>>,
) -> (StatusCode, Json<HealthResponse>)
where
    R: Repository + 'static,
    C: Clock + 'static,
{
    let (status, label) = if state.service.is_healthy() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "halted")
    };
    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

async fn summary_handler<R, C>(
    State(state): State<Arc<ApiState<R, C>>>,
    Json(req): Json<SummaryRequest>,
) -> Result<Json<ClubSummary>, ApiError>
where
    R: Repository + 'static,
    C: Clock + 'static,
{
    let summary = state
        .service
        .show_summary(&req.email)
        .await
        .map_err(to_error_response)?;
    Ok(Json(summary))
}

async fn book_handler<R, C>(
    State(state): State<Arc<ApiState<R, C>>>,
    Path((competition, club)): Path<(String, String)>,
) -> Result<Json<BookingView>, ApiError>
where
    R: Repository + 'static,
    C: Clock + 'static,
{
    let view = state
        .service
        .booking_view(&competition, &club)
        .await
        .map_err(to_error_response)?;
    Ok(Json(view))
}

async fn purchase_handler<R, C>(
    State(state): State<Arc<ApiState<R, C>>>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError>
where
    R: Repository + 'static,
    C: Clock + 'static,
{
    let receipt = state
        .service
        .attempt_booking(&req.club, &req.competition, req.places)
        .await
        .map_err(to_error_response)?;

    Ok(Json(PurchaseResponse {
        message: "Great-booking complete!".to_string(),
        receipt,
    }))
}

async fn points_handler<R, C>(State(state): State<Arc<ApiState<R, C>>>) -> Json<Vec<ClubPoints>>
where
    R: Repository + 'static,
    C: Clock + 'static,
{
    Json(state.service.points_board().await)
}

fn to_error_response(err: BookingError) -> ApiError {
    let status = match &err {
        BookingError::ClubNotFound { .. }
        | BookingError::CompetitionNotFound { .. }
        | BookingError::EmailNotRegistered { .. } => StatusCode::NOT_FOUND,
        BookingError::Rejected(_) => StatusCode::BAD_REQUEST,
        BookingError::PastCompetition { .. } => StatusCode::CONFLICT,
        BookingError::ServiceHalted => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {}", err);
    }

    let rejection = match &err {
        BookingError::Rejected(rejection) => Some(rejection.clone()),
        _ => None,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.user_friendly_message(),
            rejection,
        }),
    )
}
