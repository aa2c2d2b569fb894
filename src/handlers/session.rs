use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::errors::AppError;
use crate::services::lifecycle::{self, ClockPoint};
use crate::state::AppState;
use crate::utils::auth::Caller;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
#[validate(schema(function = "validate_coordinates"))]
pub struct LocationRequest {
    latitude: f64,
    longitude: f64,
    #[validate(length(max = 200))]
    name: Option<String>,
}

#[derive(Deserialize)]
pub struct ClockRequest {
    location: LocationRequest,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    start_date: Option<i64>,
    end_date: Option<i64>,
}

fn validate_coordinates(location: &LocationRequest) -> Result<(), ValidationError> {
    let latitude_ok = (-90.0..=90.0).contains(&location.latitude);
    let longitude_ok = (-180.0..=180.0).contains(&location.longitude);
    if latitude_ok && longitude_ok {
        Ok(())
    } else {
        Err(ValidationError::new("coordinates_out_of_range"))
    }
}

fn clock_point(payload: ClockRequest) -> Result<ClockPoint, AppError> {
    validate_payload(&payload.location)?;
    let LocationRequest {
        latitude,
        longitude,
        name,
    } = payload.location;
    Ok(ClockPoint {
        latitude,
        longitude,
        name,
    })
}

pub async fn clock_in(
    state: web::Data<AppState>,
    caller: Caller,
    payload: web::Json<ClockRequest>,
) -> Result<HttpResponse, AppError> {
    let point = clock_point(payload.into_inner())?;
    let session = lifecycle::clock_in(&state, caller, point).await?;
    Ok(HttpResponse::Created().json(session))
}

pub async fn clock_out(
    state: web::Data<AppState>,
    caller: Caller,
    payload: web::Json<ClockRequest>,
) -> Result<HttpResponse, AppError> {
    let point = clock_point(payload.into_inner())?;
    let session = lifecycle::clock_out(&state, caller, point).await?;
    Ok(HttpResponse::Ok().json(session))
}

pub async fn get_active_session(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let session = lifecycle::active_session(&state, caller).await?;
    Ok(HttpResponse::Ok().json(session))
}

pub async fn get_session_history(
    state: web::Data<AppState>,
    caller: Caller,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let sessions =
        lifecycle::session_history(&state, caller, query.start_date, query.end_date).await?;
    Ok(HttpResponse::Ok().json(sessions))
}

pub async fn get_today_stats(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let totals = lifecycle::today_stats(&state, caller).await?;
    Ok(HttpResponse::Ok().json(totals))
}

pub async fn get_month_stats(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let totals = lifecycle::month_stats(&state, caller).await?;
    Ok(HttpResponse::Ok().json(totals))
}
