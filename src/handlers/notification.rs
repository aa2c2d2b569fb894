use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notification::PreferencesPatch;
use crate::services::notifications;
use crate::state::AppState;
use crate::utils::auth::Caller;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(default)]
    only_unread: bool,
}

pub async fn get_notifications(
    state: web::Data<AppState>,
    caller: Caller,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse, AppError> {
    let notifications = notifications::list_notifications(&state, caller, query.only_unread).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

pub async fn mark_as_read(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let notification_id = Uuid::parse_str(&path)
        .map_err(|_| AppError::BadRequest("Invalid notification ID".to_string()))?;
    notifications::mark_as_read(&state, caller, notification_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Notification marked as read" })))
}

pub async fn mark_all_as_read(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let updated = notifications::mark_all_as_read(&state, caller).await?;
    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

pub async fn get_preferences(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let preferences = notifications::preferences(&state, caller).await?;
    Ok(HttpResponse::Ok().json(preferences))
}

pub async fn update_preferences(
    state: web::Data<AppState>,
    caller: Caller,
    payload: web::Json<PreferencesPatch>,
) -> Result<HttpResponse, AppError> {
    let preferences = notifications::update_preferences(&state, caller, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(preferences))
}
