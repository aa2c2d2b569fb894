use log::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notification::{Notification, NotificationPreferences, PreferencesPatch};
use crate::state::AppState;
use crate::utils::auth::Caller;

pub async fn list_notifications(
    state: &AppState,
    caller: Caller,
    only_unread: bool,
) -> Result<Vec<Notification>, AppError> {
    match caller.user_id() {
        Some(user_id) => state.store.list_notifications(user_id, only_unread).await,
        None => Ok(Vec::new()),
    }
}

/// Idempotent; notifications owned by someone else are reported as missing.
pub async fn mark_as_read(state: &AppState, caller: Caller, notification_id: Uuid) -> Result<(), AppError> {
    let user_id = caller.require_user()?;
    if state.store.mark_notification_read(user_id, notification_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Notification not found".to_string()))
    }
}

pub async fn mark_all_as_read(state: &AppState, caller: Caller) -> Result<u64, AppError> {
    let user_id = caller.require_user()?;
    let updated = state.store.mark_all_notifications_read(user_id).await?;
    info!("Marked {} notifications read for user {}", updated, user_id);
    Ok(updated)
}

/// Stored preferences, the all-on defaults when none were saved, or `None`
/// for anonymous callers.
pub async fn preferences(
    state: &AppState,
    caller: Caller,
) -> Result<Option<NotificationPreferences>, AppError> {
    let Some(user_id) = caller.user_id() else {
        return Ok(None);
    };
    Ok(Some(
        state.store.find_preferences(user_id).await?.unwrap_or_default(),
    ))
}

pub async fn update_preferences(
    state: &AppState,
    caller: Caller,
    patch: PreferencesPatch,
) -> Result<NotificationPreferences, AppError> {
    let user_id = caller.require_user()?;
    state.store.upsert_preferences(user_id, &patch).await
}
