//! Admin-only employee registry and per-employee statistics. Every operation
//! passes the admin guard before touching the store.

use futures_util::future::try_join3;
use log::info;
use uuid::Uuid;

use crate::db::DeleteOutcome;
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeePatch, Role};
use crate::models::stats::{EmployeeOverview, EmployeeStats};
use crate::services::access::require_role;
use crate::services::aggregation::{aggregate, Window};
use crate::state::AppState;
use crate::utils::auth::Caller;

pub async fn list_employees(state: &AppState, caller: Caller) -> Result<Vec<Employee>, AppError> {
    require_role(state, caller, Role::Admin).await?;
    state.store.list_employees().await
}

pub async fn employee_details(
    state: &AppState,
    caller: Caller,
    employee_id: Uuid,
) -> Result<Option<Employee>, AppError> {
    require_role(state, caller, Role::Admin).await?;
    state.store.find_employee(employee_id).await
}

pub async fn update_employee(
    state: &AppState,
    caller: Caller,
    employee_id: Uuid,
    patch: EmployeePatch,
) -> Result<Employee, AppError> {
    let admin = require_role(state, caller, Role::Admin).await?;

    let employee = state
        .store
        .update_employee(employee_id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    info!("Admin {} updated employee {}", admin.id, employee.id);
    Ok(employee)
}

pub async fn delete_employee(state: &AppState, caller: Caller, employee_id: Uuid) -> Result<(), AppError> {
    let admin = require_role(state, caller, Role::Admin).await?;

    match state.store.delete_employee(employee_id).await? {
        DeleteOutcome::Deleted => {
            info!("Admin {} deleted employee {} and their sessions", admin.id, employee_id);
            Ok(())
        }
        DeleteOutcome::NotFound => Err(AppError::NotFound("Employee not found".to_string())),
        DeleteOutcome::ClockedIn => Err(AppError::Conflict(
            "Employee is clocked in; clock out before deleting".to_string(),
        )),
    }
}

pub async fn employee_stats(
    state: &AppState,
    caller: Caller,
    employee_id: Uuid,
    window: Window,
) -> Result<EmployeeStats, AppError> {
    require_role(state, caller, Role::Admin).await?;

    let sessions = state
        .store
        .sessions_started_between(employee_id, Some(window.start), Some(window.end))
        .await?;
    let totals = aggregate(&sessions, state.now_ms());

    Ok(EmployeeStats {
        total_duration: totals.total_duration,
        sessions_count: totals.sessions_count,
        sessions,
    })
}

/// Today's and this month's totals plus the running session, if any.
pub async fn employee_overview(
    state: &AppState,
    caller: Caller,
    employee_id: Uuid,
) -> Result<EmployeeOverview, AppError> {
    require_role(state, caller, Role::Admin).await?;

    let now = state.now();
    let today = Window::today(now, &state.timezone);
    let month = Window::month(now, &state.timezone);

    let (today_sessions, month_sessions, active_session) = try_join3(
        state
            .store
            .sessions_started_between(employee_id, Some(today.start), Some(today.end)),
        state
            .store
            .sessions_started_between(employee_id, Some(month.start), Some(month.end)),
        state.store.find_active_session(employee_id),
    )
    .await?;

    let now_ms = now.timestamp_millis();
    Ok(EmployeeOverview {
        today_duration: aggregate(&today_sessions, now_ms).total_duration,
        month_duration: aggregate(&month_sessions, now_ms).total_duration,
        active_session,
    })
}
