//! Clock-in/clock-out state machine for the calling employee.
//!
//! An employee is Idle (no active session) or Active (exactly one). The store
//! enforces the single-active-session rule atomically; the checks here only
//! produce the friendlier error for the common, non-racing case.

use log::info;

use crate::errors::AppError;
use crate::models::session::{Location, Session};
use crate::models::stats::Totals;
use crate::services::aggregation::{aggregate, Window};
use crate::services::identity;
use crate::state::AppState;
use crate::utils::auth::Caller;
use crate::utils::format::format_duration;
use crate::utils::geocode::resolve_place_name;

/// Where a clock action happened, as reported by the client. `name` may be
/// missing, in which case it is reverse-geocoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

fn no_active_session() -> AppError {
    AppError::Conflict("No active session".to_string())
}

/// Builds a location, asking the geocoder for a display name when the client
/// did not send one.
pub async fn locate(state: &AppState, point: ClockPoint) -> Location {
    let ClockPoint {
        latitude,
        longitude,
        name,
    } = point;
    let name = match name.filter(|name| !name.trim().is_empty()) {
        Some(name) => name,
        None => {
            resolve_place_name(
                state.geocoder.as_ref(),
                latitude,
                longitude,
                &state.location_fallback,
            )
            .await
        }
    };
    Location {
        latitude,
        longitude,
        name,
    }
}

/// Preconditions are checked before the place name is resolved, so rejected
/// requests never reach the geocoder.
pub async fn clock_in(state: &AppState, caller: Caller, point: ClockPoint) -> Result<Session, AppError> {
    let employee = identity::require_employee(state, caller).await?;

    if state.store.find_active_session(employee.id).await?.is_some() {
        return Err(AppError::Conflict("Already clocked in".to_string()));
    }

    let location = locate(state, point).await;
    let session = Session::start(employee.id, state.now_ms(), location);
    state.store.insert_active_session(&session).await?;

    info!(
        "Employee {} clocked in at {} ({})",
        employee.id, session.start_time, session.start_location.name
    );
    Ok(session)
}

pub async fn clock_out(state: &AppState, caller: Caller, point: ClockPoint) -> Result<Session, AppError> {
    let employee = identity::require_employee(state, caller).await?;

    if state.store.find_active_session(employee.id).await?.is_none() {
        return Err(no_active_session());
    }

    let location = locate(state, point).await;
    let session = state
        .store
        .complete_active_session(employee.id, state.now_ms(), &location)
        .await?
        .ok_or_else(no_active_session)?;

    info!(
        "Employee {} clocked out after {} ({})",
        employee.id,
        format_duration(session.duration.unwrap_or(0)),
        location.name
    );
    Ok(session)
}

pub async fn active_session(state: &AppState, caller: Caller) -> Result<Option<Session>, AppError> {
    match identity::current_employee(state, caller).await? {
        Some(employee) => state.store.find_active_session(employee.id).await,
        None => Ok(None),
    }
}

/// Sessions of the caller started within the optional bounds, inclusive.
pub async fn session_history(
    state: &AppState,
    caller: Caller,
    start: Option<i64>,
    end: Option<i64>,
) -> Result<Vec<Session>, AppError> {
    match identity::current_employee(state, caller).await? {
        Some(employee) => {
            state
                .store
                .sessions_started_between(employee.id, start, end)
                .await
        }
        None => Ok(Vec::new()),
    }
}

pub async fn today_stats(state: &AppState, caller: Caller) -> Result<Option<Totals>, AppError> {
    let window = Window::today(state.now(), &state.timezone);
    window_stats(state, caller, window).await
}

pub async fn month_stats(state: &AppState, caller: Caller) -> Result<Option<Totals>, AppError> {
    let window = Window::month(state.now(), &state.timezone);
    window_stats(state, caller, window).await
}

async fn window_stats(state: &AppState, caller: Caller, window: Window) -> Result<Option<Totals>, AppError> {
    let Some(employee) = identity::current_employee(state, caller).await? else {
        return Ok(None);
    };
    let sessions = state
        .store
        .sessions_started_between(employee.id, Some(window.start), Some(window.end))
        .await?;
    Ok(Some(aggregate(&sessions, state.now_ms())))
}
