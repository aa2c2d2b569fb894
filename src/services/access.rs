use log::warn;

use crate::errors::AppError;
use crate::models::employee::{Employee, Role};
use crate::state::AppState;
use crate::utils::auth::Caller;

/// Passes the caller's employee record through when its role grants `required`.
pub fn authorize(employee: Option<Employee>, required: Role) -> Result<Employee, AppError> {
    match employee {
        Some(employee) if employee.role.grants(required) => Ok(employee),
        Some(employee) => {
            warn!("Employee {} denied: requires {} role", employee.id, required);
            Err(AppError::unauthorized())
        }
        None => {
            warn!("Caller without employee record denied: requires {} role", required);
            Err(AppError::unauthorized())
        }
    }
}

/// Resolves the caller and applies [`authorize`]. Anonymous callers fail with
/// `Unauthenticated`.
pub async fn require_role(state: &AppState, caller: Caller, required: Role) -> Result<Employee, AppError> {
    let user_id = caller.require_user()?;
    let employee = state.store.find_employee_by_user(user_id).await?;
    authorize(employee, required)
}
