use log::info;

use crate::errors::AppError;
use crate::models::employee::Employee;
use crate::state::AppState;
use crate::utils::auth::Caller;

pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub employee_code: String,
}

/// The caller's employee record, or `None` for anonymous callers and users
/// who have not created one yet.
pub async fn current_employee(state: &AppState, caller: Caller) -> Result<Option<Employee>, AppError> {
    match caller.user_id() {
        Some(user_id) => state.store.find_employee_by_user(user_id).await,
        None => Ok(None),
    }
}

pub async fn require_employee(state: &AppState, caller: Caller) -> Result<Employee, AppError> {
    let user_id = caller.require_user()?;
    state
        .store
        .find_employee_by_user(user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Employee not found".to_string()))
}

pub async fn create_employee(
    state: &AppState,
    caller: Caller,
    new_employee: NewEmployee,
) -> Result<Employee, AppError> {
    let user_id = caller.require_user()?;

    if state.store.find_employee_by_user(user_id).await?.is_some() {
        return Err(AppError::Conflict("Employee already exists".to_string()));
    }

    let employee = Employee::new(
        user_id,
        new_employee.employee_code,
        new_employee.first_name,
        new_employee.last_name,
    );
    state.store.insert_employee(&employee).await?;

    info!(
        "Created employee {} {} ({}) for user {}",
        employee.full_name(),
        employee.id,
        employee.employee_code,
        user_id
    );
    Ok(employee)
}
