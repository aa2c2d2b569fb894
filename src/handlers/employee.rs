use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::services::identity::{self, NewEmployee};
use crate::state::AppState;
use crate::utils::auth::Caller;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployeeRequest {
    #[validate(length(min = 1, max = 64))]
    first_name: String,
    #[validate(length(min = 1, max = 64))]
    last_name: String,
    #[validate(length(min = 1, max = 32))]
    employee_id: String,
}

pub async fn create_employee(
    state: web::Data<AppState>,
    caller: Caller,
    payload: web::Json<NewEmployeeRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let employee = identity::create_employee(
        &state,
        caller,
        NewEmployee {
            first_name: payload.first_name,
            last_name: payload.last_name,
            employee_code: payload.employee_id,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(employee))
}

pub async fn get_current_employee(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let employee = identity::current_employee(&state, caller).await?;
    Ok(HttpResponse::Ok().json(employee))
}
