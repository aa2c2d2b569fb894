use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::employee::{EmployeePatch, Role};
use crate::services::aggregation::Window;
use crate::services::directory;
use crate::state::AppState;
use crate::utils::auth::Caller;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 64))]
    first_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    last_name: Option<String>,
    role: Option<Role>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    start_date: i64,
    end_date: i64,
}

fn parse_employee_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid employee ID".to_string()))
}

pub async fn get_all_employees(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let employees = directory::list_employees(&state, caller).await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee_details(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = parse_employee_id(&path)?;
    let employee = directory::employee_details(&state, caller, employee_id).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn update_employee(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployeeRequest>,
) -> Result<HttpResponse, AppError> {
    let employee_id = parse_employee_id(&path)?;
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let patch = EmployeePatch {
        first_name: payload.first_name,
        last_name: payload.last_name,
        role: payload.role,
    };
    let employee = directory::update_employee(&state, caller, employee_id, patch).await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = parse_employee_id(&path)?;
    directory::delete_employee(&state, caller, employee_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Employee deleted successfully" })))
}

pub async fn get_employee_stats(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let employee_id = parse_employee_id(&path)?;
    let window = Window::range(query.start_date, query.end_date)?;
    let stats = directory::employee_stats(&state, caller, employee_id, window).await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub async fn get_employee_overview(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = parse_employee_id(&path)?;
    let overview = directory::employee_overview(&state, caller, employee_id).await?;
    Ok(HttpResponse::Ok().json(overview))
}
