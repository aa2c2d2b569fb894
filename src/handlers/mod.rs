pub mod admin;
pub mod employee;
pub mod notification;
pub mod session;

use actix_web::web;

use crate::errors::AppError;

/// Registers every `/v1` route along with extractor configs that report
/// malformed bodies and query strings in the shared `{ "error": ... }` shape.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::resource("/v1/employees/me")
            .route(web::post().to(employee::create_employee))
            .route(web::get().to(employee::get_current_employee)),
    )
    .service(
        web::resource("/v1/sessions")
            .route(web::get().to(session::get_session_history)),
    )
    .service(
        web::resource("/v1/sessions/active")
            .route(web::get().to(session::get_active_session)),
    )
    .service(
        web::resource("/v1/sessions/clock-in")
            .route(web::post().to(session::clock_in)),
    )
    .service(
        web::resource("/v1/sessions/clock-out")
            .route(web::post().to(session::clock_out)),
    )
    .service(
        web::resource("/v1/stats/today")
            .route(web::get().to(session::get_today_stats)),
    )
    .service(
        web::resource("/v1/stats/month")
            .route(web::get().to(session::get_month_stats)),
    )
    .service(
        web::resource("/v1/admin/employees")
            .route(web::get().to(admin::get_all_employees)),
    )
    .service(
        web::resource("/v1/admin/employees/{id}")
            .route(web::get().to(admin::get_employee_details))
            .route(web::patch().to(admin::update_employee))
            .route(web::delete().to(admin::delete_employee)),
    )
    .service(
        web::resource("/v1/admin/employees/{id}/stats")
            .route(web::get().to(admin::get_employee_stats)),
    )
    .service(
        web::resource("/v1/admin/employees/{id}/overview")
            .route(web::get().to(admin::get_employee_overview)),
    )
    .service(
        web::resource("/v1/notifications")
            .route(web::get().to(notification::get_notifications)),
    )
    .service(
        web::resource("/v1/notifications/read-all")
            .route(web::post().to(notification::mark_all_as_read)),
    )
    .service(
        web::resource("/v1/notifications/preferences")
            .route(web::get().to(notification::get_preferences))
            .route(web::put().to(notification::update_preferences)),
    )
    .service(
        web::resource("/v1/notifications/{id}/read")
            .route(web::post().to(notification::mark_as_read)),
    );
}

#[cfg(test)]
pub fn test_app(
    state: web::Data<crate::state::AppState>,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new().app_data(state).configure(configure)
}
