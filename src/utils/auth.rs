use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::utils;

/// The authenticated identity behind a request, resolved from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(Uuid),
}

impl Caller {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Caller::Anonymous => None,
            Caller::User(user_id) => Some(*user_id),
        }
    }

    /// Write paths call this; anonymous callers fail with `Unauthenticated`.
    pub fn require_user(&self) -> Result<Uuid, AppError> {
        self.user_id().ok_or_else(AppError::unauthenticated)
    }
}

fn caller_from_request(req: &HttpRequest) -> Result<Caller, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|auth| auth.to_str().ok())
        .and_then(|auth| auth.split_whitespace().nth(1));

    let Some(token) = token else {
        return Ok(Caller::Anonymous);
    };

    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        AppError::InternalServerError("Application state not configured".to_string())
    })?;

    let claims = utils::jwt::validate_token(token, &state.jwt_secret)
        .map_err(|err| AppError::Unauthenticated(err.to_string()))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthenticated("Invalid user ID in token".to_string()))?;

    Ok(Caller::User(user_id))
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(caller_from_request(req))
    }
}
