pub mod auth;
pub mod format;
pub mod geocode;
pub mod jwt;
pub mod validation;
