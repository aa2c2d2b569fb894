use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use mockable::Clock;
use std::sync::Arc;

use crate::db::Store;
use crate::utils::geocode::ReverseGeocoder;

/// Shared per-process dependencies handed to every handler.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock + Send + Sync>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    /// Zone in which "today" and "this month" are evaluated.
    pub timezone: Tz,
    pub jwt_secret: String,
    pub location_fallback: String,
}

impl AppState {
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    pub fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}
