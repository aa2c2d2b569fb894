//! Shared fixtures for unit and HTTP tests.

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::db::memory::MemoryStore;
use crate::db::EmployeeStore;
use crate::models::employee::{Employee, Role};
use crate::models::session::Location;
use crate::services::lifecycle::ClockPoint;
use crate::state::AppState;
use crate::utils::auth::Caller;
use crate::utils::geocode::ReverseGeocoder;
use crate::utils::jwt::generate_token;

pub const TEST_SECRET: &str = "test-secret";
pub const FALLBACK_LOCATION: &str = "Unknown location";

/// 2025-03-14 10:30:00 UTC
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_ms(&self, ms: i64) {
        *self.0.lock().expect("clock mutex") += chrono::Duration::milliseconds(ms);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}

/// Resolves every coordinate to the same place, or to nothing.
pub struct StaticGeocoder(pub Option<String>);

#[async_trait]
impl ReverseGeocoder for StaticGeocoder {
    async fn place_name(&self, _latitude: f64, _longitude: f64) -> Option<String> {
        self.0.clone()
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<MutableClock>,
}

pub fn test_context() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(MutableClock::new(fixture_now()));
    let state = web::Data::new(AppState {
        store: store.clone(),
        clock: clock.clone(),
        geocoder: Arc::new(StaticGeocoder(Some("Milano (Lombardia)".to_string()))),
        timezone: chrono_tz::UTC,
        jwt_secret: TEST_SECRET.to_string(),
        location_fallback: FALLBACK_LOCATION.to_string(),
    });
    TestContext { state, store, clock }
}

pub fn test_state() -> (web::Data<AppState>, Arc<MemoryStore>) {
    let ctx = test_context();
    (ctx.state, ctx.store)
}

pub fn bearer(user_id: Uuid) -> String {
    format!("Bearer {}", generate_token(&user_id.to_string(), TEST_SECRET))
}

pub fn office() -> Location {
    Location {
        latitude: 45.4642,
        longitude: 9.19,
        name: "Milano (Lombardia)".to_string(),
    }
}

pub fn office_point() -> ClockPoint {
    ClockPoint {
        latitude: 45.4642,
        longitude: 9.19,
        name: Some("Milano (Lombardia)".to_string()),
    }
}

/// Registers an employee with the given role and returns it with its caller.
pub async fn enroll(store: &MemoryStore, code: &str, role: Role) -> (Employee, Caller) {
    let user_id = Uuid::new_v4();
    let mut employee = Employee::new(user_id, code.to_string(), "Test".to_string(), code.to_string());
    employee.role = role;
    store.insert_employee(&employee).await.expect("insert employee");
    (employee, Caller::User(user_id))
}
