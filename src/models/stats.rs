use serde::Serialize;

use crate::models::session::Session;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_duration: i64,
    pub sessions_count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeStats {
    pub total_duration: i64,
    pub sessions_count: usize,
    pub sessions: Vec<Session>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOverview {
    pub today_duration: i64,
    pub month_duration: i64,
    pub active_session: Option<Session>,
}
