use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("unknown session status '{}'", other)),
        }
    }
}

/// One clock-in/clock-out interval. Times are epoch milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    pub start_location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_location: Option<Location>,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

impl Session {
    pub fn start(employee_id: Uuid, start_time: i64, start_location: Location) -> Self {
        Session {
            id: Uuid::new_v4(),
            employee_id,
            start_time,
            end_time: None,
            start_location,
            end_location: None,
            status: SessionStatus::Active,
            duration: None,
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Active -> Completed. The duration is always `end_time - start_time`.
    /// Mirrors the conditional update the PostgreSQL store runs on clock-out.
    #[cfg(test)]
    pub fn complete(&mut self, end_time: i64, end_location: Location) {
        self.end_time = Some(end_time);
        self.end_location = Some(end_location);
        self.status = SessionStatus::Completed;
        self.duration = Some(end_time - self.start_time);
    }

    /// Elapsed milliseconds as of `now`: the stored duration once completed,
    /// the live running time while active.
    pub fn elapsed_at(&self, now: i64) -> i64 {
        match self.status {
            SessionStatus::Completed => self.duration.unwrap_or(0),
            SessionStatus::Active => (now - self.start_time).max(0),
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
pub struct SessionRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub start_location_name: String,
    pub end_latitude: Option<f64>,
    pub end_longitude: Option<f64>,
    pub end_location_name: Option<String>,
    pub status: String,
    pub duration_ms: Option<i64>,
}

impl TryFrom<SessionRow> for Session {
    type Error = String;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let end_location = match (row.end_latitude, row.end_longitude, row.end_location_name) {
            (Some(latitude), Some(longitude), Some(name)) => Some(Location {
                latitude,
                longitude,
                name,
            }),
            _ => None,
        };

        Ok(Session {
            id: row.id,
            employee_id: row.employee_id,
            start_time: row.start_time,
            end_time: row.end_time,
            start_location: Location {
                latitude: row.start_latitude,
                longitude: row.start_longitude,
                name: row.start_location_name,
            },
            end_location,
            status: row.status.parse()?,
            duration: row.duration_ms,
        })
    }
}
