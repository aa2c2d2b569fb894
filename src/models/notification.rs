use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "success" => Ok(Severity::Success),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub read: bool,
    pub created_at: i64,
}

impl Notification {
    #[cfg(test)]
    pub fn new(user_id: Uuid, title: &str, message: &str, severity: Severity, created_at: i64) -> Self {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            message: message.to_string(),
            severity,
            read: false,
            created_at,
        }
    }
}

#[derive(sqlx::FromRow, Debug)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub severity: String,
    pub read: bool,
    pub created_at: i64,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = String;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            message: row.message,
            severity: row.severity.parse()?,
            read: row.read,
            created_at: row.created_at,
        })
    }
}

/// Per-user notification toggles. `id` is `None` for the implicit all-on
/// defaults of a user who never saved preferences.
#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub session_start: bool,
    pub session_end: bool,
    pub weekly_report: bool,
    pub sound: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        NotificationPreferences {
            id: None,
            session_start: true,
            session_end: true,
            weekly_report: true,
            sound: true,
        }
    }
}

impl NotificationPreferences {
    #[cfg(test)]
    pub fn apply(&mut self, patch: &PreferencesPatch) {
        if let Some(value) = patch.session_start {
            self.session_start = value;
        }
        if let Some(value) = patch.session_end {
            self.session_end = value;
        }
        if let Some(value) = patch.weekly_report {
            self.weekly_report = value;
        }
        if let Some(value) = patch.sound {
            self.sound = value;
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PreferencesPatch {
    pub session_start: Option<bool>,
    pub session_end: Option<bool>,
    pub weekly_report: Option<bool>,
    pub sound: Option<bool>,
}
