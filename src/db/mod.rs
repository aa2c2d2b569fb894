//! Storage ports used by the services, plus their adapters.
//!
//! Every write that guards an invariant (one active session per employee,
//! one employee per user, one preference record per user) is a single atomic
//! operation in the adapter, never a read followed by a separate write.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeePatch};
use crate::models::notification::{Notification, NotificationPreferences, PreferencesPatch};
use crate::models::session::{Location, Session};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    ClockedIn,
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_employee_by_user(&self, user_id: Uuid) -> Result<Option<Employee>, AppError>;

    async fn find_employee(&self, id: Uuid) -> Result<Option<Employee>, AppError>;

    async fn list_employees(&self) -> Result<Vec<Employee>, AppError>;

    /// Fails with `Conflict` when the user already owns an employee record or
    /// the employee code is taken.
    async fn insert_employee(&self, employee: &Employee) -> Result<(), AppError>;

    async fn update_employee(
        &self,
        id: Uuid,
        patch: &EmployeePatch,
    ) -> Result<Option<Employee>, AppError>;

    /// Removes the employee together with its sessions, unless it is clocked in.
    async fn delete_employee(&self, id: Uuid) -> Result<DeleteOutcome, AppError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find_active_session(&self, employee_id: Uuid) -> Result<Option<Session>, AppError>;

    /// Fails with `Conflict("Already clocked in")` if the employee already has
    /// an active session, including one inserted concurrently.
    async fn insert_active_session(&self, session: &Session) -> Result<(), AppError>;

    /// Completes the employee's active session, if any, in one step.
    async fn complete_active_session(
        &self,
        employee_id: Uuid,
        end_time: i64,
        end_location: &Location,
    ) -> Result<Option<Session>, AppError>;

    /// Sessions whose start time falls within the bounds, inclusive, ordered by
    /// start time. Missing bounds are open.
    async fn sessions_started_between(
        &self,
        employee_id: Uuid,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<Session>, AppError>;
}

/// Notifications are written by an external producer; this port only reads
/// and acknowledges them.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Newest first.
    async fn list_notifications(
        &self,
        user_id: Uuid,
        only_unread: bool,
    ) -> Result<Vec<Notification>, AppError>;

    /// Returns `false` when no notification with this id belongs to the user.
    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, AppError>;

    async fn find_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NotificationPreferences>, AppError>;

    /// Patches the stored record, or inserts one built from the defaults with the
    /// patch applied. The stored identifier never changes once assigned.
    async fn upsert_preferences(
        &self,
        user_id: Uuid,
        patch: &PreferencesPatch,
    ) -> Result<NotificationPreferences, AppError>;
}

pub trait Store: EmployeeStore + SessionStore + NotificationStore {}

impl<T> Store for T where T: EmployeeStore + SessionStore + NotificationStore {}
