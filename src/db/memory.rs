use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::db::{DeleteOutcome, EmployeeStore, NotificationStore, SessionStore};
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeePatch};
use crate::models::notification::{Notification, NotificationPreferences, PreferencesPatch};
use crate::models::session::{Location, Session};

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    sessions: Vec<Session>,
    notifications: Vec<Notification>,
    preferences: Vec<(Uuid, NotificationPreferences)>,
}

/// In-process store used by tests. One lock guards every table, so each
/// operation is atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Inserts a session as-is, bypassing the clock-in checks.
    pub fn seed_session(&self, session: Session) {
        self.lock().sessions.push(session);
    }

    /// Notifications are produced outside this service; tests drop them in directly.
    pub fn seed_notification(&self, notification: Notification) {
        self.lock().notifications.push(notification);
    }

    pub fn all_sessions(&self) -> Vec<Session> {
        self.lock().sessions.clone()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn find_employee_by_user(&self, user_id: Uuid) -> Result<Option<Employee>, AppError> {
        Ok(self.lock().employees.iter().find(|e| e.user_id == user_id).cloned())
    }

    async fn find_employee(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        Ok(self.lock().employees.iter().find(|e| e.id == id).cloned())
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let mut employees = self.lock().employees.clone();
        employees.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        Ok(employees)
    }

    async fn insert_employee(&self, employee: &Employee) -> Result<(), AppError> {
        let mut tables = self.lock();
        if tables.employees.iter().any(|e| e.user_id == employee.user_id) {
            return Err(AppError::Conflict("Employee already exists".to_string()));
        }
        if tables
            .employees
            .iter()
            .any(|e| e.employee_code == employee.employee_code)
        {
            return Err(AppError::Conflict("Employee code already in use".to_string()));
        }
        tables.employees.push(employee.clone());
        Ok(())
    }

    async fn update_employee(
        &self,
        id: Uuid,
        patch: &EmployeePatch,
    ) -> Result<Option<Employee>, AppError> {
        let mut tables = self.lock();
        Ok(tables.employees.iter_mut().find(|e| e.id == id).map(|employee| {
            employee.apply(patch);
            employee.clone()
        }))
    }

    async fn delete_employee(&self, id: Uuid) -> Result<DeleteOutcome, AppError> {
        let mut tables = self.lock();
        if !tables.employees.iter().any(|e| e.id == id) {
            return Ok(DeleteOutcome::NotFound);
        }
        if tables
            .sessions
            .iter()
            .any(|s| s.employee_id == id && s.is_active())
        {
            return Ok(DeleteOutcome::ClockedIn);
        }
        tables.employees.retain(|e| e.id != id);
        tables.sessions.retain(|s| s.employee_id != id);
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn find_active_session(&self, employee_id: Uuid) -> Result<Option<Session>, AppError> {
        Ok(self
            .lock()
            .sessions
            .iter()
            .find(|s| s.employee_id == employee_id && s.is_active())
            .cloned())
    }

    async fn insert_active_session(&self, session: &Session) -> Result<(), AppError> {
        let mut tables = self.lock();
        if !tables.employees.iter().any(|e| e.id == session.employee_id) {
            return Err(AppError::Conflict("Employee no longer exists".to_string()));
        }
        if tables
            .sessions
            .iter()
            .any(|s| s.employee_id == session.employee_id && s.is_active())
        {
            return Err(AppError::Conflict("Already clocked in".to_string()));
        }
        tables.sessions.push(session.clone());
        Ok(())
    }

    async fn complete_active_session(
        &self,
        employee_id: Uuid,
        end_time: i64,
        end_location: &Location,
    ) -> Result<Option<Session>, AppError> {
        let mut tables = self.lock();
        Ok(tables
            .sessions
            .iter_mut()
            .find(|s| s.employee_id == employee_id && s.is_active())
            .map(|session| {
                session.complete(end_time, end_location.clone());
                session.clone()
            }))
    }

    async fn sessions_started_between(
        &self,
        employee_id: Uuid,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<Session>, AppError> {
        let mut sessions: Vec<Session> = self
            .lock()
            .sessions
            .iter()
            .filter(|s| s.employee_id == employee_id)
            .filter(|s| start.map_or(true, |start| s.start_time >= start))
            .filter(|s| end.map_or(true, |end| s.start_time <= end))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn list_notifications(
        &self,
        user_id: Uuid,
        only_unread: bool,
    ) -> Result<Vec<Notification>, AppError> {
        let mut notifications: Vec<Notification> = self
            .lock()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && (!only_unread || !n.read))
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.lock();
        match tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let mut tables = self.lock();
        let mut updated = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            notification.read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn find_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NotificationPreferences>, AppError> {
        Ok(self
            .lock()
            .preferences
            .iter()
            .find(|(owner, _)| *owner == user_id)
            .map(|(_, prefs)| prefs.clone()))
    }

    async fn upsert_preferences(
        &self,
        user_id: Uuid,
        patch: &PreferencesPatch,
    ) -> Result<NotificationPreferences, AppError> {
        let mut tables = self.lock();
        if let Some((_, prefs)) = tables
            .preferences
            .iter_mut()
            .find(|(owner, _)| *owner == user_id)
        {
            prefs.apply(patch);
            return Ok(prefs.clone());
        }

        let mut prefs = NotificationPreferences {
            id: Some(Uuid::new_v4()),
            ..NotificationPreferences::default()
        };
        prefs.apply(patch);
        tables.preferences.push((user_id, prefs.clone()));
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::Role;
    use crate::test_support::{enroll, office};

    fn active_for(store: &MemoryStore, employee_id: Uuid) -> usize {
        store
            .all_sessions()
            .iter()
            .filter(|s| s.employee_id == employee_id && s.is_active())
            .count()
    }

    #[actix_web::test]
    async fn second_active_session_is_rejected_by_the_store() {
        let store = MemoryStore::new();
        let (employee, _) = enroll(&store, "E-1", Role::Employee).await;

        store
            .insert_active_session(&Session::start(employee.id, 1_000, office()))
            .await
            .unwrap();
        let err = store
            .insert_active_session(&Session::start(employee.id, 2_000, office()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(msg) if msg == "Already clocked in"));
        assert_eq!(active_for(&store, employee.id), 1);
    }

    #[actix_web::test]
    async fn completed_sessions_do_not_block_a_new_one() {
        let store = MemoryStore::new();
        let (employee, _) = enroll(&store, "E-1", Role::Employee).await;

        store
            .insert_active_session(&Session::start(employee.id, 1_000, office()))
            .await
            .unwrap();
        store
            .complete_active_session(employee.id, 5_000, &office())
            .await
            .unwrap()
            .unwrap();
        store
            .insert_active_session(&Session::start(employee.id, 6_000, office()))
            .await
            .unwrap();

        assert_eq!(active_for(&store, employee.id), 1);
        assert_eq!(store.all_sessions().len(), 2);
    }

    #[actix_web::test]
    async fn session_for_a_deleted_employee_is_rejected() {
        let store = MemoryStore::new();
        let (employee, _) = enroll(&store, "E-1", Role::Employee).await;
        assert_eq!(
            store.delete_employee(employee.id).await.unwrap(),
            DeleteOutcome::Deleted
        );

        let err = store
            .insert_active_session(&Session::start(employee.id, 1_000, office()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(msg) if msg == "Employee no longer exists"));
        assert!(store.all_sessions().is_empty());
    }

    #[actix_web::test]
    async fn delete_refuses_while_clocked_in_and_keeps_the_session() {
        let store = MemoryStore::new();
        let (employee, _) = enroll(&store, "E-1", Role::Employee).await;
        store
            .insert_active_session(&Session::start(employee.id, 1_000, office()))
            .await
            .unwrap();

        assert_eq!(
            store.delete_employee(employee.id).await.unwrap(),
            DeleteOutcome::ClockedIn
        );
        assert_eq!(active_for(&store, employee.id), 1);
        assert!(store.find_employee(employee.id).await.unwrap().is_some());
    }
}
