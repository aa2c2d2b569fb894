use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{DeleteOutcome, EmployeeStore, NotificationStore, SessionStore};
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeePatch, EmployeeRow};
use crate::models::notification::{
    Notification, NotificationPreferences, NotificationRow, PreferencesPatch,
};
use crate::models::session::{Location, Session, SessionRow, SessionStatus};

const EMPLOYEE_COLUMNS: &str = "id, user_id, employee_code, first_name, last_name, role";

const SESSION_COLUMNS: &str = "id, employee_id, start_time, end_time, \
     start_latitude, start_longitude, start_location_name, \
     end_latitude, end_longitude, end_location_name, status, duration_ms";

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, severity, read, created_at";

/// PostgreSQL adapter for all storage ports.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPool::connect(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

fn decode<R, T>(row: R) -> Result<T, AppError>
where
    T: TryFrom<R, Error = String>,
{
    T::try_from(row).map_err(|err| {
        log::error!("Corrupt row: {}", err);
        AppError::InternalServerError("Corrupt record".to_string())
    })
}

fn decode_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter().map(decode).collect()
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn find_employee_by_user(&self, user_id: Uuid) -> Result<Option<Employee>, AppError> {
        let sql = format!("SELECT {} FROM employees WHERE user_id = $1", EMPLOYEE_COLUMNS);
        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }

    async fn find_employee(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        let sql = format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS);
        sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }

    async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let sql = format!(
            "SELECT {} FROM employees ORDER BY last_name, first_name",
            EMPLOYEE_COLUMNS
        );
        let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        decode_all(rows)
    }

    async fn insert_employee(&self, employee: &Employee) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO employees (id, user_id, employee_code, first_name, last_name, role) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(employee.id)
        .bind(employee.user_id)
        .bind(&employee.employee_code)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(employee.role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_employee(
        &self,
        id: Uuid,
        patch: &EmployeePatch,
    ) -> Result<Option<Employee>, AppError> {
        if patch.is_empty() {
            return self.find_employee(id).await;
        }

        let mut query: sqlx::QueryBuilder<'_, sqlx::Postgres> =
            sqlx::QueryBuilder::new("UPDATE employees SET ");
        let mut separated = query.separated(", ");
        if let Some(first_name) = &patch.first_name {
            separated.push("first_name = ");
            separated.push_bind_unseparated(first_name.clone());
        }
        if let Some(last_name) = &patch.last_name {
            separated.push("last_name = ");
            separated.push_bind_unseparated(last_name.clone());
        }
        if let Some(role) = patch.role {
            separated.push("role = ");
            separated.push_bind_unseparated(role.as_str());
        }
        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" RETURNING ");
        query.push(EMPLOYEE_COLUMNS);

        query
            .build_query_as::<EmployeeRow>()
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }

    async fn delete_employee(&self, id: Uuid) -> Result<DeleteOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        // Blocks clock-ins until commit: their foreign key check needs a
        // key-share lock on this row.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM employees WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        let clocked_in: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sessions WHERE employee_id = $1 AND status = 'active')",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if clocked_in {
            return Ok(DeleteOutcome::ClockedIn);
        }

        // Completed sessions go with the employee through ON DELETE CASCADE.
        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(DeleteOutcome::Deleted)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn find_active_session(&self, employee_id: Uuid) -> Result<Option<Session>, AppError> {
        let sql = format!(
            "SELECT {} FROM sessions WHERE employee_id = $1 AND status = 'active'",
            SESSION_COLUMNS
        );
        sqlx::query_as::<_, SessionRow>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }

    async fn insert_active_session(&self, session: &Session) -> Result<(), AppError> {
        // The partial unique index rejects a second active row for the employee.
        sqlx::query(
            "INSERT INTO sessions (id, employee_id, start_time, \
             start_latitude, start_longitude, start_location_name, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(session.id)
        .bind(session.employee_id)
        .bind(session.start_time)
        .bind(session.start_location.latitude)
        .bind(session.start_location.longitude)
        .bind(&session.start_location.name)
        .bind(SessionStatus::Active.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn complete_active_session(
        &self,
        employee_id: Uuid,
        end_time: i64,
        end_location: &Location,
    ) -> Result<Option<Session>, AppError> {
        let sql = format!(
            "UPDATE sessions SET end_time = $2, end_latitude = $3, end_longitude = $4, \
             end_location_name = $5, status = 'completed', duration_ms = $2 - start_time \
             WHERE employee_id = $1 AND status = 'active' RETURNING {}",
            SESSION_COLUMNS
        );
        sqlx::query_as::<_, SessionRow>(&sql)
            .bind(employee_id)
            .bind(end_time)
            .bind(end_location.latitude)
            .bind(end_location.longitude)
            .bind(&end_location.name)
            .fetch_optional(&self.pool)
            .await?
            .map(decode)
            .transpose()
    }

    async fn sessions_started_between(
        &self,
        employee_id: Uuid,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Vec<Session>, AppError> {
        let sql = format!(
            "SELECT {} FROM sessions WHERE employee_id = $1 \
             AND ($2::BIGINT IS NULL OR start_time >= $2) \
             AND ($3::BIGINT IS NULL OR start_time <= $3) \
             ORDER BY start_time",
            SESSION_COLUMNS
        );
        let rows = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(employee_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        decode_all(rows)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn list_notifications(
        &self,
        user_id: Uuid,
        only_unread: bool,
    ) -> Result<Vec<Notification>, AppError> {
        let sql = format!(
            "SELECT {} FROM notifications WHERE user_id = $1 AND (NOT $2 OR read = FALSE) \
             ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, NotificationRow>(&sql)
            .bind(user_id)
            .bind(only_unread)
            .fetch_all(&self.pool)
            .await?;
        decode_all(rows)
    }

    async fn mark_notification_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let updated = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(updated > 0)
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let updated =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(updated)
    }

    async fn find_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<NotificationPreferences>, AppError> {
        let prefs = sqlx::query_as::<_, NotificationPreferences>(
            "SELECT id, session_start, session_end, weekly_report, sound \
             FROM notification_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(prefs)
    }

    async fn upsert_preferences(
        &self,
        user_id: Uuid,
        patch: &PreferencesPatch,
    ) -> Result<NotificationPreferences, AppError> {
        let prefs = sqlx::query_as::<_, NotificationPreferences>(
            "INSERT INTO notification_preferences AS p \
             (id, user_id, session_start, session_end, weekly_report, sound) \
             VALUES ($1, $2, COALESCE($3, TRUE), COALESCE($4, TRUE), COALESCE($5, TRUE), COALESCE($6, TRUE)) \
             ON CONFLICT (user_id) DO UPDATE SET \
             session_start = COALESCE($3, p.session_start), \
             session_end = COALESCE($4, p.session_end), \
             weekly_report = COALESCE($5, p.weekly_report), \
             sound = COALESCE($6, p.sound) \
             RETURNING id, session_start, session_end, weekly_report, sound",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(patch.session_start)
        .bind(patch.session_end)
        .bind(patch.weekly_report)
        .bind(patch.sound)
        .fetch_one(&self.pool)
        .await?;
        Ok(prefs)
    }
}
