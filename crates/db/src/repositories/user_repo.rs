//! Repository for the `users` table.

use hrflow_core::policy::Scope;
use hrflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::ScopeFilter;

/// Column list for `users` queries.
const COLUMNS: &str = "id, name, email, password_hash, role, phone, salary, profile_picture, \
                       is_online, created_by, status, created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role, phone, salary, \
                                profile_picture, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .bind(&input.phone)
            .bind(input.salary)
            .bind(&input.profile_picture)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email address (exact match).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Load several users at once.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ANY($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List users visible under `scope`, newest first.
    pub async fn list(pool: &PgPool, scope: Scope) -> Result<Vec<User>, sqlx::Error> {
        let filter = ScopeFilter::new(
            scope,
            "id = $1 \
             OR id = (SELECT created_by FROM users WHERE id = $1) \
             OR (role = 'employee' AND created_by = \
                 (SELECT created_by FROM users WHERE id = $1 AND role = 'employee'))",
            "id = $1 \
             OR id = (SELECT created_by FROM users WHERE id = $1) \
             OR (role = 'employee' AND created_by = \
                 (SELECT created_by FROM users WHERE id = $1 AND role = 'employee'))",
            "id = $1 OR role = 'admin' OR created_by = $1",
        );
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE {} ORDER BY created_at DESC, id DESC",
            filter.clause
        );
        let mut q = sqlx::query_as::<_, User>(&query);
        if let Some(id) = filter.bind {
            q = q.bind(id);
        }
        q.fetch_all(pool).await
    }

    /// The first admin account ever created.
    pub async fn oldest_admin(pool: &PgPool) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE role = 'admin' \
             ORDER BY created_at ASC, id ASC LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query).fetch_optional(pool).await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                salary = COALESCE($4, salary), \
                profile_picture = COALESCE($5, profile_picture), \
                status = COALESCE($6, status) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(input.salary)
            .bind(&input.profile_picture)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Replace the password hash. Returns `true` if the user existed.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip the presence flag set on login and cleared on logout.
    pub async fn set_online(pool: &PgPool, id: DbId, online: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_online = $2 WHERE id = $1")
            .bind(id)
            .bind(online)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
