use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

/// Storage-layer failure, typed so callers can recognize uniqueness
/// violations without inspecting message text.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("phone number already exists")]
    Conflict,

    #[error("record not found")]
    NotFound,

    #[error("empty change-set")]
    EmptyPatch,

    #[error(transparent)]
    Database(sqlx::Error),
}

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

fn map_db_err(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(ref db_err)
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
        {
            StoreError::Conflict
        }
        other => StoreError::Database(other),
    }
}

pub struct NewUser<'a> {
    pub full_name: &'a str,
    pub phone_number: &'a str,
    pub password_hash: &'a str,
}

/// Row returned for login: enough to verify the password.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LoginRow {
    pub id: i64,
    pub full_name: String,
    pub password_hash: String,
}

/// Full profile row, fetched by id. Never carries the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub full_name: String,
    pub phone_number: String,
    pub successful_login: i64,
}

/// Sparse update: only present fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone_number.is_none()
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser<'_>) -> Result<i64, StoreError>;
    async fn find_by_phone(&self, phone_number: &str) -> Result<LoginRow, StoreError>;
    async fn find_by_id(&self, user_id: i64) -> Result<UserRow, StoreError>;
    async fn increment_login_count(&self, phone_number: &str) -> Result<(), StoreError>;
    async fn apply_patch(&self, user_id: i64, patch: &UserPatch) -> Result<(), StoreError>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert_user(&self, user: NewUser<'_>) -> Result<i64, StoreError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (phone_number, full_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user.phone_number)
        .bind(user.full_name)
        .bind(user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_db_err)?;
        Ok(id)
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<LoginRow, StoreError> {
        sqlx::query_as::<_, LoginRow>(
            r#"
            SELECT id, full_name, password_hash
            FROM users
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .fetch_one(&self.db)
        .await
        .map_err(map_db_err)
    }

    async fn find_by_id(&self, user_id: i64) -> Result<UserRow, StoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, full_name, phone_number, successful_login
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(map_db_err)
    }

    async fn increment_login_count(&self, phone_number: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET successful_login = successful_login + 1
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .execute(&self.db)
        .await
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn apply_patch(&self, user_id: i64, patch: &UserPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Err(StoreError::EmptyPatch);
        }

        // Patch values go through bind parameters only; they never appear
        // in the SQL text.
        let mut query = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut fields = query.separated(", ");
            if let Some(full_name) = &patch.full_name {
                fields.push("full_name = ");
                fields.push_bind_unseparated(full_name);
            }
            if let Some(phone_number) = &patch.phone_number {
                fields.push("phone_number = ");
                fields.push_bind_unseparated(phone_number);
            }
        }
        query.push(" WHERE id = ");
        query.push_bind(user_id);

        query
            .build()
            .execute(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }
}
