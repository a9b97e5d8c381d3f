use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::{identifier::Identifier, repo_types::User},
    error::AppError,
};

/// Columns with a unique constraint on `users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    PhoneNumber,
}

impl UniqueField {
    pub fn conflict_message(self) -> &'static str {
        match self {
            UniqueField::Username => "Username already exists.",
            UniqueField::Email => "Email already exists.",
            UniqueField::PhoneNumber => "Phone number already exists.",
        }
    }

    fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "users_username_key" => Some(UniqueField::Username),
            "users_email_key" => Some(UniqueField::Email),
            "users_phone_number_key" => Some(UniqueField::PhoneNumber),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{} is already taken", .0.conflict_message())]
    Conflict(UniqueField),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Conflicts keep their user-facing message; anything else becomes a 500.
    pub fn into_app_error(self, context: &str) -> AppError {
        match self {
            StoreError::Conflict(field) => AppError::Conflict(field.conflict_message().into()),
            StoreError::Other(e) => AppError::internal(context, e),
        }
    }
}

/// Persistence boundary for credential records.
///
/// The unique constraints behind `insert`/`update` are the real uniqueness
/// guarantee; implementations must report violations as [`StoreError::Conflict`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
    async fn update(&self, user: &User) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_identifier(&self, id: &Identifier) -> Result<Option<User>, StoreError> {
        match id {
            Identifier::Email(email) => self.find_by_email(email).await,
            Identifier::Phone(phone) => self.find_by_phone(phone).await,
        }
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_where(&self, column: &str, value: &str) -> Result<Option<User>, StoreError> {
        let sql = format!(
            r#"
            SELECT id, name, username, email, phone_number, password_hash, created_at, updated_at
            FROM users
            WHERE {column} = $1
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("find user by {column}"))?;
        Ok(user)
    }
}

fn map_write_error(e: sqlx::Error, what: &'static str) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if let Some(field) = db_err.constraint().and_then(UniqueField::from_constraint) {
                return StoreError::Conflict(field);
            }
        }
    }
    StoreError::Other(anyhow::Error::new(e).context(what))
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, username, email, phone_number, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_write_error(e, "insert user"))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, username = $3, email = $4, phone_number = $5,
                password_hash = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .bind(user.updated_at)
        .execute(&self.db)
        .await
        .map_err(|e| map_write_error(e, "update user"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Other(anyhow::anyhow!("user {} vanished during update", user.id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, username, email, phone_number, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_where("username", &username.to_lowercase()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_where("email", &email.to_lowercase()).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        self.find_where("phone_number", phone).await
    }
}
