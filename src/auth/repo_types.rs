use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{identifier::Identifier, password};

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,                         // unique user ID
    pub name: String,                     // display name
    pub username: String,                 // lowercase, unique
    pub email: Option<String>,            // lowercase, unique when present
    pub phone_number: Option<String>,     // unique when present
    pub password_hash: String,            // Argon2 hash, never leaves the server
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Already-validated registration input.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub identifier: Identifier,
    pub password: String,
}

impl User {
    /// Builds a fresh record, hashing the plaintext password exactly once.
    pub fn create(new: NewUser) -> anyhow::Result<User> {
        let password_hash = password::hash_password(&new.password)?;
        let (email, phone_number) = match new.identifier {
            Identifier::Email(e) => (Some(e), None),
            Identifier::Phone(p) => (None, Some(p)),
        };
        let now = OffsetDateTime::now_utc();
        Ok(User {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            username: new.username.trim().to_lowercase(),
            email,
            phone_number,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    /// The only path that replaces `password_hash` on an existing record.
    pub fn change_password(&mut self, plain: &str) -> anyhow::Result<()> {
        self.password_hash = password::hash_password(plain)?;
        self.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    pub fn verify_password(&self, plain: &str) -> anyhow::Result<bool> {
        password::verify_password(plain, &self.password_hash)
    }
}
