use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Sme, SmeListing, SmeListingRow};
use crate::auth::repo::StoreError;

#[async_trait]
pub trait SmeStore: Send + Sync {
    async fn insert(&self, sme: &Sme) -> Result<(), StoreError>;
    /// Newest first.
    async fn list(&self) -> Result<Vec<SmeListing>, StoreError>;
    async fn find(&self, id: Uuid) -> Result<Option<SmeListing>, StoreError>;
    /// `None` when the listing is missing or belongs to someone else.
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Sme>, StoreError>;
    /// `false` when the listing was gone by the time of the write.
    async fn update(&self, sme: &Sme) -> Result<bool, StoreError>;
    /// `false` when nothing owned by `owner_id` matched.
    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgSmeStore {
    db: PgPool,
}

impl PgSmeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const LISTING_SELECT: &str = r#"
    SELECT s.id, s.owner_id, s.business_name, s.location, s.category, s.price_range,
           s.created_at, s.updated_at, u.name AS owner_name, u.email AS owner_email
    FROM smes s
    JOIN users u ON u.id = s.owner_id
"#;

#[async_trait]
impl SmeStore for PgSmeStore {
    async fn insert(&self, sme: &Sme) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO smes (id, owner_id, business_name, location, category, price_range, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(sme.id)
        .bind(sme.owner_id)
        .bind(&sme.business_name)
        .bind(&sme.location)
        .bind(&sme.category)
        .bind(&sme.price_range)
        .bind(sme.created_at)
        .bind(sme.updated_at)
        .execute(&self.db)
        .await
        .context("insert sme")?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SmeListing>, StoreError> {
        let sql = format!("{LISTING_SELECT} ORDER BY s.created_at DESC");
        let rows = sqlx::query_as::<_, SmeListingRow>(&sql)
            .fetch_all(&self.db)
            .await
            .context("list smes")?;
        Ok(rows.into_iter().map(SmeListing::from).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<SmeListing>, StoreError> {
        let sql = format!("{LISTING_SELECT} WHERE s.id = $1");
        let row = sqlx::query_as::<_, SmeListingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find sme")?;
        Ok(row.map(SmeListing::from))
    }

    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Sme>, StoreError> {
        let sme = sqlx::query_as::<_, Sme>(
            r#"
            SELECT id, owner_id, business_name, location, category, price_range, created_at, updated_at
            FROM smes
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("find owned sme")?;
        Ok(sme)
    }

    async fn update(&self, sme: &Sme) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE smes
            SET business_name = $3, location = $4, category = $5, price_range = $6, updated_at = $7
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(sme.id)
        .bind(sme.owner_id)
        .bind(&sme.business_name)
        .bind(&sme.location)
        .bind(&sme.category)
        .bind(&sme.price_range)
        .bind(sme.updated_at)
        .execute(&self.db)
        .await
        .context("update sme")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM smes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await
            .context("delete sme")?;
        Ok(result.rows_affected() > 0)
    }
}
