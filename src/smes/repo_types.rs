use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sme {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub business_name: String,
    pub location: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Owner fields shown next to a listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OwnerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmeListing {
    #[serde(flatten)]
    pub sme: Sme,
    pub owner: OwnerSummary,
}

/// Flat row of `smes JOIN users`.
#[derive(Debug, FromRow)]
pub struct SmeListingRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub business_name: String,
    pub location: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner_name: String,
    pub owner_email: Option<String>,
}

impl From<SmeListingRow> for SmeListing {
    fn from(r: SmeListingRow) -> Self {
        Self {
            owner: OwnerSummary {
                id: r.owner_id,
                name: r.owner_name,
                email: r.owner_email,
            },
            sme: Sme {
                id: r.id,
                owner_id: r.owner_id,
                business_name: r.business_name,
                location: r.location,
                category: r.category,
                price_range: r.price_range,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
        }
    }
}

/// Fields a listing update may change; `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct SmePatch {
    pub business_name: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<String>,
}

impl Sme {
    pub fn apply(&mut self, patch: &SmePatch) {
        if let Some(v) = &patch.business_name {
            self.business_name = v.clone();
        }
        if let Some(v) = &patch.location {
            self.location = Some(v.clone());
        }
        if let Some(v) = &patch.category {
            self.category = Some(v.clone());
        }
        if let Some(v) = &patch.price_range {
            self.price_range = Some(v.clone());
        }
        self.updated_at = OffsetDateTime::now_utc();
    }
}
