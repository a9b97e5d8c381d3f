use serde::Deserialize;

use super::repo_types::SmePatch;

/// Body for creating and updating a listing. On update every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmeRequest {
    pub business_name: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub price_range: Option<String>,
}

fn clean(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl From<SmeRequest> for SmePatch {
    fn from(r: SmeRequest) -> Self {
        Self {
            business_name: clean(r.business_name),
            location: clean(r.location),
            category: clean(r.category),
            price_range: clean(r.price_range),
        }
    }
}
