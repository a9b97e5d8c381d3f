use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload: the minimal identity plus validity window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,    // user ID
    pub username: String, // lowercase username at issue time
    pub iat: usize,       // issued at (unix timestamp)
    pub exp: usize,       // expires at (unix timestamp)
}
