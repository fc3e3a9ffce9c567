/// MatchFlow backend wire types — serde shapes for deserializing REST
/// responses. These map to our clean domain types via the map_* functions in
/// client.rs.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct EventDto {
    pub id: Option<i64>,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "eventType")]
    pub event_type: Option<String>,
    pub sport: Option<String>,
    pub format: Option<String>,
    pub level: Option<String>,
    pub timezone: Option<String>,
    #[serde(rename = "locationName")]
    pub location_name: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>, // "2026-08-01"
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    #[serde(rename = "startTime")]
    pub start_time: Option<String>,
    #[serde(rename = "endTime")]
    pub end_time: Option<String>,
    #[serde(rename = "registrationDeadline")]
    pub registration_deadline: Option<String>,
    pub capacity: Option<u32>,
    #[serde(rename = "entryFee")]
    pub entry_fee: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "isPublic")]
    pub is_public: Option<bool>,
    #[serde(rename = "allowWaitlist")]
    pub allow_waitlist: Option<bool>,
    #[serde(rename = "requireApproval")]
    pub require_approval: Option<bool>,
}

// ---------------------------------------------------------------------------
// Tournament categories
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct CategoryDto {
    pub id: Option<i64>,
    #[serde(rename = "eventId")]
    pub event_id: Option<i64>,
    pub name: Option<String>,
    pub discipline: Option<String>, // "Singles", "Doubles Male", ...
    pub groups: Option<u32>,
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct TeamDto {
    pub id: Option<i64>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub players: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SubscriptionDto {
    #[serde(rename = "eventId")]
    pub event_id: Option<i64>,
    pub status: Option<String>, // "pending" | "confirmed" | "withdrawn"
    pub categories: Option<Vec<SubscriptionCategoryDto>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SubscriptionCategoryDto {
    #[serde(rename = "categoryId")]
    pub category_id: Option<i64>,
    #[serde(rename = "categoryName")]
    pub category_name: Option<String>,
    #[serde(rename = "partnerPreference")]
    pub partner_preference: Option<String>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoginResponse {
    pub token: Option<String>,
    /// Some deployments return the token under this key instead.
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
}
