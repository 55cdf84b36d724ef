use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

pub const DEFAULT_PROFILE_PICTURE: &str =
    "https://placehold.co/150x150/EFEFEF/AAAAAA?text=No+Image";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Buyer,
    Seller,
}

/// A registered marketplace user.
///
/// `average_rating` and `total_sales` are derived from the user's reviews
/// and are only written by the review aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub phone_number: Option<String>,
    pub profile_picture: String,
    pub average_rating: f64,
    pub total_sales: u64,
    pub created_at: DateTime<Utc>,
}

/// Identity fields resolved for display alongside other records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub profile_picture: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            profile_picture: user.profile_picture.clone(),
        }
    }
}
