use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PropertyId, ReviewId, UserId};

/// What a review is about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    Seller,
    Property,
    #[default]
    Both,
}

/// A buyer's rating of a seller and/or property. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub seller: UserId,
    pub buyer: UserId,
    pub property: PropertyId,
    /// 1 to 5 inclusive
    pub rating: u8,
    pub comment: Option<String>,
    pub review_type: ReviewType,
    pub created_at: DateTime<Utc>,
}
