use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BidId, PropertyId, UserId};

/// Kind of real estate being listed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    Commercial,
    Land,
}

/// Availability of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Pending,
    Sold,
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub seller: UserId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub address: String,
    pub price: f64,
    pub minimum_bid: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    /// Floor area, square meters
    pub area: f64,
    pub property_type: PropertyType,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.seller == user
    }
}

/// A single entry in a property's bid ledger.
///
/// Bids are only ever appended; nothing edits or removes one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub property: PropertyId,
    pub bidder: UserId,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    pub fn new(property: PropertyId, bidder: UserId, amount: f64) -> Self {
        Self {
            id: BidId::new(),
            property,
            bidder,
            amount,
            created_at: Utc::now(),
        }
    }
}
