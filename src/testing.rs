//! Shared fixtures for unit and HTTP tests

use crate::config::{Config, RatingConsistency};
use crate::mailer::{AppointmentEmail, Mailer};
use crate::models::{
    Property, PropertyId, PropertyStatus, PropertyType, Review, ReviewId, ReviewType, User,
    UserId, UserRole, DEFAULT_PROFILE_PICTURE,
};
use crate::services::appointments::AppointmentRequest;
use crate::services::catalog::PropertyDraft;
use crate::services::Marketplace;
use crate::store::{MarketStore, MemoryStore};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Remembers every message as `(kind, recipient)`; optionally fails after recording
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    async fn record(&self, kind: &str, to: &str) -> Result<()> {
        self.sent.lock().await.push((kind.to_string(), to.to_string()));
        if self.fail {
            bail!("smtp relay unreachable");
        }
        Ok(())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_buyer_confirmation(&self, email: &AppointmentEmail) -> Result<()> {
        self.record("buyer", &email.buyer_email).await
    }

    async fn send_seller_alert(&self, email: &AppointmentEmail) -> Result<()> {
        self.record("seller", &email.seller_email).await
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

pub fn user(username: &str, role: UserRole) -> User {
    User {
        id: UserId::new(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role,
        phone_number: None,
        profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
        average_rating: 0.0,
        total_sales: 0,
        created_at: Utc::now(),
    }
}

pub fn property(seller: UserId, minimum_bid: f64) -> Property {
    let now = Utc::now();
    Property {
        id: PropertyId::new(),
        seller,
        title: "Sunny two-bedroom".to_string(),
        description: "Bright corner unit with a balcony".to_string(),
        location: "Downtown".to_string(),
        address: "12 Harbor Street".to_string(),
        price: 250_000.0,
        minimum_bid,
        bedrooms: 2.0,
        bathrooms: 1.0,
        area: 70.0,
        property_type: PropertyType::Apartment,
        amenities: vec!["Balcony".to_string()],
        images: vec!["https://img.example.com/1.jpg".to_string()],
        status: PropertyStatus::Available,
        created_at: now,
        updated_at: now,
    }
}

pub fn review(seller: UserId, buyer: UserId, property: PropertyId, rating: u8) -> Review {
    Review {
        id: ReviewId::new(),
        seller,
        buyer,
        property,
        rating,
        comment: None,
        review_type: ReviewType::Both,
        created_at: Utc::now(),
    }
}

pub fn draft(price: f64, minimum_bid: Option<f64>) -> PropertyDraft {
    PropertyDraft {
        title: Some("Garden villa".to_string()),
        description: Some("Quiet street, large garden".to_string()),
        location: Some("Suburbs".to_string()),
        address: Some("4 Elm Road".to_string()),
        price: Some(price),
        minimum_bid,
        bedrooms: Some(4.0),
        bathrooms: Some(2.0),
        area: Some(180.0),
        property_type: Some(PropertyType::Villa),
        amenities: Some(vec!["Garden".to_string(), "Parking".to_string()]),
        images: Some(vec!["https://img.example.com/villa.jpg".to_string()]),
        status: None,
    }
}

pub fn booking(property: PropertyId, bid_amount: f64) -> AppointmentRequest {
    AppointmentRequest {
        property_id: Some(property),
        appointment_date: NaiveDate::from_ymd_opt(2026, 6, 1),
        appointment_time: Some("10:00".to_string()),
        bid_amount: Some(bid_amount),
        notes: None,
        buyer_phone: None,
    }
}

/// A store seeded with one seller, one buyer and one listing
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub market: Arc<Marketplace>,
    pub mailer: Arc<RecordingMailer>,
    pub seller: User,
    pub buyer: User,
    pub property: Property,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::build(0.0, RecordingMailer::default(), Config::default()).await
    }

    pub async fn with_minimum_bid(minimum_bid: f64) -> Self {
        Self::build(minimum_bid, RecordingMailer::default(), Config::default()).await
    }

    pub async fn with_failing_mailer() -> Self {
        Self::build(0.0, RecordingMailer::failing(), Config::default()).await
    }

    pub async fn with_rating_consistency(rating_consistency: RatingConsistency) -> Self {
        let config = Config {
            rating_consistency,
            ..Config::default()
        };
        Self::build(0.0, RecordingMailer::default(), config).await
    }

    async fn build(minimum_bid: f64, mailer: RecordingMailer, config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(mailer);
        let market = Arc::new(Marketplace::new(store.clone(), mailer.clone(), &config));

        let seller = user("seller", UserRole::Seller);
        let buyer = user("buyer", UserRole::Buyer);
        let property = property(seller.id, minimum_bid);
        assert!(store.insert_user(seller.clone()).await.unwrap());
        assert!(store.insert_user(buyer.clone()).await.unwrap());
        store.insert_property(property.clone()).await.unwrap();

        Self {
            store,
            market,
            mailer,
            seller,
            buyer,
            property,
        }
    }

    pub async fn add_buyer(&self, username: &str) -> User {
        let buyer = user(username, UserRole::Buyer);
        assert!(self.store.insert_user(buyer.clone()).await.unwrap());
        buyer
    }

    pub async fn add_property(&self, minimum_bid: f64) -> Property {
        let listing = property(self.seller.id, minimum_bid);
        self.store.insert_property(listing.clone()).await.unwrap();
        listing
    }
}
