use crate::models::{
    Appointment, AppointmentId, Bid, Notification, NotificationId, Property, PropertyId, Review,
    User, UserId,
};
use anyhow::Result;
use async_trait::async_trait;

/// Which side of an appointment a listing is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    Buyer,
    Seller,
    Either,
}

/// Persistence for everything the marketplace core reads and writes.
///
/// Bids live in their own collection keyed by property rather than inside the
/// property record. Implementations must keep `insert_review` atomic with
/// respect to the (buyer, property) uniqueness rule, and `insert_user` atomic
/// with respect to unique usernames and emails. A write that returns an error
/// leaves nothing behind.
#[async_trait]
pub trait MarketStore: Send + Sync {
    // Users
    /// Returns `false` without storing anything when the username or email is taken
    async fn insert_user(&self, user: User) -> Result<bool>;
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;
    async fn update_user(&self, user: User) -> Result<()>;

    // Properties
    async fn insert_property(&self, property: Property) -> Result<()>;
    async fn get_property(&self, id: PropertyId) -> Result<Option<Property>>;
    async fn list_properties(&self) -> Result<Vec<Property>>;
    async fn update_property(&self, property: Property) -> Result<()>;
    /// Removes the listing and nothing else; bids, appointments and reviews stay
    async fn delete_property(&self, id: PropertyId) -> Result<bool>;

    // Bid ledger
    /// Appends and returns the property's full ledger in insertion order
    async fn append_bid(&self, bid: Bid) -> Result<Vec<Bid>>;
    async fn list_bids(&self, property: PropertyId) -> Result<Vec<Bid>>;

    // Appointments
    async fn insert_appointment(&self, appointment: Appointment) -> Result<()>;
    async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>>;
    async fn update_appointment(&self, appointment: Appointment) -> Result<()>;
    async fn appointments_for_user(
        &self,
        user: UserId,
        role: PartyRole,
    ) -> Result<Vec<Appointment>>;
    async fn appointments_for_property(&self, property: PropertyId) -> Result<Vec<Appointment>>;

    // Reviews
    /// Returns `false` without storing anything when the buyer already reviewed the property
    async fn insert_review(&self, review: Review) -> Result<bool>;
    async fn reviews_for_seller(&self, seller: UserId) -> Result<Vec<Review>>;
    async fn reviews_for_property(&self, property: PropertyId) -> Result<Vec<Review>>;

    // Notifications
    async fn insert_notification(&self, notification: Notification) -> Result<()>;
    async fn get_notification(&self, id: NotificationId) -> Result<Option<Notification>>;
    async fn update_notification(&self, notification: Notification) -> Result<()>;
    /// Newest first, at most `limit`
    async fn notifications_for_user(
        &self,
        user: UserId,
        unread_only: bool,
        limit: usize,
    ) -> Result<Vec<Notification>>;
    async fn count_unread(&self, user: UserId) -> Result<usize>;
    /// Returns how many notifications flipped from unread to read
    async fn mark_all_read(&self, user: UserId) -> Result<usize>;
    async fn delete_notification(&self, id: NotificationId) -> Result<bool>;
    async fn delete_notifications_for_user(&self, user: UserId) -> Result<usize>;
}
