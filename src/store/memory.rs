use crate::models::{
    Appointment, AppointmentId, Bid, Notification, NotificationId, Property, PropertyId, Review,
    User, UserId,
};
use crate::store::traits::{MarketStore, PartyRole};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// On-disk shape of the store
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    users: Vec<User>,
    properties: Vec<Property>,
    bids: Vec<Bid>,
    appointments: Vec<Appointment>,
    reviews: Vec<Review>,
    notifications: Vec<Notification>,
}

#[derive(Debug, Default, Clone)]
struct Collections {
    users: HashMap<UserId, User>,
    properties: HashMap<PropertyId, Property>,
    bids: HashMap<PropertyId, Vec<Bid>>,
    appointments: Vec<Appointment>,
    reviews: Vec<Review>,
    notifications: Vec<Notification>,
}

impl Collections {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut bids: HashMap<PropertyId, Vec<Bid>> = HashMap::new();
        for bid in snapshot.bids {
            bids.entry(bid.property).or_default().push(bid);
        }

        Self {
            users: snapshot.users.into_iter().map(|u| (u.id, u)).collect(),
            properties: snapshot.properties.into_iter().map(|p| (p.id, p)).collect(),
            bids,
            appointments: snapshot.appointments,
            reviews: snapshot.reviews,
            notifications: snapshot.notifications,
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        let mut properties: Vec<Property> = self.properties.values().cloned().collect();
        properties.sort_by_key(|p| p.created_at);
        let mut bids: Vec<Bid> = self.bids.values().flatten().cloned().collect();
        bids.sort_by_key(|b| b.created_at);

        Snapshot {
            users,
            properties,
            bids,
            appointments: self.appointments.clone(),
            reviews: self.reviews.clone(),
            notifications: self.notifications.clone(),
        }
    }
}

/// In-process store, optionally mirrored to a JSON file after every write
pub struct MemoryStore {
    data: RwLock<Collections>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Collections::default()),
            snapshot_path: None,
        }
    }

    /// Open a store backed by `path`, loading it if the file already exists
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Failed to parse store snapshot {}", path.display()))?;
                info!(
                    "💾 Loaded {} users, {} properties, {} appointments from {}",
                    snapshot.users.len(),
                    snapshot.properties.len(),
                    snapshot.appointments.len(),
                    path.display()
                );
                Collections::from_snapshot(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No snapshot at {}, starting empty", path.display());
                Collections::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        Ok(Self {
            data: RwLock::new(collections),
            snapshot_path: Some(path),
        })
    }

    /// Applies `change` under the write lock. A file-backed store applies it to a
    /// copy and keeps the copy only once the snapshot is on disk.
    async fn commit<T, F>(&self, change: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut Collections) -> Result<T> + Send,
    {
        let mut data = self.data.write().await;
        if self.snapshot_path.is_none() {
            return change(&mut *data);
        }

        let mut candidate = data.clone();
        let outcome = change(&mut candidate)?;
        self.persist(&candidate).await?;
        *data = candidate;
        Ok(outcome)
    }

    async fn persist(&self, data: &Collections) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(&data.to_snapshot())?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        debug!("Snapshot written to {}", path.display());
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<bool> {
        self.commit(move |data| {
            if data.users.contains_key(&user.id) {
                bail!("user {} already exists", user.id);
            }
            let taken = data
                .users
                .values()
                .any(|u| u.username == user.username || u.email == user.email);
            if taken {
                return Ok(false);
            }
            data.users.insert(user.id, user);
            Ok(true)
        })
        .await
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.data.read().await.users.get(&id).cloned())
    }

    async fn update_user(&self, user: User) -> Result<()> {
        self.commit(move |data| match data.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user;
                Ok(())
            }
            None => bail!("user {} does not exist", user.id),
        })
        .await
    }

    async fn insert_property(&self, property: Property) -> Result<()> {
        self.commit(move |data| {
            if data.properties.contains_key(&property.id) {
                bail!("property {} already exists", property.id);
            }
            data.properties.insert(property.id, property);
            Ok(())
        })
        .await
    }

    async fn get_property(&self, id: PropertyId) -> Result<Option<Property>> {
        Ok(self.data.read().await.properties.get(&id).cloned())
    }

    async fn list_properties(&self) -> Result<Vec<Property>> {
        let data = self.data.read().await;
        let mut properties: Vec<Property> = data.properties.values().cloned().collect();
        properties.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(properties)
    }

    async fn update_property(&self, property: Property) -> Result<()> {
        self.commit(move |data| match data.properties.get_mut(&property.id) {
            Some(existing) => {
                *existing = property;
                Ok(())
            }
            None => bail!("property {} does not exist", property.id),
        })
        .await
    }

    async fn delete_property(&self, id: PropertyId) -> Result<bool> {
        self.commit(move |data| Ok(data.properties.remove(&id).is_some()))
            .await
    }

    async fn append_bid(&self, bid: Bid) -> Result<Vec<Bid>> {
        self.commit(move |data| {
            if !data.properties.contains_key(&bid.property) {
                bail!("property {} does not exist", bid.property);
            }
            let ledger = data.bids.entry(bid.property).or_default();
            ledger.push(bid);
            Ok(ledger.clone())
        })
        .await
    }

    async fn list_bids(&self, property: PropertyId) -> Result<Vec<Bid>> {
        let data = self.data.read().await;
        Ok(data.bids.get(&property).cloned().unwrap_or_default())
    }

    async fn insert_appointment(&self, appointment: Appointment) -> Result<()> {
        self.commit(move |data| {
            data.appointments.push(appointment);
            Ok(())
        })
        .await
    }

    async fn get_appointment(&self, id: AppointmentId) -> Result<Option<Appointment>> {
        let data = self.data.read().await;
        Ok(data.appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn update_appointment(&self, appointment: Appointment) -> Result<()> {
        self.commit(move |data| {
            match data.appointments.iter_mut().find(|a| a.id == appointment.id) {
                Some(existing) => *existing = appointment,
                None => bail!("appointment {} does not exist", appointment.id),
            }
            Ok(())
        })
        .await
    }

    async fn appointments_for_user(
        &self,
        user: UserId,
        role: PartyRole,
    ) -> Result<Vec<Appointment>> {
        let data = self.data.read().await;
        Ok(data
            .appointments
            .iter()
            .filter(|a| match role {
                PartyRole::Buyer => a.buyer == user,
                PartyRole::Seller => a.seller == user,
                PartyRole::Either => a.is_party(user),
            })
            .cloned()
            .collect())
    }

    async fn appointments_for_property(&self, property: PropertyId) -> Result<Vec<Appointment>> {
        let data = self.data.read().await;
        Ok(data
            .appointments
            .iter()
            .filter(|a| a.property == property)
            .cloned()
            .collect())
    }

    async fn insert_review(&self, review: Review) -> Result<bool> {
        self.commit(move |data| {
            let duplicate = data
                .reviews
                .iter()
                .any(|r| r.buyer == review.buyer && r.property == review.property);
            if duplicate {
                return Ok(false);
            }
            data.reviews.push(review);
            Ok(true)
        })
        .await
    }

    async fn reviews_for_seller(&self, seller: UserId) -> Result<Vec<Review>> {
        let data = self.data.read().await;
        Ok(data.reviews.iter().filter(|r| r.seller == seller).cloned().collect())
    }

    async fn reviews_for_property(&self, property: PropertyId) -> Result<Vec<Review>> {
        let data = self.data.read().await;
        Ok(data.reviews.iter().filter(|r| r.property == property).cloned().collect())
    }

    async fn insert_notification(&self, notification: Notification) -> Result<()> {
        self.commit(move |data| {
            data.notifications.push(notification);
            Ok(())
        })
        .await
    }

    async fn get_notification(&self, id: NotificationId) -> Result<Option<Notification>> {
        let data = self.data.read().await;
        Ok(data.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn update_notification(&self, notification: Notification) -> Result<()> {
        self.commit(move |data| {
            match data.notifications.iter_mut().find(|n| n.id == notification.id) {
                Some(existing) => *existing = notification,
                None => bail!("notification {} does not exist", notification.id),
            }
            Ok(())
        })
        .await
    }

    async fn notifications_for_user(
        &self,
        user: UserId,
        unread_only: bool,
        limit: usize,
    ) -> Result<Vec<Notification>> {
        let data = self.data.read().await;
        // Walk newest-inserted first so equal timestamps keep the latest on top
        let mut matching: Vec<Notification> = data
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user == user && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn count_unread(&self, user: UserId) -> Result<usize> {
        let data = self.data.read().await;
        Ok(data
            .notifications
            .iter()
            .filter(|n| n.user == user && !n.is_read)
            .count())
    }

    async fn mark_all_read(&self, user: UserId) -> Result<usize> {
        self.commit(move |data| {
            let mut changed = 0;
            for notification in data.notifications.iter_mut() {
                if notification.user == user && !notification.is_read {
                    notification.is_read = true;
                    changed += 1;
                }
            }
            Ok(changed)
        })
        .await
    }

    async fn delete_notification(&self, id: NotificationId) -> Result<bool> {
        self.commit(move |data| {
            let before = data.notifications.len();
            data.notifications.retain(|n| n.id != id);
            Ok(data.notifications.len() != before)
        })
        .await
    }

    async fn delete_notifications_for_user(&self, user: UserId) -> Result<usize> {
        self.commit(move |data| {
            let before = data.notifications.len();
            data.notifications.retain(|n| n.user != user);
            Ok(before - data.notifications.len())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NotificationType, RelatedEntity};
    use crate::testing;
    use chrono::{Duration, Utc};

    fn notification(user: UserId, is_read: bool, minutes_ago: i64) -> Notification {
        Notification {
            id: NotificationId::new(),
            user,
            kind: NotificationType::Appointment,
            title: "title".to_string(),
            message: "message".to_string(),
            related: RelatedEntity::Appointment(AppointmentId::new()),
            is_read,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn bid_ledger_keeps_insertion_order_per_property() {
        let store = MemoryStore::new();
        let seller = testing::user("seller", crate::models::UserRole::Seller);
        let property = testing::property(seller.id, 100.0);
        let other = testing::property(seller.id, 100.0);
        store.insert_property(property.clone()).await.unwrap();
        store.insert_property(other.clone()).await.unwrap();

        let bidder = UserId::new();
        store.append_bid(Bid::new(property.id, bidder, 150.0)).await.unwrap();
        store.append_bid(Bid::new(other.id, bidder, 900.0)).await.unwrap();
        let ledger = store.append_bid(Bid::new(property.id, bidder, 120.0)).await.unwrap();

        let amounts: Vec<f64> = ledger.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![150.0, 120.0]);
        assert_eq!(store.list_bids(other.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bid_on_missing_property_is_rejected() {
        let store = MemoryStore::new();
        let result = store.append_bid(Bid::new(PropertyId::new(), UserId::new(), 1.0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn duplicate_review_is_not_stored() {
        let store = MemoryStore::new();
        let review = testing::review(UserId::new(), UserId::new(), PropertyId::new(), 4);
        let again = Review {
            id: crate::models::ReviewId::new(),
            rating: 1,
            ..review.clone()
        };

        assert!(store.insert_review(review.clone()).await.unwrap());
        assert!(!store.insert_review(again).await.unwrap());
        assert_eq!(store.reviews_for_seller(review.seller).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn notifications_are_listed_newest_first_and_capped() {
        let store = MemoryStore::new();
        let user = UserId::new();
        for minutes_ago in [30, 10, 20] {
            store
                .insert_notification(notification(user, false, minutes_ago))
                .await
                .unwrap();
        }
        store.insert_notification(notification(UserId::new(), false, 0)).await.unwrap();

        let listed = store.notifications_for_user(user, false, 2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at > listed[1].created_at);
        assert_eq!(store.count_unread(user).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn delete_property_leaves_ledger_and_reviews() {
        let store = MemoryStore::new();
        let seller = testing::user("seller", crate::models::UserRole::Seller);
        let property = testing::property(seller.id, 0.0);
        store.insert_property(property.clone()).await.unwrap();
        store.append_bid(Bid::new(property.id, UserId::new(), 10.0)).await.unwrap();

        assert!(store.delete_property(property.id).await.unwrap());
        assert!(!store.delete_property(property.id).await.unwrap());
        assert_eq!(store.list_bids(property.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn registration_rejects_taken_username_or_email() {
        let store = MemoryStore::new();
        let jane = testing::user("jane", crate::models::UserRole::Buyer);
        assert!(store.insert_user(jane.clone()).await.unwrap());

        let same_name = User {
            id: UserId::new(),
            email: "other@example.com".to_string(),
            ..jane.clone()
        };
        let same_email = User {
            id: UserId::new(),
            username: "janet".to_string(),
            ..jane.clone()
        };
        assert!(!store.insert_user(same_name.clone()).await.unwrap());
        assert!(!store.insert_user(same_email).await.unwrap());
        assert_eq!(store.get_user(same_name.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_snapshot_write_keeps_nothing() {
        let dir = std::env::temp_dir().join(format!("urban-vault-missing-{}", UserId::new()));
        let store = MemoryStore::open(dir.join("store.json")).await.unwrap();
        let seller = testing::user("seller", crate::models::UserRole::Seller);
        let review = testing::review(seller.id, UserId::new(), PropertyId::new(), 5);

        assert!(store.insert_user(seller.clone()).await.is_err());
        assert!(store.insert_review(review.clone()).await.is_err());
        assert_eq!(store.get_user(seller.id).await.unwrap(), None);
        assert!(store.reviews_for_seller(seller.id).await.unwrap().is_empty());

        // Once the directory exists the same review goes through instead of
        // being reported as a duplicate
        std::fs::create_dir_all(&dir).unwrap();
        assert!(store.insert_review(review.clone()).await.unwrap());
        assert_eq!(store.reviews_for_seller(seller.id).await.unwrap(), vec![review]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let path = std::env::temp_dir().join(format!("urban-vault-{}.json", UserId::new()));
        let seller = testing::user("seller", crate::models::UserRole::Seller);
        let property = testing::property(seller.id, 0.0);

        {
            let store = MemoryStore::open(&path).await.unwrap();
            store.insert_user(seller.clone()).await.unwrap();
            store.insert_property(property.clone()).await.unwrap();
            store.append_bid(Bid::new(property.id, UserId::new(), 42.0)).await.unwrap();
        }

        let reopened = MemoryStore::open(&path).await.unwrap();
        assert_eq!(reopened.get_user(seller.id).await.unwrap(), Some(seller));
        assert_eq!(reopened.get_property(property.id).await.unwrap(), Some(property.clone()));
        assert_eq!(reopened.list_bids(property.id).await.unwrap()[0].amount, 42.0);

        let _ = std::fs::remove_file(&path);
    }
}
