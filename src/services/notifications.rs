use crate::error::{MarketError, Result};
use crate::models::{Notification, NotificationId, NotificationType, RelatedEntity, UserId};
use crate::store::MarketStore;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_LIST_LIMIT: usize = 20;

/// A page of a user's notifications plus their total unread count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// Records in-app notifications and lets recipients read or clear them
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn MarketStore>,
    list_max: usize,
}

impl NotificationService {
    pub fn new(store: Arc<dyn MarketStore>, list_max: usize) -> Self {
        Self {
            store,
            list_max: list_max.max(1),
        }
    }

    pub async fn notify(
        &self,
        user: UserId,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        related: RelatedEntity,
    ) -> Result<Notification> {
        let title = title.into();
        let message = message.into();
        if title.trim().is_empty() || message.trim().is_empty() {
            return Err(MarketError::validation("Notification title and message are required"));
        }

        let notification = Notification {
            id: NotificationId::new(),
            user,
            kind,
            title,
            message,
            related,
            is_read: false,
            created_at: Utc::now(),
        };

        self.store.insert_notification(notification.clone()).await?;
        debug!("Notified {} ({:?}): {}", user, kind, notification.title);
        Ok(notification)
    }

    /// Newest first. `limit` defaults to 20; zero means "as many as allowed".
    pub async fn list_for_user(
        &self,
        user: UserId,
        limit: Option<usize>,
        unread_only: bool,
    ) -> Result<NotificationList> {
        let limit = match limit {
            None => DEFAULT_LIST_LIMIT.min(self.list_max),
            Some(0) => self.list_max,
            Some(n) => n.min(self.list_max),
        };

        let notifications = self
            .store
            .notifications_for_user(user, unread_only, limit)
            .await?;
        let unread_count = self.store.count_unread(user).await?;

        Ok(NotificationList {
            notifications,
            unread_count,
        })
    }

    pub async fn mark_read(&self, id: NotificationId, requester: UserId) -> Result<Notification> {
        let mut notification = self.owned(id, requester).await?;
        if !notification.is_read {
            notification.is_read = true;
            self.store.update_notification(notification.clone()).await?;
        }
        Ok(notification)
    }

    /// Returns how many notifications were newly marked read
    pub async fn mark_all_read(&self, user: UserId) -> Result<usize> {
        let changed = self.store.mark_all_read(user).await?;
        info!("Marked {changed} notifications read for {user}");
        Ok(changed)
    }

    pub async fn delete(&self, id: NotificationId, requester: UserId) -> Result<()> {
        self.owned(id, requester).await?;
        self.store.delete_notification(id).await?;
        info!("Deleted notification {id}");
        Ok(())
    }

    pub async fn delete_all(&self, user: UserId) -> Result<usize> {
        let removed = self.store.delete_notifications_for_user(user).await?;
        info!("Deleted {removed} notifications for {user}");
        Ok(removed)
    }

    async fn owned(&self, id: NotificationId, requester: UserId) -> Result<Notification> {
        let notification = self
            .store
            .get_notification(id)
            .await?
            .ok_or_else(|| MarketError::not_found("Notification not found"))?;

        if notification.user != requester {
            return Err(MarketError::forbidden("Not authorized"));
        }
        Ok(notification)
    }
}
