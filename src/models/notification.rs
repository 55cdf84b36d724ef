use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AppointmentId, NotificationId, PropertyId, ReviewId, UserId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Appointment,
    Bid,
    Review,
}

/// The entity that triggered a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "model", content = "id")]
pub enum RelatedEntity {
    Appointment(AppointmentId),
    Property(PropertyId),
    Review(ReviewId),
}

/// In-app message addressed to a single user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub related: RelatedEntity,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
