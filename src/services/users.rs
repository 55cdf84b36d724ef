use crate::error::{MarketError, Result};
use crate::models::{User, UserId, UserRole, UserSummary, DEFAULT_PROFILE_PICTURE};
use crate::store::MarketStore;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: Option<String>,
    #[validate(email(message = "Please fill a valid email address"))]
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

/// Identity records. Ratings on these are maintained by the review aggregator.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn MarketStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    pub async fn register(&self, request: NewUser) -> Result<User> {
        let request = NewUser {
            username: request.username.map(|u| u.trim().to_string()),
            email: request.email.map(|e| e.trim().to_lowercase()),
            ..request
        };
        request.validate()?;

        let username = required(request.username, "Username is required")?;
        let email = required(request.email, "Email is required")?;
        let role = required(request.role, "Role must be buyer or seller")?;

        let user = User {
            id: UserId::new(),
            username,
            email,
            role,
            phone_number: request
                .phone_number
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            profile_picture: request
                .profile_picture
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.to_string()),
            average_rating: 0.0,
            total_sales: 0,
            created_at: Utc::now(),
        };

        if !self.store.insert_user(user.clone()).await? {
            return Err(MarketError::invalid("User already exists"));
        }
        info!("Registered {:?} {} ({})", user.role, user.username, user.id);
        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Result<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| MarketError::not_found("User not found"))
    }
}

/// Display projection of a user, `None` when the reference dangles
pub(crate) async fn summarize(store: &dyn MarketStore, id: UserId) -> Result<Option<UserSummary>> {
    Ok(store.get_user(id).await?.as_ref().map(UserSummary::from))
}

pub(crate) fn required<T>(value: Option<T>, message: &str) -> Result<T> {
    value.ok_or_else(|| MarketError::validation(message))
}
