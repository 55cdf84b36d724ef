use crate::config::RatingConsistency;
use crate::error::{MarketError, Result};
use crate::models::{
    average_rating, NotificationType, PropertyId, RelatedEntity, Review, ReviewId, ReviewType,
    UserId, UserSummary,
};
use crate::services::notifications::NotificationService;
use crate::services::users::summarize;
use crate::store::MarketStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub seller_id: Option<UserId>,
    pub property_id: Option<PropertyId>,
    pub rating: Option<f64>,
    pub comment: Option<String>,
    pub review_type: Option<ReviewType>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub buyer_profile: Option<UserSummary>,
}

/// Reviews of one property with an average computed on read
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyReviews {
    pub reviews: Vec<ReviewView>,
    pub average_rating: f64,
    pub total_reviews: usize,
}

/// Stores reviews and keeps each seller's cached rating in step with them
pub struct ReviewAggregator {
    store: Arc<dyn MarketStore>,
    notifications: NotificationService,
    consistency: RatingConsistency,
    write_lock: Mutex<()>,
}

impl ReviewAggregator {
    pub fn new(
        store: Arc<dyn MarketStore>,
        notifications: NotificationService,
        consistency: RatingConsistency,
    ) -> Self {
        Self {
            store,
            notifications,
            consistency,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn create(&self, buyer: UserId, request: ReviewRequest) -> Result<ReviewView> {
        let (Some(seller_id), Some(property_id), Some(rating)) =
            (request.seller_id, request.property_id, request.rating)
        else {
            return Err(MarketError::validation("Seller, property and rating are required"));
        };
        if rating.fract() != 0.0 || !(1.0..=5.0).contains(&rating) {
            return Err(MarketError::validation("Rating must be a whole number from 1 to 5"));
        }
        if seller_id == buyer {
            return Err(MarketError::invalid("You cannot review yourself"));
        }

        let property = self
            .store
            .get_property(property_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Property not found"))?;
        if self.store.get_user(seller_id).await?.is_none() {
            return Err(MarketError::not_found("Seller not found"));
        }
        if property.seller != seller_id {
            return Err(MarketError::invalid("This property is not listed by that seller"));
        }

        let review = Review {
            id: ReviewId::new(),
            seller: seller_id,
            buyer,
            property: property_id,
            rating: rating as u8,
            comment: request
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            review_type: request.review_type.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let _guard = match self.consistency {
            RatingConsistency::Serialized => Some(self.write_lock.lock().await),
            RatingConsistency::Relaxed => None,
        };

        if !self.store.insert_review(review.clone()).await? {
            return Err(MarketError::invalid("You have already reviewed this property"));
        }
        let (average, count) = self.recompute_seller(seller_id).await?;
        info!(
            "⭐ Review {} ({}/5) for seller {}: now {average} over {count}",
            review.id, review.rating, seller_id
        );

        self.notifications
            .notify(
                seller_id,
                NotificationType::Review,
                "New Review",
                format!("You received a {}-star review for \"{}\"", review.rating, property.title),
                RelatedEntity::Review(review.id),
            )
            .await?;

        self.view(review).await
    }

    /// Newest first
    pub async fn list_for_seller(&self, seller: UserId) -> Result<Vec<ReviewView>> {
        let mut reviews = self.store.reviews_for_seller(seller).await?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.views(reviews).await
    }

    pub async fn list_for_property(&self, property: PropertyId) -> Result<PropertyReviews> {
        let mut reviews = self.store.reviews_for_property(property).await?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let average = average_rating(reviews.iter().map(|r| r.rating));
        let total_reviews = reviews.len();
        Ok(PropertyReviews {
            reviews: self.views(reviews).await?,
            average_rating: average,
            total_reviews,
        })
    }

    /// Re-reads every review of the seller and caches the mean and count on their record
    async fn recompute_seller(&self, seller_id: UserId) -> Result<(f64, u64)> {
        let reviews = self.store.reviews_for_seller(seller_id).await?;
        let average = average_rating(reviews.iter().map(|r| r.rating));
        let count = reviews.len() as u64;

        let mut seller = self
            .store
            .get_user(seller_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Seller not found"))?;
        seller.average_rating = average;
        seller.total_sales = count;
        self.store.update_user(seller).await?;

        Ok((average, count))
    }

    async fn view(&self, review: Review) -> Result<ReviewView> {
        Ok(ReviewView {
            buyer_profile: summarize(self.store.as_ref(), review.buyer).await?,
            review,
        })
    }

    async fn views(&self, reviews: Vec<Review>) -> Result<Vec<ReviewView>> {
        let mut views = Vec::with_capacity(reviews.len());
        for review in reviews {
            views.push(self.view(review).await?);
        }
        Ok(views)
    }
}
