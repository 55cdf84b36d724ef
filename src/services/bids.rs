use crate::error::{MarketError, Result};
use crate::models::{Bid, NotificationType, PropertyId, RelatedEntity, UserId, UserSummary};
use crate::services::notifications::NotificationService;
use crate::services::users::summarize;
use crate::store::MarketStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// A bid with the bidder resolved for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidView {
    #[serde(flatten)]
    pub bid: Bid,
    pub bidder_profile: Option<UserSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidBoard {
    /// Highest amount first; equal amounts keep the order they were placed in
    pub bids: Vec<BidView>,
    pub minimum_bid: f64,
    pub highest_bid: f64,
}

/// Highest amount in a ledger, 0 when nobody has bid yet
pub fn highest_bid(bids: &[Bid]) -> f64 {
    bids.iter().map(|b| b.amount).fold(0.0, f64::max)
}

/// Append-only bid ledger per property
#[derive(Clone)]
pub struct BidLedger {
    store: Arc<dyn MarketStore>,
    notifications: NotificationService,
}

impl BidLedger {
    pub fn new(store: Arc<dyn MarketStore>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Appends a bid and returns the property's whole ledger in placement order
    pub async fn place_bid(
        &self,
        property_id: PropertyId,
        bidder: UserId,
        amount: f64,
    ) -> Result<Vec<BidView>> {
        let property = self
            .store
            .get_property(property_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Property not found"))?;

        if property.is_owned_by(bidder) {
            return Err(MarketError::invalid("You cannot bid on your own property"));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(MarketError::validation("Please provide a valid bid amount"));
        }
        if amount < property.minimum_bid {
            return Err(MarketError::validation(format!(
                "Bid must be at least ${}",
                property.minimum_bid
            )));
        }

        let bid = Bid::new(property_id, bidder, amount);
        let ledger = self.store.append_bid(bid).await?;
        info!("💰 Bid of {amount} on {property_id} by {bidder} ({} total)", ledger.len());

        let bidder_name = summarize(self.store.as_ref(), bidder)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| "A buyer".to_string());
        self.notifications
            .notify(
                property.seller,
                NotificationType::Bid,
                "New Bid Received",
                format!("{bidder_name} placed a bid of ${amount} on \"{}\"", property.title),
                RelatedEntity::Property(property_id),
            )
            .await?;

        self.resolve(ledger).await
    }

    pub async fn get_bids(&self, property_id: PropertyId) -> Result<BidBoard> {
        let property = self
            .store
            .get_property(property_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Property not found"))?;

        let mut ledger = self.store.list_bids(property_id).await?;
        let highest = highest_bid(&ledger);
        // sort_by is stable, so ties stay in placement order
        ledger.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        Ok(BidBoard {
            bids: self.resolve(ledger).await?,
            minimum_bid: property.minimum_bid,
            highest_bid: highest,
        })
    }

    async fn resolve(&self, ledger: Vec<Bid>) -> Result<Vec<BidView>> {
        let mut views = Vec::with_capacity(ledger.len());
        for bid in ledger {
            let bidder_profile = summarize(self.store.as_ref(), bid.bidder).await?;
            views.push(BidView { bid, bidder_profile });
        }
        Ok(views)
    }
}
