pub mod appointments;
pub mod bids;
pub mod catalog;
pub mod notifications;
pub mod reviews;
pub mod users;

pub use appointments::AppointmentScheduler;
pub use bids::BidLedger;
pub use catalog::CatalogService;
pub use notifications::NotificationService;
pub use reviews::ReviewAggregator;
pub use users::UserService;

use crate::config::Config;
use crate::mailer::Mailer;
use crate::store::MarketStore;
use std::sync::Arc;

/// The marketplace core, wired to one store and one mail transport
pub struct Marketplace {
    pub users: UserService,
    pub catalog: CatalogService,
    pub bids: BidLedger,
    pub appointments: AppointmentScheduler,
    pub reviews: ReviewAggregator,
    pub notifications: NotificationService,
}

impl Marketplace {
    pub fn new(store: Arc<dyn MarketStore>, mailer: Arc<dyn Mailer>, config: &Config) -> Self {
        let notifications = NotificationService::new(store.clone(), config.notification_list_max);

        Self {
            users: UserService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            bids: BidLedger::new(store.clone(), notifications.clone()),
            appointments: AppointmentScheduler::new(store.clone(), notifications.clone(), mailer),
            reviews: ReviewAggregator::new(store, notifications.clone(), config.rating_consistency),
            notifications,
        }
    }
}
