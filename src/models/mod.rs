mod appointment;
mod notification;
mod property;
mod review;
mod user;

pub use appointment::{Appointment, AppointmentStatus};
pub use notification::{Notification, NotificationType, RelatedEntity};
pub use property::{Bid, Property, PropertyStatus, PropertyType};
pub use review::{Review, ReviewType};
pub use user::{User, UserRole, UserSummary, DEFAULT_PROFILE_PICTURE};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! typed_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(Uuid);

            impl $name {
                pub fn new() -> Self {
                    Self(Uuid::new_v4())
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    self.0.fmt(f)
                }
            }

            impl FromStr for $name {
                type Err = uuid::Error;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Uuid::parse_str(s).map(Self)
                }
            }
        )*
    };
}

typed_id!(
    /// Identity of a registered user (buyer or seller)
    UserId,
    /// Identity of a property listing
    PropertyId,
    /// Identity of a single bid in a property's ledger
    BidId,
    /// Identity of a viewing appointment
    AppointmentId,
    /// Identity of a review
    ReviewId,
    /// Identity of an in-app notification
    NotificationId,
);

/// Compact listing data shown next to appointments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: PropertyId,
    pub title: String,
    pub address: String,
    pub images: Vec<String>,
    pub price: f64,
    pub property_type: PropertyType,
}

impl From<&Property> for PropertySummary {
    fn from(property: &Property) -> Self {
        Self {
            id: property.id,
            title: property.title.clone(),
            address: property.address.clone(),
            images: property.images.clone(),
            price: property.price,
            property_type: property.property_type,
        }
    }
}

/// Mean of integer ratings rounded half up to one decimal, 0 when empty.
///
/// Works on the integer sum so that 4.25 always becomes 4.3 and 4.35 becomes 4.4.
pub fn average_rating(ratings: impl IntoIterator<Item = u8>) -> f64 {
    let (sum, count) = ratings
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r), count + 1));

    if count == 0 {
        return 0.0;
    }

    let tenths = (sum * 20 + count) / (2 * count);
    tenths as f64 / 10.0
}
