use crate::error::{MarketError, Result};
use crate::models::{Property, PropertyId, PropertyStatus, PropertyType, UserId, UserRole};
use crate::services::users::required;
use crate::store::MarketStore;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Listing fields supplied by a seller. On update, absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, message = "Minimum bid cannot be negative"))]
    pub minimum_bid: Option<f64>,
    #[validate(range(min = 0.0, message = "Bedrooms cannot be negative"))]
    pub bedrooms: Option<f64>,
    #[validate(range(min = 0.0, message = "Bathrooms cannot be negative"))]
    pub bathrooms: Option<f64>,
    #[validate(range(min = 0.0, message = "Area cannot be negative"))]
    pub area: Option<f64>,
    pub property_type: Option<PropertyType>,
    pub amenities: Option<Vec<String>>,
    #[validate(length(min = 1, message = "At least one image is required"))]
    pub images: Option<Vec<String>>,
    pub status: Option<PropertyStatus>,
}

impl PropertyDraft {
    /// Trims text and drops blank list entries, then checks every supplied field
    fn checked(self) -> Result<Self> {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        let draft = Self {
            title: trim(self.title),
            description: trim(self.description),
            location: trim(self.location),
            address: trim(self.address),
            amenities: self.amenities.map(clean_list),
            images: self.images.map(clean_list),
            ..self
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Owns property records, their status and minimum bid
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn MarketStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, seller: UserId, draft: PropertyDraft) -> Result<Property> {
        let owner = self
            .store
            .get_user(seller)
            .await?
            .ok_or_else(|| MarketError::not_found("User not found"))?;
        if owner.role != UserRole::Seller {
            return Err(MarketError::forbidden("Only sellers can list properties"));
        }

        let draft = draft.checked()?;
        let now = Utc::now();
        let property = Property {
            id: PropertyId::new(),
            seller,
            title: required(draft.title, "Title is required")?,
            description: required(draft.description, "Description is required")?,
            location: required(draft.location, "Location is required")?,
            address: required(draft.address, "Address is required")?,
            price: required(draft.price, "Price is required")?,
            minimum_bid: draft.minimum_bid.unwrap_or(0.0),
            bedrooms: required(draft.bedrooms, "Bedrooms is required")?,
            bathrooms: required(draft.bathrooms, "Bathrooms is required")?,
            area: required(draft.area, "Area is required")?,
            property_type: required(draft.property_type, "Property type is required")?,
            amenities: draft.amenities.unwrap_or_default(),
            images: required(draft.images, "At least one image is required")?,
            status: draft.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_property(property.clone()).await?;
        info!("🏠 Listed {} \"{}\" for {}", property.id, property.title, property.price);
        Ok(property)
    }

    pub async fn get(&self, id: PropertyId) -> Result<Property> {
        self.store
            .get_property(id)
            .await?
            .ok_or_else(|| MarketError::not_found("Property not found"))
    }

    pub async fn list(&self) -> Result<Vec<Property>> {
        Ok(self.store.list_properties().await?)
    }

    pub async fn update(
        &self,
        id: PropertyId,
        seller: UserId,
        draft: PropertyDraft,
    ) -> Result<Property> {
        let mut property = self.get(id).await?;
        if !property.is_owned_by(seller) {
            return Err(MarketError::forbidden("Not authorized to update this property"));
        }

        let draft = draft.checked()?;
        let keep = |value: Option<String>, current: &mut String| {
            if let Some(v) = value {
                *current = v;
            }
        };
        keep(draft.title, &mut property.title);
        keep(draft.description, &mut property.description);
        keep(draft.location, &mut property.location);
        keep(draft.address, &mut property.address);

        if let Some(price) = draft.price {
            property.price = price;
        }
        if let Some(minimum_bid) = draft.minimum_bid {
            property.minimum_bid = minimum_bid;
        }
        if let Some(bedrooms) = draft.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = draft.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(area) = draft.area {
            property.area = area;
        }
        if let Some(property_type) = draft.property_type {
            property.property_type = property_type;
        }
        if let Some(amenities) = draft.amenities {
            property.amenities = amenities;
        }
        if let Some(images) = draft.images {
            property.images = images;
        }
        if let Some(status) = draft.status {
            property.status = status;
        }

        property.updated_at = Utc::now();
        self.store.update_property(property.clone()).await?;
        info!("Updated property {}", property.id);
        Ok(property)
    }

    /// Removes the listing only; its bids, appointments and reviews are left in place
    pub async fn delete(&self, id: PropertyId, seller: UserId) -> Result<()> {
        let property = self.get(id).await?;
        if !property.is_owned_by(seller) {
            return Err(MarketError::forbidden("Not authorized to delete this property"));
        }

        self.store.delete_property(id).await?;
        info!("Removed property {id}");
        Ok(())
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
