use crate::error::{MarketError, Result};
use crate::mailer::{AppointmentEmail, Mailer};
use crate::models::{
    Appointment, AppointmentId, AppointmentStatus, NotificationType, Property, PropertyId,
    PropertySummary, RelatedEntity, User, UserId, UserSummary,
};
use crate::services::bids::highest_bid;
use crate::services::notifications::NotificationService;
use crate::services::users::summarize;
use crate::store::{MarketStore, PartyRole};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// A booking request as submitted by a buyer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub property_id: Option<PropertyId>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<String>,
    pub bid_amount: Option<f64>,
    pub notes: Option<String>,
    pub buyer_phone: Option<String>,
}

/// An appointment with both parties and the property resolved for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub buyer_profile: Option<UserSummary>,
    pub seller_profile: Option<UserSummary>,
    pub property_summary: Option<PropertySummary>,
}

/// `bid_amount` is competitive when it is at least 90% of the current high bid.
/// Compared as `bid * 10 >= high * 9` so whole-number boundaries are exact.
pub fn is_competitive(bid_amount: f64, highest: f64) -> bool {
    highest <= 0.0 || bid_amount * 10.0 >= highest * 9.0
}

/// Books viewings against a property and walks them through their lifecycle
#[derive(Clone)]
pub struct AppointmentScheduler {
    store: Arc<dyn MarketStore>,
    notifications: NotificationService,
    mailer: Arc<dyn Mailer>,
}

impl AppointmentScheduler {
    pub fn new(
        store: Arc<dyn MarketStore>,
        notifications: NotificationService,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            store,
            notifications,
            mailer,
        }
    }

    pub async fn create(
        &self,
        buyer_id: UserId,
        request: AppointmentRequest,
    ) -> Result<AppointmentView> {
        let (Some(property_id), Some(date), Some(time)) = (
            request.property_id,
            request.appointment_date,
            request
                .appointment_time
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        ) else {
            return Err(MarketError::validation("Please provide all required fields"));
        };

        let bid_amount = match request.bid_amount {
            Some(amount) if amount.is_finite() && amount > 0.0 => amount,
            _ => return Err(MarketError::validation("Please provide a valid bid amount")),
        };

        let property = self
            .store
            .get_property(property_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Property not found"))?;

        if property.is_owned_by(buyer_id) {
            return Err(MarketError::invalid(
                "You cannot book an appointment for your own property",
            ));
        }

        if bid_amount < property.minimum_bid {
            return Err(MarketError::validation(format!(
                "Bid must be at least ${}",
                property.minimum_bid
            )));
        }

        let highest = highest_bid(&self.store.list_bids(property_id).await?);
        if !is_competitive(bid_amount, highest) {
            return Err(MarketError::validation(format!(
                "Your bid should be competitive. Current highest bid is ${highest}"
            )));
        }

        let buyer = self
            .store
            .get_user(buyer_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Buyer not found"))?;

        let now = Utc::now();
        let appointment = Appointment {
            id: AppointmentId::new(),
            property: property_id,
            buyer: buyer_id,
            seller: property.seller,
            appointment_date: date,
            appointment_time: time,
            bid_amount,
            status: AppointmentStatus::Pending,
            notes: request.notes.unwrap_or_default().trim().to_string(),
            buyer_phone: request
                .buyer_phone
                .or_else(|| buyer.phone_number.clone())
                .unwrap_or_default(),
            buyer_email: buyer.email.clone(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_appointment(appointment.clone()).await?;
        info!(
            "📅 Appointment {} booked on {} by {} for {} {}",
            appointment.id,
            property_id,
            buyer_id,
            appointment.appointment_date,
            appointment.appointment_time
        );

        self.notifications
            .notify(
                property.seller,
                NotificationType::Appointment,
                "New Appointment Request",
                format!(
                    "{} has requested to view your property \"{}\"",
                    buyer.username, property.title
                ),
                RelatedEntity::Appointment(appointment.id),
            )
            .await?;

        let seller = self.store.get_user(property.seller).await?;
        self.send_booking_mail(&appointment, &property, &buyer, seller.as_ref())
            .await;

        self.view(appointment).await
    }

    /// Appointments where `user` is buyer, seller or either; latest date first
    pub async fn list(&self, user: UserId, role: PartyRole) -> Result<Vec<AppointmentView>> {
        let mut appointments = self.store.appointments_for_user(user, role).await?;
        appointments.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
        self.views(appointments).await
    }

    pub async fn get(&self, id: AppointmentId, viewer: UserId) -> Result<AppointmentView> {
        let appointment = self.find(id).await?;
        if !appointment.is_party(viewer) {
            return Err(MarketError::forbidden("Not authorized to view this appointment"));
        }
        self.view(appointment).await
    }

    /// Pending and confirmed bookings on a property, soonest first
    pub async fn list_active_for_property(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<AppointmentView>> {
        if self.store.get_property(property_id).await?.is_none() {
            return Err(MarketError::not_found("Property not found"));
        }

        let mut active: Vec<Appointment> = self
            .store
            .appointments_for_property(property_id)
            .await?
            .into_iter()
            .filter(|a| a.status.is_active())
            .collect();
        active.sort_by(|a, b| {
            a.appointment_date
                .cmp(&b.appointment_date)
                .then_with(|| a.appointment_time.cmp(&b.appointment_time))
        });
        self.views(active).await
    }

    /// Seller-driven status change. `Cancelled` is handled as a cancellation by the seller.
    pub async fn update_status(
        &self,
        id: AppointmentId,
        actor: UserId,
        status: AppointmentStatus,
    ) -> Result<AppointmentView> {
        let appointment = self.find(id).await?;
        if appointment.seller != actor {
            return Err(MarketError::forbidden(
                "Only the property seller can update appointment status",
            ));
        }

        if status == AppointmentStatus::Cancelled {
            let cancelled = self.cancel_checked(appointment, actor).await?;
            return self.view(cancelled).await;
        }

        let updated = self.transition(appointment, status).await?;
        self.notifications
            .notify(
                updated.buyer,
                NotificationType::Appointment,
                "Appointment Status Updated",
                format!("Your appointment has been {status}"),
                RelatedEntity::Appointment(updated.id),
            )
            .await?;

        self.view(updated).await
    }

    /// Either party may cancel a pending or confirmed appointment
    pub async fn cancel(&self, id: AppointmentId, actor: UserId) -> Result<Appointment> {
        let appointment = self.find(id).await?;
        if !appointment.is_party(actor) {
            return Err(MarketError::forbidden("Not authorized to cancel this appointment"));
        }
        self.cancel_checked(appointment, actor).await
    }

    async fn cancel_checked(&self, appointment: Appointment, actor: UserId) -> Result<Appointment> {
        let cancelled = self.transition(appointment, AppointmentStatus::Cancelled).await?;

        let actor_name = summarize(self.store.as_ref(), actor)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| "the other party".to_string());
        self.notifications
            .notify(
                cancelled.counterparty_of(actor),
                NotificationType::Appointment,
                "Appointment Cancelled",
                format!("An appointment has been cancelled by {actor_name}"),
                RelatedEntity::Appointment(cancelled.id),
            )
            .await?;

        Ok(cancelled)
    }

    async fn transition(
        &self,
        mut appointment: Appointment,
        next: AppointmentStatus,
    ) -> Result<Appointment> {
        if !appointment.status.can_transition_to(next) {
            return Err(MarketError::invalid(format!(
                "Cannot change an appointment from {} to {}",
                appointment.status, next
            )));
        }

        let previous = appointment.status;
        appointment.status = next;
        appointment.updated_at = Utc::now();
        self.store.update_appointment(appointment.clone()).await?;
        info!("Appointment {} moved {} -> {}", appointment.id, previous, next);
        Ok(appointment)
    }

    async fn find(&self, id: AppointmentId) -> Result<Appointment> {
        self.store
            .get_appointment(id)
            .await?
            .ok_or_else(|| MarketError::not_found("Appointment not found"))
    }

    /// Mail is best effort: failures are logged and never undo the booking
    async fn send_booking_mail(
        &self,
        appointment: &Appointment,
        property: &Property,
        buyer: &User,
        seller: Option<&User>,
    ) {
        let Some(seller) = seller else {
            warn!(
                "Seller {} missing, skipping booking mail for {}",
                property.seller, appointment.id
            );
            return;
        };

        let email = AppointmentEmail {
            buyer_name: buyer.username.clone(),
            buyer_email: appointment.buyer_email.clone(),
            seller_name: seller.username.clone(),
            seller_email: seller.email.clone(),
            property_title: property.title.clone(),
            property_address: property.address.clone(),
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time.clone(),
            bid_amount: appointment.bid_amount,
        };

        if let Err(e) = self.mailer.send_buyer_confirmation(&email).await {
            warn!("Email sending failed ({}): {e:#}", self.mailer.transport_name());
            return;
        }
        if let Err(e) = self.mailer.send_seller_alert(&email).await {
            warn!("Email sending failed ({}): {e:#}", self.mailer.transport_name());
        }
    }

    async fn view(&self, appointment: Appointment) -> Result<AppointmentView> {
        let store = self.store.as_ref();
        Ok(AppointmentView {
            buyer_profile: summarize(store, appointment.buyer).await?,
            seller_profile: summarize(store, appointment.seller).await?,
            property_summary: store
                .get_property(appointment.property)
                .await?
                .as_ref()
                .map(PropertySummary::from),
            appointment,
        })
    }

    async fn views(&self, appointments: Vec<Appointment>) -> Result<Vec<AppointmentView>> {
        let mut views = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            views.push(self.view(appointment).await?);
        }
        Ok(views)
    }
}
