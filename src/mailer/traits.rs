use crate::mailer::types::AppointmentEmail;
use anyhow::Result;
use async_trait::async_trait;

/// Outbound mail for appointment bookings
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Confirmation sent to the buyer who booked the viewing
    async fn send_buyer_confirmation(&self, email: &AppointmentEmail) -> Result<()>;

    /// Alert sent to the seller whose property was booked
    async fn send_seller_alert(&self, email: &AppointmentEmail) -> Result<()>;

    /// Name of the transport, for logs
    fn transport_name(&self) -> &'static str;
}
