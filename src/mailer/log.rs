use crate::mailer::templates;
use crate::mailer::traits::Mailer;
use crate::mailer::types::AppointmentEmail;
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Writes booking mail to the log instead of sending it.
/// Used when no relay is configured.
pub struct LogMailer {
    frontend_url: String,
}

impl LogMailer {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into(),
        }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_buyer_confirmation(&self, email: &AppointmentEmail) -> Result<()> {
        let html = templates::buyer_confirmation(email, &self.frontend_url);
        info!(
            "📧 [log] to={} subject={:?} ({} bytes)",
            email.buyer_email,
            templates::BUYER_SUBJECT,
            html.len()
        );
        Ok(())
    }

    async fn send_seller_alert(&self, email: &AppointmentEmail) -> Result<()> {
        let html = templates::seller_alert(email, &self.frontend_url);
        info!(
            "📧 [log] to={} subject={:?} ({} bytes)",
            email.seller_email,
            templates::SELLER_SUBJECT,
            html.len()
        );
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "log"
    }
}
