use crate::config::MailConfig;
use crate::mailer::templates;
use crate::mailer::traits::Mailer;
use crate::mailer::types::{AppointmentEmail, OutgoingMail};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Posts rendered messages as JSON to an HTTP mail relay
pub struct HttpMailer {
    client: Client,
    relay_url: String,
    relay_token: Option<String>,
    from: String,
    frontend_url: String,
}

impl HttpMailer {
    pub fn new(relay_url: impl Into<String>, config: &MailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("urban-vault/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            relay_url: relay_url.into(),
            relay_token: config.relay_token.clone(),
            from: config.from.clone(),
            frontend_url: config.frontend_url.clone(),
        })
    }

    async fn deliver(&self, mail: OutgoingMail) -> Result<()> {
        debug!("POST {} ({} bytes of HTML)", self.relay_url, mail.html.len());

        let mut request = self.client.post(&self.relay_url).json(&mail);
        if let Some(token) = &self.relay_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach mail relay at {}", self.relay_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Mail relay rejected message to {}: HTTP {} {}", mail.to, status, body);
        }

        info!("📧 Sent \"{}\" to {}", mail.subject, mail.to);
        Ok(())
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_buyer_confirmation(&self, email: &AppointmentEmail) -> Result<()> {
        self.deliver(OutgoingMail {
            from: self.from.clone(),
            to: email.buyer_email.clone(),
            subject: templates::BUYER_SUBJECT.to_string(),
            html: templates::buyer_confirmation(email, &self.frontend_url),
        })
        .await
    }

    async fn send_seller_alert(&self, email: &AppointmentEmail) -> Result<()> {
        self.deliver(OutgoingMail {
            from: self.from.clone(),
            to: email.seller_email.clone(),
            subject: templates::SELLER_SUBJECT.to_string(),
            html: templates::seller_alert(email, &self.frontend_url),
        })
        .await
    }

    fn transport_name(&self) -> &'static str {
        "http-relay"
    }
}
