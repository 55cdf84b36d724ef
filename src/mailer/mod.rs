pub mod http;
pub mod log;
pub mod templates;
pub mod traits;
pub mod types;

pub use http::HttpMailer;
pub use log::LogMailer;
pub use traits::Mailer;
pub use types::AppointmentEmail;

use crate::config::MailConfig;
use anyhow::Result;
use std::sync::Arc;

/// Pick the transport described by the mail configuration
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match &config.relay_url {
        Some(url) => Arc::new(HttpMailer::new(url.clone(), config)?),
        None => Arc::new(LogMailer::new(config.frontend_url.clone())),
    };
    Ok(mailer)
}
