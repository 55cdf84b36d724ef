use anyhow::{anyhow, Context, Result};
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::{info, warn};

/// How the seller rating recompute is protected against concurrent reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingConsistency {
    /// Concurrent reviews of one seller may interleave; last writer wins
    #[default]
    Relaxed,
    /// Review insert and seller recompute run one at a time in this process
    Serialized,
}

impl FromStr for RatingConsistency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relaxed" => Ok(Self::Relaxed),
            "serialized" => Ok(Self::Serialized),
            other => Err(anyhow!("unknown rating consistency mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP endpoint of the mail relay. Mail is only logged when unset.
    pub relay_url: Option<String>,
    pub relay_token: Option<String>,
    pub from: String,
    pub frontend_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            relay_token: None,
            from: "no-reply@urbanvault.local".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub data_file: Option<PathBuf>,
    pub mail: MailConfig,
    pub rating_consistency: RatingConsistency,
    pub notification_list_max: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            data_file: None,
            mail: MailConfig::default(),
            rating_consistency: RatingConsistency::default(),
            notification_list_max: 100,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = Config::default();

        Ok(Self {
            bind_address: try_load("BIND_ADDRESS", &defaults.bind_address)?,
            port: try_load("PORT", &defaults.port.to_string())?,
            data_file: optional("DATA_FILE").map(PathBuf::from),
            mail: MailConfig {
                relay_url: optional("MAIL_RELAY_URL"),
                relay_token: optional("MAIL_RELAY_TOKEN"),
                from: try_load("MAIL_FROM", &defaults.mail.from)?,
                frontend_url: try_load("FRONTEND_URL", &defaults.mail.frontend_url)?,
            },
            rating_consistency: try_load("RATING_CONSISTENCY", "relaxed")?,
            notification_list_max: try_load(
                "NOTIFICATION_LIST_MAX",
                &defaults.notification_list_max.to_string(),
            )?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow!("{e}")
        })
        .with_context(|| format!("Environment misconfigured: {key}"))
}
