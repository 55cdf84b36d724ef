use thiserror::Error;
use validator::ValidationErrors;

/// Failures surfaced by the marketplace core.
///
/// Every business-rule variant carries a message naming the violated rule so
/// clients can show it as-is.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Malformed or out-of-range input
    #[error("{0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Caller is not allowed to act on this record
    #[error("{0}")]
    Forbidden(String),

    /// Request is well-formed but breaks a business rule
    #[error("{0}")]
    InvalidOperation(String),

    /// No usable identity on a protected operation
    #[error("{0}")]
    Unauthorized(String),

    /// Persistence or downstream failure
    #[error("Internal error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl MarketError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }
}

/// Joins the rule message of every failed field, sorted by field name
impl From<ValidationErrors> for MarketError {
    fn from(errors: ValidationErrors) -> Self {
        let mut failures: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"));
                    (field.to_string(), message)
                })
            })
            .collect();
        failures.sort();

        let messages: Vec<String> = failures.into_iter().map(|(_, message)| message).collect();
        Self::Validation(messages.join("; "))
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
