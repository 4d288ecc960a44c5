use thiserror::Error;

/// Errors that can occur while configuring or sending a digest email
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Required settings are absent or empty
    #[error("Email not configured. Set {0}")]
    NotConfigured(String),

    #[error("Invalid SMTP port: {0:?}")]
    InvalidPort(String),

    #[error("Invalid email address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// The MIME message could not be assembled
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}
