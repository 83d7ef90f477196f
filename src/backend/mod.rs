pub mod smtp;

use lettre::address::Envelope;
use thiserror::Error;

pub use smtp::SmtpBackend;

/// Host of the local test relay every alert is submitted to.
pub const DEFAULT_RELAY_HOST: &str = "localhost";
/// Port of the local test relay.
pub const DEFAULT_RELAY_PORT: u16 = 1025;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("SMTP relay host not provided")]
    HostNotProvided,
    #[error("SMTP error: {0:#}")]
    Smtp(#[from] anyhow::Error),
}

/// Backend trait for submitting one composed message.
///
/// The backend receives:
/// - The SMTP envelope (sender and recipient, taken from the From/To headers)
/// - The fully serialized message (headers + MIME parts)
pub trait EmailBackend: Send + Sync {
    /// Submit the message once. Implementations must not retry.
    fn send(&self, envelope: &Envelope, raw_email: &[u8]) -> Result<(), BackendError>;
}
