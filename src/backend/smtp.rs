use anyhow::Context;
use lettre::{address::Envelope, SmtpTransport, Transport};
use log::{debug, info, trace};

use super::{BackendError, EmailBackend, DEFAULT_RELAY_HOST, DEFAULT_RELAY_PORT};

/// Plain-text SMTP submission without TLS or authentication.
///
/// A new connection is opened for every message and closed with QUIT once
/// the relay has answered.
#[derive(Debug, Clone)]
pub struct SmtpBackend {
    host: String,
    port: u16,
}

impl SmtpBackend {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The fixed local relay at `localhost:1025`.
    pub fn local_relay() -> Self {
        Self::new(DEFAULT_RELAY_HOST, DEFAULT_RELAY_PORT)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for SmtpBackend {
    fn default() -> Self {
        Self::local_relay()
    }
}

impl EmailBackend for SmtpBackend {
    fn send(&self, envelope: &Envelope, raw_email: &[u8]) -> Result<(), BackendError> {
        info!(
            "SMTP backend: sending via {}:{} ({} recipient(s))",
            self.host,
            self.port,
            envelope.to().len()
        );
        if let Some(from) = envelope.from() {
            debug!("SMTP backend: envelope-from={}", from);
        }
        trace!("SMTP backend: raw_email_bytes={}", raw_email.len());

        if self.host.is_empty() {
            return Err(BackendError::HostNotProvided);
        }

        // No TLS, no credentials, lettre's default timeout
        let transport = SmtpTransport::builder_dangerous(self.host.as_str())
            .port(self.port)
            .build();

        debug!("SMTP backend: connecting and sending");
        let response = transport
            .send_raw(envelope, raw_email)
            .with_context(|| format!("Failed to send mail via {}:{}", self.host, self.port))?;
        debug!("SMTP backend: relay replied {}", response.code());

        info!("SMTP backend: send complete");
        Ok(())
    }
}
