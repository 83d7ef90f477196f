use std::error::Error as StdError;
use std::str::FromStr;

use chrono::{DateTime, Local};
use lettre::message::header::{Header, HeaderName, HeaderValue};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::Message;
use log::{debug, trace};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
}

/// Parse a mailbox (`user@host` or `Name <user@host>`) for use in both the
/// headers and the SMTP envelope.
pub fn parse_mailbox(value: &str) -> Result<Mailbox, ParseError> {
    Mailbox::from_str(value.trim()).map_err(|_| ParseError::InvalidEmail(value.to_string()))
}

/// A single alert email, built once and handed to a backend.
#[derive(Debug, Clone)]
pub struct Email {
    pub sender: Mailbox,
    pub recipient: Mailbox,
    pub subject: String,
    /// `None` sends no text part at all; `Some("")` sends an empty one.
    pub body: Option<String>,
}

impl Email {
    pub fn new(
        sender: Mailbox,
        recipient: Mailbox,
        subject: impl Into<String>,
        body: Option<String>,
    ) -> Self {
        Self {
            sender,
            recipient,
            subject: subject.into(),
            body,
        }
    }
}

/// `Date:` header rendered in local time with its UTC offset.
///
/// lettre's own `Date` header always renders in UTC.
#[derive(Debug, Clone)]
pub struct LocalDate(DateTime<Local>);

impl LocalDate {
    pub fn now() -> Self {
        Self(Local::now())
    }
}

impl Header for LocalDate {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Date")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let date = DateTime::parse_from_rfc2822(s.trim())?;
        Ok(Self(date.with_timezone(&Local)))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.to_rfc2822())
    }
}

/// Build the `multipart/alternative` message for an [`Email`].
///
/// Headers are From, To, Date and Subject in that order, followed by the
/// MIME headers lettre adds for the multipart body.
pub fn compose(email: &Email) -> Result<Message, ComposeError> {
    let parts = MultiPart::alternative();
    let parts = match &email.body {
        Some(body) => {
            trace!("Attaching text/plain part ({} bytes)", body.len());
            parts.singlepart(SinglePart::plain(body.clone()))
        }
        None => {
            trace!("No body given; message has no text part");
            parts.build()
        }
    };

    let message = Message::builder()
        .from(email.sender.clone())
        .to(email.recipient.clone())
        .header(LocalDate::now())
        .subject(email.subject.as_str())
        .multipart(parts)?;

    debug!(
        "Composed message: from={} to={} subject={:?}",
        email.sender, email.recipient, email.subject
    );
    Ok(message)
}
