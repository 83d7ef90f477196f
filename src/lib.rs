use std::io::Write;

pub mod args;
pub mod backend;
pub mod logger;
pub mod message;

use backend::{BackendError, EmailBackend, SmtpBackend};
use clap::Parser;
use log::{error, info};
use message::{ComposeError, Email, ParseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailerError {
    #[error(transparent)]
    Address(#[from] ParseError),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Send one email to the local relay at `localhost:1025`.
///
/// Passing `None` as `body` sends a message without any text part.
pub fn send_email(
    sender: &str,
    recipient: &str,
    subject: &str,
    body: Option<&str>,
) -> Result<(), MailerError> {
    let email = Email::new(
        message::parse_mailbox(sender)?,
        message::parse_mailbox(recipient)?,
        subject,
        body.map(str::to_string),
    );
    send_email_via(&SmtpBackend::local_relay(), &email)
}

/// Compose `email` and submit it through `backend` exactly once.
pub fn send_email_via(backend: &dyn EmailBackend, email: &Email) -> Result<(), MailerError> {
    let message = message::compose(email)?;
    backend.send(message.envelope(), &message.formatted())?;
    Ok(())
}

/// Command-line entry point; submits to the local relay.
pub fn run_alert(stderr: &mut dyn Write, args: &[String]) -> i32 {
    run_alert_with_backend(stderr, args, &SmtpBackend::local_relay())
}

pub fn run_alert_with_backend(
    stderr: &mut dyn Write,
    args: &[String],
    backend: &dyn EmailBackend,
) -> i32 {
    let cli_args = match args::AlertArgs::try_parse_from(args) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    logger::init_logger(cli_args.verbosity);

    let email = Email::new(
        cli_args.sender,
        cli_args.recipient,
        cli_args.subject,
        Some(cli_args.body),
    );
    info!("Sending alert to {}", email.recipient);

    match send_email_via(backend, &email) {
        Ok(()) => 0,
        Err(e) => {
            error!("Failed to send email: {}", e);
            let _ = writeln!(stderr, "alert: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lettre::address::Envelope;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        sent: Mutex<Vec<(String, Vec<String>, String)>>,
    }

    impl RecordingBackend {
        fn sent(&self) -> Vec<(String, Vec<String>, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl EmailBackend for RecordingBackend {
        fn send(&self, envelope: &Envelope, raw_email: &[u8]) -> Result<(), BackendError> {
            let from = envelope.from().map(|a| a.to_string()).unwrap_or_default();
            let to = envelope.to().iter().map(|a| a.to_string()).collect();
            let raw = String::from_utf8_lossy(raw_email).into_owned();
            self.sent.lock().unwrap().push((from, to, raw));
            Ok(())
        }
    }

    struct FailingBackend;

    impl EmailBackend for FailingBackend {
        fn send(&self, _: &Envelope, _: &[u8]) -> Result<(), BackendError> {
            Err(BackendError::Smtp(anyhow::anyhow!("Connection refused")))
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_alert_sends_once_with_defaults() {
        let backend = RecordingBackend::default();
        let mut stderr = Vec::new();
        let rc = run_alert_with_backend(
            &mut stderr,
            &args(&["alert", "-s", "a@x.com", "-r", "b@y.com"]),
            &backend,
        );
        assert_eq!(rc, 0);

        let sent = backend.sent();
        assert_eq!(sent.len(), 1);
        let (from, to, raw) = &sent[0];
        assert_eq!(from, "a@x.com");
        assert_eq!(to, &vec!["b@y.com".to_string()]);
        assert!(raw.contains("Subject: Subject"));
        assert!(raw.contains("Body"));
        assert!(stderr.is_empty());
    }

    #[test]
    fn test_run_alert_missing_recipient_never_sends() {
        let backend = RecordingBackend::default();
        let mut stderr = Vec::new();
        let rc = run_alert_with_backend(&mut stderr, &args(&["alert", "-s", "a@x.com"]), &backend);
        assert_ne!(rc, 0);
        assert!(backend.sent().is_empty());
    }

    #[test]
    fn test_run_alert_reports_backend_failure() {
        let mut stderr = Vec::new();
        let rc = run_alert_with_backend(
            &mut stderr,
            &args(&["alert", "-s", "a@x.com", "-r", "b@y.com"]),
            &FailingBackend,
        );
        assert_eq!(rc, 1);

        let stderr = String::from_utf8(stderr).unwrap();
        assert_eq!(stderr, "alert: SMTP error: Connection refused\n");
    }

    #[test]
    fn test_send_email_via_without_body() {
        let backend = RecordingBackend::default();
        let email = Email::new(
            message::parse_mailbox("a@x.com").unwrap(),
            message::parse_mailbox("b@y.com").unwrap(),
            "Hi",
            None,
        );
        send_email_via(&backend, &email).unwrap();

        let sent = backend.sent();
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].2.contains("text/plain"));
    }

    #[test]
    fn test_send_email_rejects_bad_sender_before_sending() {
        let err = send_email("nobody", "b@y.com", "Hi", Some("Hello")).unwrap_err();
        assert!(matches!(err, MailerError::Address(ParseError::InvalidEmail(_))));
    }
}
