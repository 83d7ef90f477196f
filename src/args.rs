use clap::Parser;
use lettre::message::Mailbox;

/// Parse a mailbox from a string for clap
fn parse_mailbox(s: &str) -> Result<Mailbox, String> {
    crate::message::parse_mailbox(s).map_err(|e| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "alert")]
#[command(about = "Send a single email through the local SMTP relay")]
#[command(
    long_about = "Composes a multipart/alternative message and submits it to the SMTP relay at localhost:1025."
)]
pub struct AlertArgs {
    /// Sender address, used for the From header and the envelope
    #[arg(short = 's', long = "sender", value_name = "SENDER", value_parser = parse_mailbox)]
    pub sender: Mailbox,

    /// Recipient address, used for the To header and the envelope
    #[arg(short = 'r', long = "recipient", value_name = "RECIPIENT", value_parser = parse_mailbox)]
    pub recipient: Mailbox,

    /// Subject line
    #[arg(short = 'j', long = "subject", value_name = "SUBJECT", default_value = "Subject")]
    pub subject: String,

    /// Plain-text body
    #[arg(short = 'b', long = "body", value_name = "BODY", default_value = "Body")]
    pub body: String,

    /// Increase verbosity (can be used multiple times: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
