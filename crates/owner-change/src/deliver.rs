//! Delivery adapter: print the finished report or send it through the
//! configured mail relay.
//!
//! One document, one attempt. A relay failure is fatal for the run; there is
//! no partial delivery and no retry.

use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::settings::EmailSettings;

/// Subject line of the report email.
const SUBJECT: &str = "[Owner-change] Packages ownership change";

/// Mail relay failure or an unusable sender/recipient address.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Sender or recipient address did not parse.
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),
    /// The message itself could not be assembled.
    #[error("failed to build report email: {0}")]
    Message(#[from] lettre::error::Error),
    /// The relay rejected the message or was unreachable.
    #[error("mail relay failure: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Write the report to standard output.
pub fn print_report(report: &str) {
    println!("{report}");
}

/// Send the report as a single plain-text email via the configured relay.
pub async fn send_report(report: &str, email: &EmailSettings) -> Result<(), DeliveryError> {
    let message = Message::builder()
        .from(email.sender.parse()?)
        .to(email.recipient.parse()?)
        .subject(SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(report.to_string())?;

    let transport: AsyncSmtpTransport<Tokio1Executor> =
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&email.relay_host).build();
    let response = transport.send(message).await?;
    info!(
        recipient = %email.recipient,
        code = %response.code(),
        "report email accepted by relay"
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
