use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use tracing::info;

const SMTP_SERVER: &str = "smtp.gmail.com";
const SMTP_PORT: u16 = 587;
const SENDER_NAME: &str = "Progressive Data Jobs Bot";

pub const DEFAULT_CREDENTIALS_PATH: &str = "Email-Credentials.txt";

/// Sender login, read from a JSON file kept out of the repo.
#[derive(Deserialize)]
pub struct Credentials {
    #[serde(rename = "Email Address", alias = "address")]
    pub address: String,
    #[serde(rename = "Password", alias = "secret")]
    pub secret: String,
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .context("Credentials must be a JSON object with \"Email Address\" and \"Password\"")
    }
}

pub fn subject(run_date: NaiveDate) -> String {
    format!("Progressive Data Jobs Update: {}", run_date.format("%m/%d/%y"))
}

pub fn build_message(creds: &Credentials, to: &str, subject: &str, body: String) -> Result<Message> {
    let sender = creds
        .address
        .parse()
        .with_context(|| format!("Invalid sender address: {}", creds.address))?;
    let recipient: Mailbox = to
        .parse()
        .with_context(|| format!("Invalid recipient address: {}", to))?;

    Message::builder()
        .from(Mailbox::new(Some(SENDER_NAME.to_string()), sender))
        .to(recipient)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(body)
        .context("Failed to build digest email")
}

/// Deliver over STARTTLS with the sender's own login.
pub async fn send(creds: &Credentials, message: Message) -> Result<()> {
    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(SMTP_SERVER)
        .context("Failed to configure SMTP relay")?
        .port(SMTP_PORT)
        .credentials(SmtpCredentials::new(
            creds.address.clone(),
            creds.secret.clone(),
        ))
        .build();

    info!("Sending digest via {}:{}", SMTP_SERVER, SMTP_PORT);
    let response = transport
        .send(message)
        .await
        .context("SMTP delivery failed")?;
    info!("SMTP server accepted digest ({})", response.code());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::from_json(r#"{"Email Address": "bot@example.org", "Password": "hunter2"}"#).unwrap()
    }

    #[test]
    fn credentials_original_keys() {
        let c = creds();
        assert_eq!(c.address, "bot@example.org");
        assert_eq!(c.secret, "hunter2");
    }

    #[test]
    fn credentials_short_keys() {
        let c = Credentials::from_json(r#"{"address": "a@b.org", "secret": "s"}"#).unwrap();
        assert_eq!(c.address, "a@b.org");
        assert_eq!(c.secret, "s");
    }

    #[test]
    fn credentials_missing_password() {
        assert!(Credentials::from_json(r#"{"Email Address": "a@b.org"}"#).is_err());
    }

    #[test]
    fn credentials_missing_file() {
        let err = Credentials::load(Path::new("tests/fixtures/no-such-file.json")).err().unwrap();
        assert!(err.to_string().contains("no-such-file.json"));
    }

    #[test]
    fn subject_uses_short_date() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(subject(d), "Progressive Data Jobs Update: 01/09/24");
    }

    #[test]
    fn message_headers() {
        let msg = build_message(&creds(), "reader@example.org", "Update", "<b>hi</b>".into()).unwrap();
        let to: Vec<String> = msg.envelope().to().iter().map(|a| a.to_string()).collect();
        assert_eq!(to, vec!["reader@example.org"]);

        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("Progressive Data Jobs Bot"));
        assert!(raw.contains("<bot@example.org>"));
        assert!(raw.contains("Subject: Update"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn bad_recipient() {
        let err = build_message(&creds(), "not an address", "Update", String::new()).err().unwrap();
        assert!(err.to_string().contains("Invalid recipient"));
    }
}
