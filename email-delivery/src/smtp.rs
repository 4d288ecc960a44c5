use crate::error::DeliveryError;
use interfaces::defs::{DigestDelivery, DigestOutput};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub sender_email: String,
    pub sender_password: String,
    pub recipient_email: String,
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender_email", &self.sender_email)
            .field("sender_password", &"***")
            .field("recipient_email", &self.recipient_email)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl SmtpSettings {
    /// Read SMTP_SERVER, SMTP_PORT, SENDER_EMAIL, SENDER_PASSWORD and RECIPIENT_EMAIL.
    pub fn from_env() -> Result<Self, DeliveryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`SmtpSettings::from_env`], reading values through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DeliveryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let server = get("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string());
        let port = match get("SMTP_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| DeliveryError::InvalidPort(raw))?,
            None => DEFAULT_SMTP_PORT,
        };

        let sender_email = get("SENDER_EMAIL");
        let sender_password = get("SENDER_PASSWORD");
        let recipient_email = get("RECIPIENT_EMAIL");

        match (sender_email, sender_password, recipient_email) {
            (Some(sender_email), Some(sender_password), Some(recipient_email)) => Ok(Self {
                server,
                port,
                sender_email,
                sender_password,
                recipient_email,
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            }),
            (sender, password, recipient) => {
                let missing: Vec<&str> = [
                    ("SENDER_EMAIL", sender.is_none()),
                    ("SENDER_PASSWORD", password.is_none()),
                    ("RECIPIENT_EMAIL", recipient.is_none()),
                ]
                .into_iter()
                .filter(|(_, is_missing)| *is_missing)
                .map(|(key, _)| key)
                .collect();
                Err(DeliveryError::NotConfigured(missing.join(", ")))
            }
        }
    }
}

/// Sends digests as multipart/alternative email over STARTTLS.
pub struct SmtpDelivery {
    settings: SmtpSettings,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpDelivery {
    pub fn new(settings: SmtpSettings) -> Result<Self, DeliveryError> {
        let sender = parse_mailbox(&settings.sender_email)?;
        let recipient = parse_mailbox(&settings.recipient_email)?;
        Ok(Self {
            settings,
            sender,
            recipient,
        })
    }

    pub fn from_env() -> Result<Self, DeliveryError> {
        Self::new(SmtpSettings::from_env()?)
    }

    /// Plain text part first, HTML second, so clients prefer the HTML.
    pub fn build_message(&self, digest: &DigestOutput) -> Result<Message, DeliveryError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(digest.subject.clone())
            .multipart(MultiPart::alternative_plain_html(digest.text.clone(), digest.html.clone()))?;
        Ok(message)
    }

    pub fn send(&self, digest: &DigestOutput) -> Result<(), DeliveryError> {
        let message = self.build_message(digest)?;

        debug!("Connecting to {}:{}", self.settings.server, self.settings.port);
        let mailer = SmtpTransport::starttls_relay(&self.settings.server)?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.sender_email.clone(),
                self.settings.sender_password.clone(),
            ))
            .timeout(Some(Duration::from_secs(self.settings.timeout_seconds)))
            .build();

        mailer.send(&message)?;
        info!("Email sent to {}", self.settings.recipient_email);
        Ok(())
    }
}

impl DigestDelivery for SmtpDelivery {
    fn deliver(&self, digest: &DigestOutput) -> anyhow::Result<()> {
        Ok(self.send(digest)?)
    }

    fn channel_name(&self) -> String {
        format!("smtp://{}:{}", self.settings.server, self.settings.port)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse().map_err(|source| DeliveryError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}
