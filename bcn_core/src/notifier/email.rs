//! Email channel over SMTP with STARTTLS.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::{
    config::EmailSettings,
    http::TIMEOUT,
    notifier::{DeliveryError, Notifier},
};

pub(crate) static NAME: &str = "Email";
static SUBJECT: &str = "Bin Collection Reminder";

/// Mails the message from the sender account to the recipient.
pub struct EmailNotifier {
    settings: EmailSettings,
}

impl EmailNotifier {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    fn build_message(&self, message: &str) -> Result<Message, DeliveryError> {
        let email = Message::builder()
            .from(self.settings.sender.parse()?)
            .to(self.settings.recipient.parse()?)
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(message.to_owned())?;
        Ok(email)
    }

    /// The connection is upgraded with STARTTLS before authenticating.
    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let credentials = Credentials::new(
            self.settings.sender.clone(),
            self.settings.password.clone(),
        );
        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.smtp_server)?
                .port(self.settings.smtp_port)
                .credentials(credentials)
                .timeout(Some(TIMEOUT))
                .build();
        Ok(transport)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        let email = self.build_message(message)?;
        debug!(
            server = %self.settings.smtp_server,
            port = self.settings.smtp_port,
            "sending email"
        );
        self.transport()?.send(email).await?;
        Ok(())
    }
}
