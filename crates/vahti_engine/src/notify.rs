use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use vahti_core::Notice;
use vahti_logging::{vahti_info, vahti_warn};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("could not build message: {0}")]
    Message(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("channel rejected the message: {0}")]
    Rejected(String),
}

/// One delivery target for notices.
#[async_trait::async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &'static str;
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError>;
}

/// Telegram Bot API credentials.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Delivers notices as plain-text Telegram messages.
pub struct TelegramChannel {
    config: TelegramConfig,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        Ok(Self {
            config,
            api_base: TELEGRAM_API_BASE.to_string(),
            client,
        })
    }

    /// Redirects API calls to a different host. Test hook.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait::async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let endpoint = format!("{}/bot{}/sendMessage", self.api_base, self.config.bot_token);
        // No parse_mode: raw URLs and diff text must arrive verbatim.
        let payload = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": format!("{}\n{}", notice.subject, notice.body),
            "disable_web_page_preview": true,
        });
        let body = serde_json::to_string(&payload)
            .map_err(|err| NotifyError::Message(err.to_string()))?;

        let response = self
            .client
            .post(&endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.to_string()));
        }
        Ok(())
    }
}

/// Mail relay coordinates plus the fixed sender and recipient.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

/// Delivers notices as plain-text email over an authenticated STARTTLS
/// relay.
pub struct SmtpChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpChannel {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|err| NotifyError::Message(format!("sender address: {err}")))?;
        let to: Mailbox = config
            .to
            .parse()
            .map_err(|err| NotifyError::Message(format!("recipient address: {err}")))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|err| NotifyError::Transport(err.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(SEND_TIMEOUT))
            .build();
        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

#[async_trait::async_trait]
impl Channel for SmtpChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notice.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body.clone())
            .map_err(|err| NotifyError::Message(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        Ok(())
    }
}

/// Fans one notice out to every configured channel, in order. Channels are
/// independent: a failure is logged and the remaining channels still run.
pub struct Dispatcher {
    channels: Vec<Box<dyn Channel>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn Channel>>) -> Self {
        Self { channels }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub async fn dispatch(&self, notice: &Notice) {
        if self.channels.is_empty() {
            vahti_warn!(
                "no notification channels configured, dropping notice: {}",
                notice.subject
            );
            return;
        }
        for channel in &self.channels {
            match channel.send(notice).await {
                Ok(()) => vahti_info!("sent via {}: {}", channel.name(), notice.subject),
                Err(err) => vahti_warn!("send via {} failed: {}", channel.name(), err),
            }
        }
    }
}
