//! Environment-driven configuration for the vahti binary.

use std::path::PathBuf;

use vahti_engine::{SmtpConfig, TelegramConfig};
use vahti_logging::vahti_warn;

/// Path prefix that marks a link on the watched page as a listing detail
/// page.
pub const DEFAULT_LISTING_PREFIX: &str = "/en/apartments/";

const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Everything the watcher needs, resolved from environment variables.
///
/// A channel is configured only when its variables form a usable whole;
/// partial channel configuration is a warning, never a hard error.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub page_url: Option<String>,
    pub state_dir: PathBuf,
    pub notify_on_first_run: bool,
    pub telegram: Option<TelegramConfig>,
    pub smtp: Option<SmtpConfig>,
    /// Send failure notices over Telegram.
    pub telegram_on_error: bool,
    /// Send failure notices over email.
    pub email_on_error: bool,
}

impl WatchConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through the given lookup. Tests feed maps through
    /// here instead of mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let state_dir = non_empty(lookup("STATE_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);

        Self {
            page_url: non_empty(lookup("URL")),
            state_dir,
            notify_on_first_run: env_bool(lookup("NOTIFY_ON_FIRST_RUN"), false),
            telegram: build_telegram(&lookup),
            smtp: build_smtp(&lookup),
            telegram_on_error: env_bool(lookup("TELEGRAM_ON_ERROR"), true),
            email_on_error: env_bool(lookup("EMAIL_ON_ERROR"), false),
        }
    }
}

fn default_state_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".state")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Accepts 1/true/yes/on in any case as true; anything else set is false.
fn env_bool(value: Option<String>, default: bool) -> bool {
    match non_empty(value) {
        Some(raw) => matches!(
            raw.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        None => default,
    }
}

fn build_telegram(lookup: &impl Fn(&str) -> Option<String>) -> Option<TelegramConfig> {
    let bot_token = non_empty(lookup("TELEGRAM_BOT_TOKEN"));
    let chat_id = non_empty(lookup("TELEGRAM_CHAT_ID"));
    match (bot_token, chat_id) {
        (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
        (None, None) => None,
        _ => {
            vahti_warn!(
                "telegram disabled: TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must both be set"
            );
            None
        }
    }
}

fn build_smtp(lookup: &impl Fn(&str) -> Option<String>) -> Option<SmtpConfig> {
    let username = non_empty(lookup("SMTP_USERNAME"));
    let password = non_empty(lookup("SMTP_PASSWORD"));
    let recipient = non_empty(lookup("RECIPIENT_EMAIL"));

    let partially_set = username.is_some() || password.is_some() || recipient.is_some();
    let (username, password, to) = match (username, password, recipient) {
        (Some(username), Some(password), Some(to)) => (username, password, to),
        _ => {
            if partially_set {
                vahti_warn!(
                    "email disabled: SMTP_USERNAME, SMTP_PASSWORD and RECIPIENT_EMAIL must all be set"
                );
            }
            return None;
        }
    };

    let server =
        non_empty(lookup("SMTP_SERVER")).unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string());
    let port = match non_empty(lookup("SMTP_PORT")) {
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                vahti_warn!("email disabled: SMTP_PORT {:?} is not a valid port", raw);
                return None;
            }
        },
        None => DEFAULT_SMTP_PORT,
    };
    let from = non_empty(lookup("EMAIL_FROM")).unwrap_or_else(|| username.clone());

    Some(SmtpConfig {
        server,
        port,
        username,
        password,
        from,
        to,
    })
}
