use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::trace;

use super::types::{
    AnswerCallbackQuery, ApiResponse, ChatMember, EditMessageText, GetChatMember, GetUpdates,
    InlineKeyboardMarkup, SendMessage, Update,
};

/// Errors from talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),
    #[error("failed to encode or decode Bot API payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Bot API call {method} failed: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

/// The Bot API calls the bot makes.
pub trait BotApi {
    /// Long-poll for updates after `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] if the request or decoding fails.
    fn get_updates(&self, offset: Option<i64>, timeout: Duration)
    -> Result<Vec<Update>, TelegramError>;

    /// # Errors
    ///
    /// Returns [`TelegramError`] if the request fails.
    fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError>;

    /// # Errors
    ///
    /// Returns [`TelegramError`] if the request fails.
    fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError>;

    /// # Errors
    ///
    /// Returns [`TelegramError`] if the request fails.
    fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError>;

    /// # Errors
    ///
    /// Returns [`TelegramError`] if the request fails (e.g. unknown channel).
    fn get_chat_member(&self, chat: &str, user_id: i64) -> Result<ChatMember, TelegramError>;
}

/// Configuration for [`TelegramClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without the `/bot<token>` suffix.
    pub api_base: String,
    /// Timeout for requests other than long polls.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Blocking Bot API client over `ureq`, posting JSON bodies.
pub struct TelegramClient {
    agent: ureq::Agent,
    base_url: String,
}

/// Extra time a long poll may take beyond its server-side timeout.
const POLL_GRACE: Duration = Duration::from_secs(10);

impl TelegramClient {
    /// Build a client for the bot identified by `token`.
    ///
    /// The agent's global timeout covers the longest long-poll the caller
    /// will issue (`max_poll`), plus a grace period.
    pub fn new(token: &str, config: &ClientConfig, max_poll: Duration) -> Self {
        let agent_config = ureq::config::Config::builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout.max(max_poll + POLL_GRACE)))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            base_url: format!("{}/bot{token}", config.api_base.trim_end_matches('/')),
        }
    }

    fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &P,
    ) -> Result<T, TelegramError> {
        let url = format!("{}/{method}", self.base_url);
        let body = serde_json::to_string(params)?;
        trace!(method, "calling Bot API");

        let mut response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(body.as_bytes())?;
        let text = response.body_mut().read_to_string()?;

        decode_response(method, &text)
    }
}

/// Unwrap a Bot API envelope into its result.
pub(super) fn decode_response<T: DeserializeOwned>(
    method: &'static str,
    text: &str,
) -> Result<T, TelegramError> {
    let envelope: ApiResponse<T> = serde_json::from_str(text)?;
    match envelope.result {
        Some(result) if envelope.ok => Ok(result),
        _ => Err(TelegramError::Api {
            method,
            description: envelope
                .description
                .unwrap_or_else(|| "no description".to_owned()),
        }),
    }
}

impl BotApi for TelegramClient {
    fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: timeout.as_secs(),
                allowed_updates: &["message", "callback_query"],
            },
        )
    }

    fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        self.call::<_, serde_json::Value>(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                reply_markup: markup,
            },
        )
        .map(|_| ())
    }

    fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        self.call::<_, serde_json::Value>(
            "editMessageText",
            &EditMessageText {
                chat_id,
                message_id,
                text,
                reply_markup: markup,
            },
        )
        .map(|_| ())
    }

    fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        self.call::<_, serde_json::Value>(
            "answerCallbackQuery",
            &AnswerCallbackQuery { callback_query_id },
        )
        .map(|_| ())
    }

    fn get_chat_member(&self, chat: &str, user_id: i64) -> Result<ChatMember, TelegramError> {
        self.call(
            "getChatMember",
            &GetChatMember {
                chat_id: chat,
                user_id,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_response_returns_result() {
        let member: ChatMember =
            decode_response("getChatMember", r#"{"ok":true,"result":{"status":"member"}}"#)
                .unwrap();
        assert!(member.is_joined());
    }

    #[test]
    fn decode_response_surfaces_api_errors() {
        let err = decode_response::<ChatMember>(
            "getChatMember",
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        )
        .unwrap_err();
        match err {
            TelegramError::Api {
                method,
                description,
            } => {
                assert_eq!(method, "getChatMember");
                assert!(description.contains("chat not found"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn decode_response_rejects_garbage() {
        let err = decode_response::<Vec<Update>>("getUpdates", "<html>").unwrap_err();
        assert!(matches!(err, TelegramError::Decode(_)));
    }

    #[test]
    fn connection_refused_returns_error() {
        // Use a port that's (almost certainly) not running a server.
        let config = ClientConfig {
            api_base: "http://127.0.0.1:19999".to_string(),
            timeout: Duration::from_secs(2),
        };
        let client = TelegramClient::new("123:abc", &config, Duration::ZERO);
        let err = client.answer_callback_query("cb").unwrap_err();
        assert!(matches!(err, TelegramError::Http(_)));
    }

    #[test]
    fn base_url_embeds_token() {
        let config = ClientConfig {
            api_base: "https://example.test/".to_string(),
            ..Default::default()
        };
        let client = TelegramClient::new("42:xyz", &config, Duration::from_secs(30));
        assert_eq!(client.base_url, "https://example.test/bot42:xyz");
    }
}
