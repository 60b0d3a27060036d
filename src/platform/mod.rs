pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// One inbound event from the chat platform.
///
/// Any combination of fields may be populated; the dispatcher checks each
/// one independently.
#[derive(Debug, Clone, Default)]
pub struct InboundUpdate {
    /// Platform update id, used for logging only
    pub id: Option<u32>,
    pub text_message: Option<TextMessage>,
    pub web_app_payload: Option<WebAppPayload>,
    pub button_callback: Option<ButtonCallback>,
    pub chosen_result: Option<ChosenResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub chat_id: i64,
    /// Sender's @username, absent for users that never set one
    pub sender_handle: Option<String>,
    pub text: String,
    pub timestamp_seconds: i64,
}

/// Data reported back by a web app the bot launched
#[derive(Debug, Clone, PartialEq)]
pub struct WebAppPayload {
    pub chat_id: i64,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonCallback {
    pub message_text: Option<String>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChosenResult {
    pub result_id: String,
}

/// A message to deliver to a chat
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundReply {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub reply_markup: Option<ReplyMarkup>,
}

impl OutboundReply {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        }
    }

    pub fn parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }

    pub fn reply_markup(mut self, markup: ReplyMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Legacy Markdown; code blocks need no escaping
    Markdown,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyMarkup {
    /// Buttons attached to the sent message
    InlineKeyboard(Vec<Vec<Button>>),
    /// Buttons replacing the client's text keyboard
    ReplyKeyboard(Vec<Vec<Button>>),
    RemoveKeyboard { selective: bool },
}

impl ReplyMarkup {
    /// Rows of the keyboard, empty for `RemoveKeyboard`
    #[allow(dead_code)]
    pub fn rows(&self) -> &[Vec<Button>] {
        match self {
            ReplyMarkup::InlineKeyboard(rows) | ReplyMarkup::ReplyKeyboard(rows) => rows,
            ReplyMarkup::RemoveKeyboard { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonAction {
    /// Opaque data echoed back in a callback query
    Callback(String),
    /// Opens the URL as an embedded web app
    WebApp(Url),
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn web_app(label: impl Into<String>, url: Url) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::WebApp(url),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("platform rejected the message: {0}")]
    Rejected(String),
    #[error("failed to reach the platform: {0}")]
    Network(String),
}

/// An already-authenticated connection to the chat platform
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, reply: OutboundReply) -> Result<(), DeliveryError>;

    fn bot_username(&self) -> &str;
}
