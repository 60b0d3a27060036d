use chrono::Local;
use tracing::{error, info, warn};
use url::Url;

use crate::platform::{InboundUpdate, OutboundReply, TextMessage, Transport};
use crate::replies;

/// Text commands, checked in order; the first matching prefix wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    InlineKeyboard,
    WebApp,
}

impl Command {
    const PREFIXES: [(&'static str, Command); 3] = [
        ("/start", Command::Start),
        ("/inline-keyboard", Command::InlineKeyboard),
        ("/web-app", Command::WebApp),
    ];

    pub fn parse(text: &str) -> Option<Self> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| text.starts_with(prefix))
            .map(|(_, cmd)| *cmd)
    }
}

/// Routes inbound updates to reply builders and sends the results.
///
/// Holds no mutable state, so one instance can serve concurrent updates.
pub struct UpdateDispatcher<T> {
    transport: T,
    web_app_url: Url,
}

impl<T: Transport> UpdateDispatcher<T> {
    pub fn new(transport: T, web_app_url: Url) -> Self {
        Self {
            transport,
            web_app_url,
        }
    }

    #[allow(dead_code)]
    pub fn bot_username(&self) -> &str {
        self.transport.bot_username()
    }

    /// Handle one update. Delivery failures are logged, never returned.
    pub async fn handle(&self, update: InboundUpdate) {
        match update.id {
            Some(id) => info!("New update: {}", id),
            None => info!("New update"),
        }

        if let Some(msg) = &update.text_message {
            info!("Message: {}", msg.text);
            self.handle_text(msg).await;
        }

        if let Some(payload) = &update.web_app_payload {
            info!("WebApp data: {}", payload.data);
            self.deliver(replies::web_app_data(payload)).await;
        }

        if let Some(callback) = &update.button_callback {
            info!(
                "CallbackQuery: Message: {} - Data: {}",
                callback.message_text.as_deref().unwrap_or_default(),
                callback.data.as_deref().unwrap_or_default()
            );
        }

        if let Some(chosen) = &update.chosen_result {
            info!("ChosenInlineResult: {}", chosen.result_id);
        }
    }

    async fn handle_text(&self, msg: &TextMessage) {
        let reply = match Command::parse(&msg.text) {
            Some(Command::Start) => replies::start(msg),
            Some(Command::InlineKeyboard) => replies::inline_keyboard(msg),
            Some(Command::WebApp) => replies::web_app_inline_keyboard(msg, &self.web_app_url),
            None => return,
        };
        self.deliver(reply).await;
    }

    /// Send the web app launcher as a text keyboard. Not bound to a command.
    #[allow(dead_code)]
    pub async fn reply_web_app_keyboard(&self, msg: &TextMessage) {
        self.deliver(replies::web_app_keyboard(msg, &self.web_app_url))
            .await;
    }

    /// Echo the message date in the server's local time. Not bound to a command.
    #[allow(dead_code)]
    pub async fn reply_timestamp(&self, msg: &TextMessage) {
        match replies::timestamp(msg, &Local) {
            Some(reply) => self.deliver(reply).await,
            None => warn!("Message timestamp out of range: {}", msg.timestamp_seconds),
        }
    }

    async fn deliver(&self, reply: OutboundReply) {
        let chat_id = reply.chat_id;
        if let Err(e) = self.transport.send(reply).await {
            error!("Failed to send reply to chat {}: {}", chat_id, e);
        }
    }
}
