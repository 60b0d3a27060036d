use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    KeyboardRemove, ParseMode as TgParseMode, ReplyMarkup as TgReplyMarkup, UpdateKind, WebAppInfo,
};
use teloxide::RequestError;
use tracing::{info, warn};

use crate::dispatcher::UpdateDispatcher;
use crate::platform::{
    Button, ButtonAction, ButtonCallback, ChosenResult, DeliveryError, InboundUpdate,
    OutboundReply, ParseMode, ReplyMarkup, TextMessage, Transport, WebAppPayload,
};

/// Sends replies through the Telegram Bot API
pub struct TelegramTransport {
    bot: Bot,
    username: String,
}

impl TelegramTransport {
    /// Check the token with `getMe` and compare the reported username with the configured one
    pub async fn connect(bot: Bot, username: String) -> Result<Self> {
        let me = bot
            .get_me()
            .await
            .context("Failed to authenticate with Telegram (getMe)")?;

        match me.user.username.as_deref() {
            Some(actual) if actual != username => warn!(
                "Configured bot username @{} differs from Telegram's @{}",
                username, actual
            ),
            _ => info!("Authenticated as @{}", username),
        }

        Ok(Self { bot, username })
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(&self, reply: OutboundReply) -> Result<(), DeliveryError> {
        let mut request = self.bot.send_message(ChatId(reply.chat_id), reply.text);
        if let Some(mode) = reply.parse_mode {
            request = request.parse_mode(to_parse_mode(mode));
        }
        if let Some(markup) = &reply.reply_markup {
            request = request.reply_markup(to_reply_markup(markup));
        }

        request.await.map(|_| ()).map_err(to_delivery_error)
    }

    fn bot_username(&self) -> &str {
        &self.username
    }
}

/// Run long polling until Ctrl-C, feeding every update to the dispatcher
pub async fn run(bot: Bot, dispatcher: Arc<UpdateDispatcher<TelegramTransport>>) -> Result<()> {
    info!("Starting Telegram platform...");

    let handler = dptree::entry().endpoint(handle_update);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatcher])
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_update(
    upd: Update,
    dispatcher: Arc<UpdateDispatcher<TelegramTransport>>,
) -> ResponseResult<()> {
    dispatcher.handle(inbound_update(&upd)).await;
    Ok(())
}

/// Flatten a Telegram update into the platform-neutral shape
pub fn inbound_update(upd: &Update) -> InboundUpdate {
    let mut inbound = InboundUpdate {
        id: Some(upd.id.0),
        ..Default::default()
    };

    match &upd.kind {
        UpdateKind::Message(msg) => {
            inbound.text_message = msg.text().map(|text| TextMessage {
                chat_id: msg.chat.id.0,
                sender_handle: msg.from.as_ref().and_then(|u| u.username.clone()),
                text: text.to_string(),
                timestamp_seconds: msg.date.timestamp(),
            });
            inbound.web_app_payload = msg.web_app_data().map(|data| WebAppPayload {
                chat_id: msg.chat.id.0,
                data: data.data.clone(),
            });
        }
        UpdateKind::CallbackQuery(query) => {
            inbound.button_callback = Some(ButtonCallback {
                message_text: query
                    .message
                    .as_ref()
                    .and_then(|m| m.regular_message())
                    .and_then(|m| m.text())
                    .map(str::to_string),
                data: query.data.clone(),
            });
        }
        UpdateKind::ChosenInlineResult(result) => {
            inbound.chosen_result = Some(ChosenResult {
                result_id: result.result_id.to_string(),
            });
        }
        _ => {}
    }

    inbound
}

fn to_parse_mode(mode: ParseMode) -> TgParseMode {
    match mode {
        #[allow(deprecated)]
        ParseMode::Markdown => TgParseMode::Markdown,
    }
}

fn to_reply_markup(markup: &ReplyMarkup) -> TgReplyMarkup {
    match markup {
        ReplyMarkup::InlineKeyboard(rows) => TgReplyMarkup::InlineKeyboard(
            InlineKeyboardMarkup::new(rows.iter().map(|row| row.iter().map(inline_button))),
        ),
        ReplyMarkup::ReplyKeyboard(rows) => TgReplyMarkup::Keyboard(KeyboardMarkup::new(
            rows.iter().map(|row| row.iter().map(keyboard_button)),
        )),
        ReplyMarkup::RemoveKeyboard { selective } => {
            let remove = KeyboardRemove::new();
            TgReplyMarkup::KeyboardRemove(if *selective { remove.selective() } else { remove })
        }
    }
}

fn inline_button(button: &Button) -> InlineKeyboardButton {
    match &button.action {
        ButtonAction::Callback(data) => InlineKeyboardButton::callback(&button.label, data),
        ButtonAction::WebApp(url) => {
            InlineKeyboardButton::web_app(&button.label, WebAppInfo { url: url.clone() })
        }
    }
}

fn keyboard_button(button: &Button) -> KeyboardButton {
    let plain = KeyboardButton::new(&button.label);
    match &button.action {
        ButtonAction::WebApp(url) => {
            plain.request(ButtonRequest::WebApp(WebAppInfo { url: url.clone() }))
        }
        // Text keyboards have no callback data; pressing sends the label
        ButtonAction::Callback(_) => plain,
    }
}

fn to_delivery_error(err: RequestError) -> DeliveryError {
    match err {
        RequestError::Network(_) | RequestError::Io(_) => DeliveryError::Network(err.to_string()),
        other => DeliveryError::Rejected(other.to_string()),
    }
}
