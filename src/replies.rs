//! Builders for every message the bot sends.
//!
//! All builders are pure: they take the inbound data and return a fresh
//! [`OutboundReply`] without touching the transport.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use url::Url;

use crate::platform::{Button, OutboundReply, ParseMode, ReplyMarkup, TextMessage, WebAppPayload};

pub const DEFAULT_WEB_APP_URL: &str = "https://matibf99.github.io/telegram-web-app-bot-example/";

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %I:%M";

/// Users without a @username get an empty handle, not a placeholder
pub fn start(msg: &TextMessage) -> OutboundReply {
    let handle = msg.sender_handle.as_deref().unwrap_or_default();
    OutboundReply::new(msg.chat_id, format!("Hi, @{}!", handle))
}

pub fn inline_keyboard(msg: &TextMessage) -> OutboundReply {
    let rows = vec![
        vec![
            Button::callback("Acción 1", "acción 1"),
            Button::callback("Acción 2", "acción 2"),
        ],
        vec![Button::callback("Acción 3", "acción 3")],
    ];

    OutboundReply::new(msg.chat_id, "Select an option")
        .reply_markup(ReplyMarkup::InlineKeyboard(rows))
}

/// `/web-app`: launch button attached to the message
pub fn web_app_inline_keyboard(msg: &TextMessage, url: &Url) -> OutboundReply {
    let rows = vec![vec![Button::web_app("Open", url.clone())]];
    OutboundReply::new(msg.chat_id, "Open the web app")
        .reply_markup(ReplyMarkup::InlineKeyboard(rows))
}

/// Same launcher as [`web_app_inline_keyboard`], shown as a text keyboard
pub fn web_app_keyboard(msg: &TextMessage, url: &Url) -> OutboundReply {
    let rows = vec![vec![Button::web_app("Open", url.clone())]];
    OutboundReply::new(msg.chat_id, "Open the web app")
        .reply_markup(ReplyMarkup::ReplyKeyboard(rows))
}

/// Echo the message date as `dd/MM/yyyy hh:mm` in the given time zone.
///
/// Returns `None` if the timestamp is out of chrono's range.
pub fn timestamp<Tz>(msg: &TextMessage, tz: &Tz) -> Option<OutboundReply>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = DateTime::from_timestamp(msg.timestamp_seconds, 0)?.with_timezone(tz);
    Some(OutboundReply::new(
        msg.chat_id,
        time.format(TIMESTAMP_FORMAT).to_string(),
    ))
}

pub fn web_app_data(payload: &WebAppPayload) -> OutboundReply {
    OutboundReply::new(
        payload.chat_id,
        format!("Received:\n\n```\n{}\n```", payload.data),
    )
    .parse_mode(ParseMode::Markdown)
    .reply_markup(ReplyMarkup::RemoveKeyboard { selective: true })
}
