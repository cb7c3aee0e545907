//! Telegram Bot API transport over plain HTTP GET requests.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ChatTransport, Update, UpdateKind};
use crate::error::{BotError, Result};

// --- Bot API wire types ---

#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUpdate {
    #[serde(default)]
    message: Option<TgMessage>,
    #[serde(default)]
    edited_message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
    #[serde(default)]
    text: Option<String>,
    // The API sends both names for the same user
    #[serde(default)]
    left_chat_participant: Option<TgUser>,
    #[serde(default)]
    left_chat_member: Option<TgUser>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    first_name: String,
}

pub struct TelegramClient {
    client: reqwest::Client,
    api_base_url: String,
    token: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(api_base_url: &str, token: &str, poll_timeout_secs: u64) -> Self {
        // No client-side timeout: getUpdates blocks for up to poll_timeout_secs on the server
        Self {
            client: reqwest::Client::new(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            poll_timeout_secs,
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base_url, self.token, method)
    }

    /// Same as `api_url` but safe to log
    fn masked_url(&self, method: &str) -> String {
        format!("{}/bot<token>/{}", self.api_base_url, method)
    }

    fn get_updates_request(&self, offset: Option<i64>) -> Result<reqwest::Request> {
        let mut query = vec![("timeout", self.poll_timeout_secs.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        Ok(self
            .client
            .get(self.api_url("getUpdates"))
            .query(&query)
            .build()?)
    }

    fn send_message_request(&self, chat_id: i64, text: &str) -> Result<reqwest::Request> {
        Ok(self
            .client
            .get(self.api_url("sendMessage"))
            .query(&[("text", text.to_string()), ("chat_id", chat_id.to_string())])
            .build()?)
    }

    async fn execute(&self, request: reqwest::Request) -> Result<TgResponse> {
        let response = self.client.execute(request).await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: TgResponse = serde_json::from_str(&body).map_err(|e| {
            BotError::Transport(format!("non-JSON response (HTTP {}): {}", status, e))
        })?;

        if !status.is_success() || !parsed.ok {
            return Err(BotError::Transport(format!(
                "Bot API error ({}): {}",
                status,
                parsed.description.as_deref().unwrap_or("no description")
            )));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn fetch_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        debug!("GET {} offset={:?}", self.masked_url("getUpdates"), offset);
        let request = self.get_updates_request(offset)?;
        let response = self.execute(request).await?;

        let raw_updates = match response.result {
            Some(serde_json::Value::Array(items)) => items,
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(other) => {
                return Err(BotError::Transport(format!(
                    "getUpdates result is not a list: {}",
                    other
                )))
            }
        };

        let updates = raw_updates
            .into_iter()
            .filter_map(|raw| match decode_update(raw) {
                Ok(update) => Some(update),
                Err(e) => {
                    warn!("Dropping update: {}", e);
                    None
                }
            })
            .collect();

        Ok(updates)
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        debug!("GET {} chat_id={}", self.masked_url("sendMessage"), chat_id);
        let request = self.send_message_request(chat_id, text)?;
        self.execute(request).await?;
        Ok(())
    }
}

/// Decode one raw update into a closed set of variants.
///
/// Only a missing `update_id` is an error, because without it the cursor
/// cannot move past the update. Anything else that fails to decode becomes
/// `Unrecognized` so the batch keeps going.
fn decode_update(raw: serde_json::Value) -> Result<Update> {
    let id = raw
        .get("update_id")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| BotError::MalformedEvent(format!("no update_id in {}", raw)))?;

    let kind = match serde_json::from_value::<TgUpdate>(raw) {
        Ok(update) => classify(update),
        Err(e) => {
            warn!("{}", BotError::MalformedEvent(format!("update {}: {}", id, e)));
            UpdateKind::Unrecognized
        }
    };

    Ok(Update { id, kind })
}

fn classify(update: TgUpdate) -> UpdateKind {
    if let Some(edited) = update.edited_message {
        return UpdateKind::Edited {
            chat_id: edited.chat.id,
        };
    }

    let Some(message) = update.message else {
        return UpdateKind::Unrecognized;
    };
    let chat_id = message.chat.id;

    if let Some(user) = message.left_chat_participant.or(message.left_chat_member) {
        UpdateKind::Departure {
            chat_id,
            name: user.first_name,
        }
    } else if let Some(text) = message.text {
        UpdateKind::Text { chat_id, text }
    } else {
        UpdateKind::Unrecognized
    }
}
