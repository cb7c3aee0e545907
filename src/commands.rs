use crate::error::Result;
use crate::state::ChatStateStore;

pub const GREETING: &str = "I was born ready.";
pub const UNKNOWN_COMMAND: &str = "That command I do not know.";
pub const NOBODY_LEFT: &str = "Nobody has ever left this chat.";
pub const HELP: &str = "Commands:\n\
    /start - standard command, not useful for anything atm\n\
    /help - returns help message, you are reading it now\n\
    /last - last user that left the chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Last,
    Unknown,
}

impl Command {
    /// Case-sensitive prefix match, so "/start@my_bot" is still `Start`
    pub fn parse(text: &str) -> Self {
        if text.starts_with("/start") {
            Command::Start
        } else if text.starts_with("/help") {
            Command::Help
        } else if text.starts_with("/last") {
            Command::Last
        } else {
            Command::Unknown
        }
    }
}

/// Reply for a slash command sent to `chat_id`
pub async fn process(text: &str, chat_id: i64, store: &ChatStateStore) -> Result<String> {
    let reply = match Command::parse(text) {
        Command::Start => GREETING.to_string(),
        Command::Help => HELP.to_string(),
        Command::Last => store
            .last_departure(chat_id)
            .await?
            .unwrap_or_else(|| NOBODY_LEFT.to_string()),
        Command::Unknown => UNKNOWN_COMMAND.to_string(),
    };
    Ok(reply)
}
