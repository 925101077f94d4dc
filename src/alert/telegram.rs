use async_trait::async_trait;
use teloxide::prelude::*;

use crate::alert::Notifier;
use crate::error::AlertError;

/// Sends alerts as plain-text Telegram messages. The user id is the chat id.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Parses a stored user id back into a Telegram chat id
    pub fn chat_id(user_id: &str) -> Result<ChatId, AlertError> {
        user_id
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| AlertError::InvalidRecipient(user_id.to_string()))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, user_id: &str, text: &str) -> Result<(), AlertError> {
        let chat_id = Self::chat_id(user_id)?;
        self.bot.send_message(chat_id, text).await?;
        Ok(())
    }
}
