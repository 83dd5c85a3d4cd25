//! Telegram delivery through teloxide

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

use super::{Notification, Notifier};
use crate::config::TelegramConfig;
use crate::errors::{BotError, BotResult};
use crate::logger::{self, LogTag};

pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: &str) -> BotResult<Self> {
        if bot_token.is_empty() {
            return Err(BotError::Config("Telegram bot token is empty".to_string()));
        }
        if chat_id.is_empty() {
            return Err(BotError::Config("Telegram chat ID is empty".to_string()));
        }

        let chat_id_parsed: i64 = chat_id
            .parse()
            .map_err(|e| BotError::Config(format!("Invalid chat ID '{}': {}", chat_id, e)))?;

        Ok(Self {
            bot: Bot::new(bot_token),
            chat_id: ChatId(chat_id_parsed),
        })
    }

    pub fn from_config(config: &TelegramConfig) -> BotResult<Self> {
        Self::new(&config.bot_token, &config.chat_id)
    }

    pub async fn send_message(&self, message: &str) -> BotResult<()> {
        self.bot
            .send_message(self.chat_id, message)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| BotError::api("telegram", format!("send failed: {}", e)))?;

        logger::debug(
            LogTag::Telegram,
            &format!("Sent Telegram notification (length={})", message.len()),
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, notification: &Notification) -> BotResult<()> {
        self.send_message(&notification.to_html()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_credentials() {
        assert!(TelegramNotifier::new("", "1").is_err());
        assert!(TelegramNotifier::new("token", "").is_err());
        assert!(TelegramNotifier::new("token", "not-a-number").is_err());
    }
}
