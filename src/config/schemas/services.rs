/// Notification and admin service configuration
use crate::config_struct;

config_struct! {
    pub struct TelegramConfig {
        enabled: bool = false,
        /// Bot token from @BotFather
        bot_token: String = String::new(),
        /// Numeric chat id receiving notifications
        chat_id: String = String::new(),
    }
}

config_struct! {
    pub struct WebserverConfig {
        enabled: bool = false,
        host: String = "127.0.0.1".to_string(),
        port: u16 = 8080,
    }
}
