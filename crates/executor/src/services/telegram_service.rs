use std::env;

use teloxide::prelude::*;
use tokio::sync::broadcast;
use tracing::{error, info};

use common::models::DecisionEvent;

/// Pushes trade decisions to a Telegram chat. Optional: built only
/// when the bot credentials are present in the environment.
pub struct TelegramService {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramService {
    pub fn from_env() -> Option<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = env::var("TELEGRAM_CHAT_ID").ok()?.parse::<i64>().ok()?;

        Some(Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        })
    }

    pub async fn start(self, mut rx: broadcast::Receiver<DecisionEvent>) {
        info!("Starting Telegram Notification Service");

        loop {
            match rx.recv().await {
                Ok(event) => {
                    let msg = Self::format_decision(&event);
                    if let Err(e) = self.bot.send_message(self.chat_id, msg).await {
                        error!("Failed to send Telegram message: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    error!("Telegram service lagged behind. Missed {} decisions.", n);
                }
                Err(_) => {
                    info!("Decision channel closed. Stopping Telegram service.");
                    break;
                }
            }
        }
    }

    fn format_decision(event: &DecisionEvent) -> String {
        format!(
            "{} | news {} at {:.2} confidence over {} signals",
            event.decision, event.news_recommendation, event.news_confidence, event.total_signals
        )
    }
}
