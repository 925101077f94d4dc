use std::collections::HashMap;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tokio::sync::Mutex;

use crate::bot::conversation::{Conversation, Effect, Input};
use crate::i18n::strings;
use crate::model::Language;
use crate::monitor::MonitorSupervisor;
use crate::storage::UserStore;

/// Shared by every update handler
pub struct BotState {
    store: Arc<dyn UserStore>,
    supervisor: Arc<MonitorSupervisor>,
    conversations: Mutex<HashMap<ChatId, Conversation>>,
}

impl BotState {
    pub fn new(store: Arc<dyn UserStore>, supervisor: Arc<MonitorSupervisor>) -> Self {
        Self {
            store,
            supervisor,
            conversations: Mutex::new(HashMap::new()),
        }
    }

    async fn conversation(&self, chat_id: ChatId) -> Conversation {
        self.conversations
            .lock()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }

    async fn set_conversation(&self, chat_id: ChatId, next: Conversation) {
        let mut conversations = self.conversations.lock().await;
        if next == Conversation::Idle {
            conversations.remove(&chat_id);
        } else {
            conversations.insert(chat_id, next);
        }
    }
}

/// Command menu shown by Telegram clients
pub fn bot_commands(language: Language) -> Vec<BotCommand> {
    let s = strings(language);
    vec![
        BotCommand::new("set", s.set_command),
        BotCommand::new("pos", s.pos_command),
        BotCommand::new("monitor", s.monitor_command),
        BotCommand::new("stop", s.stop_command),
    ]
}

/// Handles incoming messages until the process is interrupted
pub async fn run(bot: Bot, state: Arc<BotState>) {
    if let Err(e) = bot.set_my_commands(bot_commands(Language::En)).await {
        warn!("Failed to register bot commands: {}", e);
    }

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    match msg.text() {
        Some(text) => process_text(&bot, &state, msg.chat.id, text).await,
        None => Ok(()),
    }
}

/// Runs one text message through the dialogue. Every persistent effect is
/// applied before the reply goes out, so a failed send never leaves a saved
/// setting without its monitor.
async fn process_text(bot: &Bot, state: &BotState, chat_id: ChatId, text: &str) -> ResponseResult<()> {
    let user_id = chat_id.to_string();
    let input = Input::parse(text);

    let mut config = state.store.get(&user_id).await.unwrap_or_default();
    let outcome = state.conversation(chat_id).await.handle(&input, &mut config);
    state.set_conversation(chat_id, outcome.next).await;

    debug!("User {} sent {:?}, now {:?}", user_id, input, outcome.next);

    if outcome.effects.contains(&Effect::SaveConfig) {
        if let Err(e) = state.store.save(&user_id, config.clone()).await {
            error!("❌ Failed to save settings of user {}: {}", user_id, e);
        }
    }

    if outcome.effects.contains(&Effect::StartMonitor) && state.supervisor.start(&user_id).await {
        info!("User {} enabled monitoring", user_id);
    }

    if outcome.effects.contains(&Effect::RegisterCommands) {
        if let Err(e) = bot.set_my_commands(bot_commands(config.language)).await {
            warn!("Failed to register bot commands: {}", e);
        }
    }

    let sent = bot.send_message(chat_id, &outcome.reply).await?;

    if outcome.effects.contains(&Effect::SendReport) {
        let report = state.supervisor.position_report(&config).await;
        bot.edit_message_text(chat_id, sent.id, report).await?;
    }

    Ok(())
}
