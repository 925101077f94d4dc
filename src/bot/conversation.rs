use crate::i18n::{command_list, strings};
use crate::model::{Language, UserConfig};

/// Where a chat is in the settings dialogue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Conversation {
    #[default]
    Idle,
    AwaitingLanguage,
    AwaitingWallets,
    AwaitingThreshold,
    AwaitingInterval,
}

/// A parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Start,
    Set,
    Pos,
    Monitor,
    Stop,
    UnknownCommand(String),
    Text(String),
}

impl Input {
    /// `/cmd`, `/cmd@BotName` and `/cmd args` are commands, anything else is text
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let Some(command) = text.strip_prefix('/') else {
            return Input::Text(text.to_string());
        };

        let name = command
            .split_whitespace()
            .next()
            .and_then(|word| word.split('@').next())
            .unwrap_or_default()
            .to_lowercase();

        match name.as_str() {
            "start" => Input::Start,
            "set" => Input::Set,
            "pos" => Input::Pos,
            "monitor" => Input::Monitor,
            "stop" => Input::Stop,
            _ => Input::UnknownCommand(name),
        }
    }
}

/// Side effect the handler has to carry out after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SaveConfig,
    RegisterCommands,
    StartMonitor,
    SendReport,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub next: Conversation,
    pub reply: String,
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn new(next: Conversation, reply: impl Into<String>) -> Self {
        Self {
            next,
            reply: reply.into(),
            effects: Vec::new(),
        }
    }

    fn with(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

impl Conversation {
    /// Applies one message to the dialogue. `config` is updated in place;
    /// persisting it is left to the caller through `Effect::SaveConfig`.
    pub fn handle(self, input: &Input, config: &mut UserConfig) -> Outcome {
        let s = strings(config.language);

        match input {
            Input::Start => Outcome::new(Conversation::AwaitingLanguage, s.language_prompt),
            Input::Set => Outcome::new(Conversation::AwaitingWallets, s.wallets_prompt),
            Input::Pos if !config.has_wallets() => Outcome::new(Conversation::Idle, s.no_wallets),
            Input::Pos => Outcome::new(Conversation::Idle, s.request_sent).with(Effect::SendReport),
            Input::Monitor if !config.has_wallets() => Outcome::new(Conversation::Idle, s.no_wallets),
            Input::Monitor => Outcome::new(Conversation::AwaitingThreshold, s.threshold_prompt),
            Input::Stop => {
                config.monitoring_active = false;
                Outcome::new(Conversation::Idle, s.monitoring_stopped).with(Effect::SaveConfig)
            }
            Input::UnknownCommand(_) => Outcome::new(Conversation::Idle, s.unknown_command),
            Input::Text(text) => self.handle_text(text, config),
        }
    }

    fn handle_text(self, text: &str, config: &mut UserConfig) -> Outcome {
        let s = strings(config.language);

        match self {
            Conversation::Idle => Outcome::new(Conversation::Idle, s.unknown_command),
            Conversation::AwaitingLanguage => match text.parse::<Language>() {
                Ok(language) => {
                    config.language = language;
                    Outcome::new(Conversation::Idle, command_list(language))
                        .with(Effect::SaveConfig)
                        .with(Effect::RegisterCommands)
                }
                Err(_) => Outcome::new(self, s.language_prompt),
            },
            Conversation::AwaitingWallets => {
                config.set_wallets_from_text(text);
                if config.has_wallets() {
                    Outcome::new(Conversation::Idle, s.wallets_saved).with(Effect::SaveConfig)
                } else {
                    Outcome::new(self, s.wallets_prompt)
                }
            }
            Conversation::AwaitingThreshold => match text.trim().parse::<f64>() {
                Ok(threshold) if threshold.is_finite() => {
                    config.monitor_threshold = Some(threshold);
                    Outcome::new(Conversation::AwaitingInterval, s.interval_prompt).with(Effect::SaveConfig)
                }
                _ => Outcome::new(self, s.invalid_threshold),
            },
            Conversation::AwaitingInterval => match text.trim().parse::<u64>() {
                Ok(hours) => {
                    config.notification_interval = hours;
                    config.monitoring_active = true;
                    Outcome::new(Conversation::Idle, s.monitoring_started)
                        .with(Effect::SaveConfig)
                        .with(Effect::StartMonitor)
                }
                Err(_) => Outcome::new(self, s.invalid_interval),
            },
        }
    }
}
