use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ru,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Ru => write!(f, "ru"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ru" | "русский" => Ok(Language::Ru),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// Per-user monitoring settings, as persisted by the user store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub wallets: Vec<String>,
    /// `None` means "never alert"
    #[serde(default)]
    pub monitor_threshold: Option<f64>,
    /// Hours between repeated alerts for one position, 0 = alert once
    #[serde(default)]
    pub notification_interval: u64,
    #[serde(default)]
    pub monitoring_active: bool,
}

impl UserConfig {
    /// Health threshold below which alerts fire. `None` (never set, or not a
    /// finite number) means the user is never alerted.
    pub fn alert_threshold(&self) -> Option<f64> {
        self.monitor_threshold.filter(|t| t.is_finite())
    }

    pub fn has_wallets(&self) -> bool {
        !self.wallets.is_empty()
    }

    /// Replaces the wallet list from a comma separated user message
    pub fn set_wallets_from_text(&mut self, text: &str) {
        self.wallets = text
            .split(',')
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_sparse_json() {
        let config: UserConfig = serde_json::from_str(r#"{"wallets": ["0xA"]}"#).unwrap();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.alert_threshold(), None);
        assert_eq!(config.notification_interval, 0);
        assert!(!config.monitoring_active);
    }

    #[test]
    fn test_wallets_from_text() {
        let mut config = UserConfig::default();
        config.set_wallets_from_text(" 0xAbC, ,0xdef ,");
        assert_eq!(config.wallets, vec!["0xAbC".to_string(), "0xdef".to_string()]);
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("Русский".parse::<Language>().unwrap(), Language::Ru);
        assert!("de".parse::<Language>().is_err());
    }
}
