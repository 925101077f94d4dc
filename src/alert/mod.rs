pub mod telegram;

use async_trait::async_trait;

use crate::error::AlertError;

pub use telegram::TelegramNotifier;

/// Delivers a rendered message to a user. Callers log failures and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: &str, text: &str) -> Result<(), AlertError>;
}
