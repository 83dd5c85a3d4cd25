/// New-token discovery
use async_trait::async_trait;

use crate::errors::BotResult;

/// Yields mints listed since the previous scan
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn scan_new_tokens(&self) -> BotResult<Vec<String>>;
}
