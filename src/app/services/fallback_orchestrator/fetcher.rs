//! Transport seam between the orchestrator and the network

use async_trait::async_trait;

use crate::Result;

/// Fetches one upstream document as UTF-8 text
///
/// Implementations own timeouts and status handling: a non-success status,
/// a timeout or an undecodable body is an `Error::Transport`.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
