use crate::Result;

/// Fetches raw page bodies. Implemented over HTTP by
/// [`FfvbClient`](crate::sources::ffvb::FfvbClient).
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
