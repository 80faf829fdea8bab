use async_trait::async_trait;
use futures::stream::BoxStream;

use super::prompt::PromptRequest;
use crate::error::UpstreamError;

/// Increments of generated text, in the order the backend produced them.
pub type TokenStream = BoxStream<'static, Result<String, UpstreamError>>;

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Starts one streaming generation.
    async fn open(&self, request: &PromptRequest) -> Result<TokenStream, UpstreamError>;
}
