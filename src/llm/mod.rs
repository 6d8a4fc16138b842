pub mod fake;
pub mod real;

use async_trait::async_trait;

use crate::error::AnalysisError;

/// A record of one prompt sent to a model, kept by the fake client.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model_name: String,
    pub prompt: String,
}

/// A trait that abstracts the generative-model endpoint
///
/// The analysis pipeline only needs "prompt in, text out". Implementations
/// must be safe to share between concurrent requests.
///
/// Implementation notes:
/// - Uses `async-trait` so the trait stays object safe behind `Arc<dyn _>`
/// - Every failure (transport, auth, quota, empty reply) is reported as
///   [`AnalysisError::ExternalService`] with the original message
#[async_trait]
pub trait GenerativeModelClient: Send + Sync {
    /// Sends `prompt` as the entire input and returns the model's text reply
    ///
    /// # Arguments
    /// * `model` - The model identifier (e.g., "gemini-2.5-flash")
    /// * `prompt` - The fully composed prompt
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<String, AnalysisError>;
}
