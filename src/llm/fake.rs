use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::AnalysisError;
use crate::llm::{GenerativeModelClient, ModelRequest};

/// A fake generative model for testing
///
/// Replies are queued with the builder methods and handed out in order. Once
/// the queue is empty a fixed default reply is returned. Every prompt is
/// recorded so tests can check what was sent, or that nothing was.
///
/// # Example
///
/// ```
/// use carelog::llm::GenerativeModelClient;
/// use carelog::llm::fake::FakeGenerativeModel;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = FakeGenerativeModel::new()
///         .with_response("SUMMARY: Quiet shift.")
///         .with_error("quota exceeded");
///
///     let reply = client.generate("gemini-2.5-flash", "Summarize").await?;
///     assert_eq!(reply, "SUMMARY: Quiet shift.");
///
///     let failure = client.generate("gemini-2.5-flash", "Summarize").await;
///     assert!(failure.is_err());
///     assert_eq!(client.request_count(), 2);
///     Ok(())
/// }
/// ```
pub struct FakeGenerativeModel {
    responses: Mutex<Vec<Result<String, String>>>,
    // Track requests for verification in tests
    pub requests: Mutex<Vec<ModelRequest>>,
}

pub const DEFAULT_FAKE_RESPONSE: &str = "Fake default response";

impl Default for FakeGenerativeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGenerativeModel {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(vec![]),
            requests: Mutex::new(vec![]),
        }
    }

    /// Queue a successful reply
    pub fn with_response(self, response: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Ok(response.to_string()));
        self
    }

    /// Queue a failure carrying `message`
    pub fn with_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Err(message.to_string()));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The prompt of the most recent request, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|request| request.prompt.clone())
    }
}

#[async_trait]
impl GenerativeModelClient for FakeGenerativeModel {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<String, AnalysisError> {
        self.requests.lock().unwrap().push(ModelRequest {
            model_name: model.to_string(),
            prompt: prompt.to_string(),
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(DEFAULT_FAKE_RESPONSE.to_string());
        }
        responses.remove(0).map_err(AnalysisError::ExternalService)
    }
}
