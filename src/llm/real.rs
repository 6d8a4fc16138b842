use crate::error::AnalysisError;
use crate::llm::GenerativeModelClient;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Gemini's OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_API_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/";

// Talks to any OpenAI-compatible chat-completions endpoint
pub struct RealGenerativeModel {
    client: Client<OpenAIConfig>,
}

impl RealGenerativeModel {
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }
}

/// Build a client from configuration, failing when no API key is set.
pub fn maybe_create_model_client(
    api_key: Option<String>,
    api_base: Option<String>,
) -> Result<Arc<dyn GenerativeModelClient>, AnalysisError> {
    let api_key = api_key
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            AnalysisError::Configuration(
                "GEMINI_API_KEY is not set; add it to your .env file or environment"
                    .to_string(),
            )
        })?;
    let api_base = api_base
        .filter(|base| !base.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let config = OpenAIConfig::new()
        .with_api_base(api_base)
        .with_api_key(api_key);
    Ok(Arc::new(RealGenerativeModel::new(Client::with_config(config))))
}

#[async_trait]
impl GenerativeModelClient for RealGenerativeModel {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<String, AnalysisError> {
        let user_message = ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| {
                    AnalysisError::external(format!(
                        "Failed to build user message: {}",
                        e
                    ))
                })?,
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages([user_message])
            .build()
            .map_err(|e| {
                AnalysisError::external(format!(
                    "Failed to build request message: {}",
                    e
                ))
            })?;

        let response =
            self.client.chat().create(request).await.map_err(|e| {
                AnalysisError::external(format!(
                    "Failed to create chat completion: {}",
                    e
                ))
            })?;

        debug!("Received {} choices", response.choices.len());
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AnalysisError::external("Model returned an empty response")
            })
    }
}
