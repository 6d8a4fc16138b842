use crate::error::AnalysisError;
use crate::llm::real::maybe_create_model_client;
use crate::llm::GenerativeModelClient;
use crate::prompt_composer;
use crate::prompts::SHIFT_SUMMARY_PROMPT;
use crate::response_parser;
use crate::shift_notes::{
    AnalysisResult, CareRecipientProfile, ShiftContext, ShiftNote,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const NO_NOTES_ANALYSIS: &str = "No shift notes available for analysis.";
pub const NO_NOTES_SUMMARY: &str = "No notes recorded for this shift.";

/// Analyzes shift notes with a generative model.
///
/// Constructing one is the only place configuration is checked; once built,
/// `analyze` and `summarize` never fail. Model errors are folded into the
/// returned value.
pub struct ShiftAnalyzer {
    client: Arc<dyn GenerativeModelClient>,
    model: String,
}

impl ShiftAnalyzer {
    pub fn new(client: Arc<dyn GenerativeModelClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    /// Build an analyzer backed by the real model endpoint.
    ///
    /// Returns [`AnalysisError::Configuration`] when no API key is available.
    pub fn from_config(
        api_key: Option<String>,
        api_base: Option<String>,
        model: &str,
    ) -> Result<Self, AnalysisError> {
        let client = maybe_create_model_client(api_key, api_base)?;
        Ok(Self::new(client, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(notes = notes.len(), model = %self.model))]
    pub async fn analyze(
        &self,
        notes: &[ShiftNote],
        recipient_name: Option<&str>,
        context: Option<&ShiftContext>,
        profile: Option<&CareRecipientProfile>,
    ) -> AnalysisResult {
        if notes.is_empty() {
            info!("No shift notes, skipping model call");
            return AnalysisResult::with_summary(NO_NOTES_ANALYSIS);
        }

        let prompt =
            prompt_composer::compose(notes, recipient_name, context, profile);
        info!("Requesting shift analysis ({} chars)", prompt.len());

        match self.client.generate(&self.model, &prompt).await {
            Ok(reply) => {
                let result = response_parser::parse(&reply);
                info!(
                    "Parsed analysis with {} suggestions and {} priorities",
                    result.suggestions.len(),
                    result.priorities.len()
                );
                result
            }
            Err(e) => {
                error!("Error calling generative model: {}", e);
                let cause = e.to_string();
                AnalysisResult {
                    summary: format!("Error analyzing notes: {}", cause),
                    error: Some(cause),
                    ..Default::default()
                }
            }
        }
    }

    /// Short free-text summary of the notes, returned as the model wrote it.
    #[instrument(skip_all, fields(notes = notes.len(), model = %self.model))]
    pub async fn summarize(&self, notes: &[ShiftNote]) -> String {
        if notes.is_empty() {
            info!("No shift notes, skipping model call");
            return NO_NOTES_SUMMARY.to_string();
        }

        let prompt = build_summary_prompt(notes);
        match self.client.generate(&self.model, &prompt).await {
            Ok(reply) => reply.trim().to_string(),
            Err(e) => {
                error!("Error generating summary: {}", e);
                format!("Error generating summary: {}", e)
            }
        }
    }
}

pub fn build_summary_prompt(notes: &[ShiftNote]) -> String {
    let notes_text = notes
        .iter()
        .map(|note| format!("- [{}]: {}", note.caregiver_name, note.content))
        .collect::<Vec<_>>()
        .join("\n");
    SHIFT_SUMMARY_PROMPT.replace("{notes}", &notes_text)
}
