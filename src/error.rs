use thiserror::Error;

/// Errors raised by the shift-notes analysis pipeline.
///
/// `Configuration` is only produced while building a
/// [`ShiftAnalyzer`](crate::analysis::ShiftAnalyzer); callers treat it as
/// "feature unavailable". `ExternalService` covers every failure of the
/// generative-model call and is downgraded by the analyzer into a valid result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    ExternalService(String),
}

impl AnalysisError {
    pub fn external(cause: impl std::fmt::Display) -> Self {
        AnalysisError::ExternalService(cause.to_string())
    }
}
