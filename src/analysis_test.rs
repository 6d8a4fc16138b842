#[cfg(test)]
mod tests {
    use crate::analysis::{
        build_summary_prompt, ShiftAnalyzer, NO_NOTES_ANALYSIS,
        NO_NOTES_SUMMARY,
    };
    use crate::error::AnalysisError;
    use crate::llm::fake::FakeGenerativeModel;
    use crate::shift_notes::{
        AnalysisResult, CareRecipientProfile, ShiftContext, ShiftNote,
    };
    use crate::test_utils::init_test_logging;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const MODEL: &str = "gemini-test";

    fn analyzer(client: Arc<FakeGenerativeModel>) -> ShiftAnalyzer {
        ShiftAnalyzer::new(client, MODEL)
    }

    fn notes() -> Vec<ShiftNote> {
        vec![
            ShiftNote::new(
                "Refused lunch, drank tea",
                "Alice",
                "2025-03-01 12:30",
            ),
            ShiftNote::new(
                "Unsteady walking to bathroom",
                "Bob",
                "2025-03-01 15:10",
            ),
        ]
    }

    #[tokio::test]
    async fn test_analyze_without_notes_makes_no_model_call() {
        init_test_logging();
        let client = Arc::new(FakeGenerativeModel::new());
        let result = analyzer(client.clone()).analyze(&[], None, None, None).await;

        assert_eq!(result, AnalysisResult::with_summary(NO_NOTES_ANALYSIS));
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_summarize_without_notes_makes_no_model_call() {
        init_test_logging();
        let client = Arc::new(FakeGenerativeModel::new());
        let summary = analyzer(client.clone()).summarize(&[]).await;

        assert_eq!(summary, NO_NOTES_SUMMARY);
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_parses_model_reply() {
        init_test_logging();
        let client = Arc::new(FakeGenerativeModel::new().with_response(
            "SUMMARY:\nAppetite was low and gait unsteady.\n\nSUGGESTIONS:\n- Offer small snacks\n- Use walker for transfers\n\nPRIORITIES:\n- Fall prevention",
        ));
        let context = ShiftContext {
            date: Some("2025-03-01".to_string()),
            shift_number: Some("2".to_string()),
            ..Default::default()
        };
        let profile = CareRecipientProfile {
            fall_risk: Some("High".to_string()),
            ..Default::default()
        };

        let result = analyzer(client.clone())
            .analyze(&notes(), Some("Mary Smith"), Some(&context), Some(&profile))
            .await;

        assert_eq!(result.summary, "Appetite was low and gait unsteady.");
        assert_eq!(
            result.suggestions,
            vec!["Offer small snacks", "Use walker for transfers"]
        );
        assert_eq!(result.priorities, vec!["Fall prevention"]);
        assert_eq!(result.error, None);

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model_name, MODEL);
        let prompt = &requests[0].prompt;
        assert!(prompt.contains("Care Recipient: Mary Smith"));
        assert!(prompt.contains("- Fall Risk: High"));
        assert!(prompt
            .contains("1. [Alice at 2025-03-01 12:30]: Refused lunch, drank tea"));
        assert!(prompt.contains(
            "2. [Bob at 2025-03-01 15:10]: Unsteady walking to bathroom"
        ));
    }

    #[tokio::test]
    async fn test_analyze_with_unstructured_reply_returns_empty_fields() {
        init_test_logging();
        let client = Arc::new(
            FakeGenerativeModel::new()
                .with_response("I'm sorry, I can't help with that."),
        );
        let result =
            analyzer(client).analyze(&notes(), None, None, None).await;

        assert_eq!(result, AnalysisResult::default());
    }

    #[tokio::test]
    async fn test_analyze_downgrades_model_failure() {
        init_test_logging();
        let client = Arc::new(
            FakeGenerativeModel::new().with_error("429 quota exceeded"),
        );
        let result =
            analyzer(client.clone()).analyze(&notes(), None, None, None).await;

        assert!(result.suggestions.is_empty());
        assert!(result.priorities.is_empty());
        assert_eq!(result.summary, "Error analyzing notes: 429 quota exceeded");
        assert_eq!(result.error.as_deref(), Some("429 quota exceeded"));
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn test_summarize_returns_trimmed_reply() {
        init_test_logging();
        let client = Arc::new(
            FakeGenerativeModel::new()
                .with_response("\n  Quiet shift with low appetite.  \n"),
        );
        let summary = analyzer(client.clone()).summarize(&notes()).await;

        assert_eq!(summary, "Quiet shift with low appetite.");
        let prompt = client.last_prompt().unwrap();
        assert!(prompt.contains("- [Alice]: Refused lunch, drank tea"));
        assert!(prompt.contains("- [Bob]: Unsteady walking to bathroom"));
    }

    #[tokio::test]
    async fn test_summarize_downgrades_model_failure() {
        init_test_logging();
        let client =
            Arc::new(FakeGenerativeModel::new().with_error("connection reset"));
        let summary = analyzer(client).summarize(&notes()).await;

        assert_eq!(summary, "Error generating summary: connection reset");
    }

    #[test]
    fn test_summary_prompt_lists_notes() {
        let prompt = build_summary_prompt(&notes());
        assert!(prompt.starts_with("Summarize these caregiver shift notes"));
        assert!(prompt.contains(
            "- [Alice]: Refused lunch, drank tea\n- [Bob]: Unsteady walking to bathroom"
        ));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let result = ShiftAnalyzer::from_config(None, None, MODEL);
        assert!(matches!(result, Err(AnalysisError::Configuration(_))));

        let analyzer =
            ShiftAnalyzer::from_config(Some("key".to_string()), None, MODEL)
                .unwrap();
        assert_eq!(analyzer.model(), MODEL);
    }
}
