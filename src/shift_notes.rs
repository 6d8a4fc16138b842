use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A free-text observation logged by a caregiver during a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftNote {
    pub content: String,
    pub caregiver_name: String,
    pub timestamp: String,
}

impl ShiftNote {
    pub fn new(
        content: impl Into<String>,
        caregiver_name: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            caregiver_name: caregiver_name.into(),
            timestamp: timestamp.into(),
        }
    }
}

// Shifts are stored with either start/end times or a day number depending on
// where they were recorded, so all of these keys are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftContext {
    #[serde(deserialize_with = "lenient_text")]
    pub shift_number: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub day: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub start_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub end_time: Option<String>,
}

/// Personal-care preferences and safety attributes for one care recipient.
///
/// Every attribute is optional and free text. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareRecipientProfile {
    // Identity
    #[serde(deserialize_with = "lenient_text")]
    pub preferred_address: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub age: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub birthday: Option<String>,

    // Daily routine
    #[serde(deserialize_with = "lenient_text")]
    pub wake_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub breakfast_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub lunch_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub dinner_time: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub bedtime: Option<String>,

    // Communication
    #[serde(deserialize_with = "lenient_text")]
    pub speech_pace: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub hearing_status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub visual_cues: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub instruction_style: Option<String>,

    // Diet and medication
    #[serde(deserialize_with = "lenient_text")]
    pub dietary_notes: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub medication_notes: Option<String>,

    // Support needs
    #[serde(deserialize_with = "lenient_text")]
    pub mobility_support: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sensory_support: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub memory_support: Option<String>,

    // Safety
    #[serde(deserialize_with = "lenient_text")]
    pub fall_risk: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub allergies: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub medical_conditions: Option<String>,

    // Interests
    #[serde(deserialize_with = "lenient_text")]
    pub hobbies: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub favorite_topics: Option<String>,

    // Boundaries
    #[serde(deserialize_with = "lenient_text")]
    pub privacy_preferences: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sensitive_topics: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub independence_preferences: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub physical_comfort: Option<String>,
}

/// Structured analysis returned to clients.
///
/// `summary`, `suggestions` and `priorities` are always serialized; `error`
/// only appears when the model call failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }
}

// Stored profiles come from several writers; numbers, booleans and lists are
// kept as text rather than rejecting the whole record.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_text))
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => {
            let items: Vec<String> =
                items.into_iter().filter_map(value_text).collect();
            Some(items.join(", "))
        }
        other @ Value::Object(_) => Some(other.to_string()),
    }
}

/// Returns the trimmed value when the field carries any text.
pub fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
