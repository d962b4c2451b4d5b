use serde::Serialize;

/// One item proposed by the vision model, after sanitization: name clipped
/// to 80 chars, category to 40, confidence clamped into 0..=1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSuggestion {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
