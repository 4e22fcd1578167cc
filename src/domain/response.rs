use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSuggestion {
    pub response_text: String,
    pub confidence_score: f64,
    pub requires_approval: bool,
    pub suggested_actions: Vec<String>,
}
