use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical fallbacks for every optional ticket and context field.
pub mod defaults {
    pub const TICKET_ID: &str = "Unknown";
    pub const SUBJECT: &str = "Unidentified";
    pub const CUSTOMER_NAME: &str = "Customer_Name";
    pub const CUSTOMER_ROLE: &str = "";

    pub const FEATURE: &str = "the admin dashboard or admin functions";
    pub const ETA: &str = "As Soon As Possible";
    pub const BILLING_TOPIC: &str = "billing and payments";
    pub const EXPLANATION: &str = "We are reviewing your invoice and payment records.";
    pub const NEXT_STEPS: &str = "For the next steps, please verify billing details and contact \
        billing department. We would also discuss this query with the Billing and Account \
        Managers and get back to you soon.";
    pub const DIAGNOSIS_PREFIX: &str = "We are forwarding the error and diagnosis report to ";
    pub const RESOLUTION_STEPS_PREFIX: &str = "For the next steps, ";
    pub const EXPERTISE: &str = "General Support";
}

/// String-keyed bag of loosely typed values (ticket payloads, customer info,
/// responder context). Every read goes through a "lookup with named default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(Map<String, Value>);

impl FieldMap {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    pub fn map_or_empty(&self, key: &str) -> FieldMap {
        self.get(key)
            .cloned()
            .map(FieldMap::from_value)
            .unwrap_or_default()
    }
}
