use serde::Serialize;
use serde_json::Value;

use crate::domain::analysis::Analysis;
use crate::domain::fields::{FieldMap, defaults};
use crate::domain::response::ResponseSuggestion;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct TicketInput {
    fields: FieldMap,
}

impl TicketInput {
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }

    pub fn from_value(value: Value) -> Self {
        Self::new(FieldMap::from_value(value))
    }

    pub fn id(&self) -> String {
        self.fields.text_or("id", defaults::TICKET_ID)
    }

    pub fn subject(&self) -> String {
        self.fields.text_or("subject", defaults::SUBJECT)
    }

    pub fn content(&self) -> AppResult<&str> {
        match self.fields.get("content") {
            Some(Value::String(content)) => Ok(content),
            Some(other) => Err(AppError::Ticket(format!(
                "content must be text, found {}",
                json_kind(other)
            ))),
            None => Err(AppError::Ticket("ticket has no content".to_string())),
        }
    }

    pub fn customer_info(&self) -> FieldMap {
        self.fields.map_or_empty("customer_info")
    }

    pub fn customer_name(&self) -> String {
        self.customer_info().text_or("name", defaults::CUSTOMER_NAME)
    }

    pub fn content_digest(&self) -> String {
        let content = self.content().unwrap_or_default();
        let hash = blake3::hash(content.as_bytes());
        hash.to_hex().as_str()[..12].to_string()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub ticket_id: String,
    pub analysis: Analysis,
    pub response: ResponseSuggestion,
}
