use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::analysis::{Analysis, Priority};
use crate::domain::fields::{FieldMap, defaults};
use crate::domain::response::ResponseSuggestion;
use crate::domain::template::{FALLBACK_TEMPLATE, TemplateSet};
use crate::services::TemplateRenderer;

pub const TEMPLATE_ERROR_TEXT: &str = "Error formatting response template.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsePolicy {
    pub base_confidence: f64,
    pub key_point_penalty: f64,
    pub key_point_floor: f64,
    pub urgent_factor: f64,
    pub approval_threshold: f64,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self {
            base_confidence: 0.95,
            key_point_penalty: 0.05,
            key_point_floor: 0.7,
            urgent_factor: 0.88,
            approval_threshold: 0.80,
        }
    }
}

impl ResponsePolicy {
    pub fn key_points_factor(&self, key_points: usize) -> f64 {
        (1.0 - key_points as f64 * self.key_point_penalty).max(self.key_point_floor)
    }

    pub fn urgency_factor(&self, priority: Priority) -> f64 {
        if priority == Priority::Urgent {
            self.urgent_factor
        } else {
            1.0
        }
    }

    pub fn confidence(&self, analysis: &Analysis) -> f64 {
        self.base_confidence
            * self.key_points_factor(analysis.key_points.len())
            * analysis.sentiment
            * self.urgency_factor(analysis.priority)
    }

    pub fn requires_approval(&self, confidence: f64) -> bool {
        confidence.is_nan() || confidence < self.approval_threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseTables {
    pub actions: BTreeMap<String, Vec<String>>,
    pub fallback_actions: Vec<String>,
}

impl Default for ResponseTables {
    fn default() -> Self {
        let actions = [
            (
                "access_issue",
                "please reset your password and check user permissions with system \
                 administrator while the support team looks into the issue from their end.",
            ),
            (
                "billing_inquiry",
                "please verify billing details and contact billing department. We would also \
                 discuss this query with the Billing Manager and get back to you.",
            ),
            (
                "technical_issue",
                "contact technical support and note down the error logs. The support team is \
                 already looking into the problem and will get back to you with a solution soon.",
            ),
            (
                "feature_request",
                "please forward all product feature requests to customer relations team and \
                 they would review it.",
            ),
            (
                "general_response",
                "we are looking into the problem and would get back to you soon.",
            ),
        ]
        .into_iter()
        .map(|(key, action)| (key.to_string(), vec![action.to_string()]))
        .collect();

        Self {
            actions,
            fallback_actions: vec![
                "Review ticket/error details and please contact customer support".to_string(),
            ],
        }
    }
}

impl ResponseTables {
    pub fn actions_for(&self, response_type: &str) -> Vec<String> {
        self.actions
            .get(response_type)
            .filter(|actions| !actions.is_empty())
            .cloned()
            .unwrap_or_else(|| self.fallback_actions.clone())
    }
}

pub struct Responder {
    policy: ResponsePolicy,
    tables: ResponseTables,
    renderer: Arc<dyn TemplateRenderer>,
}

impl Responder {
    pub fn new(
        policy: ResponsePolicy,
        tables: ResponseTables,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            policy,
            tables,
            renderer,
        }
    }

    pub async fn generate(
        &self,
        analysis: &Analysis,
        templates: &TemplateSet,
        context: &FieldMap,
    ) -> ResponseSuggestion {
        let response_type = analysis.suggested_response_type.as_str();
        let template = templates.get(response_type).unwrap_or(FALLBACK_TEMPLATE);

        let confidence_score = self.policy.confidence(analysis);
        let requires_approval = self.policy.requires_approval(confidence_score);
        let suggested_actions = self.tables.actions_for(response_type);

        let values = placeholder_values(analysis, context, &suggested_actions);
        let response_text = match self.renderer.render(template, &values).await {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, response_type, "response template could not be rendered");
                TEMPLATE_ERROR_TEXT.to_string()
            }
        };

        ResponseSuggestion {
            response_text,
            confidence_score,
            requires_approval,
            suggested_actions,
        }
    }
}

fn placeholder_values(analysis: &Analysis, context: &FieldMap, actions: &[String]) -> FieldMap {
    let expert = analysis
        .required_expertise
        .first()
        .map(String::as_str)
        .unwrap_or(defaults::EXPERTISE);
    let first_action = actions.first().map(String::as_str).unwrap_or_default();

    let computed = [
        ("name", defaults::CUSTOMER_NAME.to_string()),
        ("feature", defaults::FEATURE.to_string()),
        ("diagnosis", format!("{}{expert}", defaults::DIAGNOSIS_PREFIX)),
        (
            "resolution_steps",
            format!("{}{first_action}", defaults::RESOLUTION_STEPS_PREFIX),
        ),
        ("priority_level", analysis.priority.name().to_string()),
        ("eta", defaults::ETA.to_string()),
        ("billing_topic", defaults::BILLING_TOPIC.to_string()),
        ("explanation", defaults::EXPLANATION.to_string()),
        ("next_steps", defaults::NEXT_STEPS.to_string()),
    ];

    let mut values = FieldMap::new();
    for (name, default) in computed {
        values.insert(name, context.text_or(name, &default));
    }
    values
}
