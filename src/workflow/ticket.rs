use tracing::{info, warn};

use crate::domain::analysis::{Analysis, BusinessImpact, Category, Priority};
use crate::domain::fields::FieldMap;
use crate::domain::response::ResponseSuggestion;
use crate::domain::template::{GENERAL_RESPONSE, TemplateSet};
use crate::domain::ticket::{Resolution, TicketInput};
use crate::error::AppResult;
use crate::workflow::classifier::Classifier;
use crate::workflow::responder::Responder;

pub const FALLBACK_RESPONSE_TEXT: &str = "An error occurred while processing the ticket.";

pub struct TicketProcessor {
    classifier: Classifier,
    responder: Responder,
}

impl TicketProcessor {
    pub fn new(classifier: Classifier, responder: Responder) -> Self {
        Self {
            classifier,
            responder,
        }
    }

    pub async fn process(&self, ticket: &TicketInput, templates: &TemplateSet) -> Resolution {
        let ticket_id = ticket.id();
        match self.try_process(ticket, templates).await {
            Ok(resolution) => {
                info!(
                    ticket_id = %resolution.ticket_id,
                    content_digest = %ticket.content_digest(),
                    category = %resolution.analysis.category,
                    priority = %resolution.analysis.priority,
                    confidence = resolution.response.confidence_score,
                    requires_approval = resolution.response.requires_approval,
                    "ticket processed"
                );
                resolution
            }
            Err(error) => {
                warn!(%ticket_id, %error, "ticket processing failed, using fallback resolution");
                fallback_resolution(ticket_id)
            }
        }
    }

    pub async fn try_process(
        &self,
        ticket: &TicketInput,
        templates: &TemplateSet,
    ) -> AppResult<Resolution> {
        let content = ticket.content()?;
        let customer_info = ticket.customer_info();

        let analysis = self.classifier.analyze(content, Some(&customer_info)).await;
        let context = response_context(ticket);
        let response = self.responder.generate(&analysis, templates, &context).await;

        Ok(Resolution {
            ticket_id: ticket.id(),
            analysis,
            response,
        })
    }
}

fn response_context(ticket: &TicketInput) -> FieldMap {
    let mut context = FieldMap::new();
    context.insert("subject", ticket.subject());
    context.insert("name", ticket.customer_name());
    context
}

pub fn fallback_resolution(ticket_id: String) -> Resolution {
    Resolution {
        ticket_id,
        analysis: Analysis {
            category: Category::Technical,
            priority: Priority::Low,
            key_points: Vec::new(),
            required_expertise: vec!["Error Handling".to_string()],
            sentiment: 0.0,
            urgency_indicators: Vec::new(),
            business_impact: BusinessImpact::Low,
            suggested_response_type: GENERAL_RESPONSE.to_string(),
            follow_up_prediction: None,
        },
        response: ResponseSuggestion {
            response_text: FALLBACK_RESPONSE_TEXT.to_string(),
            confidence_score: 0.0,
            requires_approval: true,
            suggested_actions: vec![
                "Review error logs".to_string(),
                "Contact system administrator".to_string(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::AppResult;
    use crate::infra::{TeraTemplateRenderer, VaderSentimentScorer};
    use crate::services::SentimentScorer;
    use crate::workflow::responder::{ResponsePolicy, ResponseTables};
    use crate::workflow::vocabulary::Vocabulary;

    struct FixedScorer(f64);

    #[async_trait]
    impl SentimentScorer for FixedScorer {
        async fn compound(&self, _text: &str) -> AppResult<f64> {
            Ok(self.0)
        }
    }

    fn processor_with(scorer: Arc<dyn SentimentScorer>) -> TicketProcessor {
        TicketProcessor::new(
            Classifier::new(Vocabulary::default(), scorer),
            Responder::new(
                ResponsePolicy::default(),
                ResponseTables::default(),
                Arc::new(TeraTemplateRenderer::new()),
            ),
        )
    }

    fn processor() -> TicketProcessor {
        processor_with(Arc::new(VaderSentimentScorer::new()))
    }

    #[tokio::test]
    async fn missing_content_yields_fallback_resolution() {
        let ticket = TicketInput::from_value(json!({
            "id": "TKT-007",
            "subject": "Empty ticket",
            "customer_info": { "role": "User", "name": "Jane Doe" }
        }));

        let resolution = processor().process(&ticket, &TemplateSet::builtin()).await;

        assert_eq!(resolution.ticket_id, "TKT-007");
        assert_eq!(resolution.analysis.category, Category::Technical);
        assert_eq!(resolution.analysis.priority, Priority::Low);
        assert_eq!(resolution.analysis.required_expertise, vec!["Error Handling"]);
        assert!(resolution.response.response_text.to_lowercase().contains("error"));
        assert_eq!(resolution.response.confidence_score, 0.0);
        assert!(resolution.response.requires_approval);
    }

    #[tokio::test]
    async fn malformed_tickets_degrade_instead_of_failing() {
        let processor = processor();
        let templates = TemplateSet::builtin();

        let not_an_object = TicketInput::from_value(json!("just text"));
        let resolution = processor.process(&not_an_object, &templates).await;
        assert_eq!(resolution, fallback_resolution("Unknown".to_string()));

        let numeric_content = TicketInput::from_value(json!({ "id": 9, "content": 12 }));
        let resolution = processor.process(&numeric_content, &templates).await;
        assert_eq!(resolution.ticket_id, "9");
        assert_eq!(resolution.response.response_text, FALLBACK_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn urgent_access_ticket_end_to_end() {
        let ticket = TicketInput::from_value(json!({
            "content": "I can't access the admin dashboard, please fix this ASAP. Cant make payments",
            "customer_info": { "role": "ceo" }
        }));

        let resolution = processor().process(&ticket, &TemplateSet::builtin()).await;

        assert_eq!(resolution.ticket_id, "Unknown");
        assert_eq!(resolution.analysis.category, Category::Access);
        assert_eq!(resolution.analysis.business_impact, BusinessImpact::High);
        assert_eq!(resolution.analysis.priority, Priority::Urgent);
        assert!(resolution.response.response_text.contains("Hello Customer_Name,"));
        assert!(resolution.response.response_text.contains("URGENT"));
    }

    #[tokio::test]
    async fn customer_name_reaches_the_reply() {
        let ticket = TicketInput::from_value(json!({
            "id": "TKT-002",
            "subject": "Question about billing cycle",
            "content": "Hello,\nOur invoice shows billing from the 15th.\nCan you explain?",
            "customer_info": { "role": "Billing Admin", "name": "Sarah Jones" }
        }));

        let resolution = processor_with(Arc::new(FixedScorer(0.9)))
            .process(&ticket, &TemplateSet::builtin())
            .await;

        assert_eq!(resolution.analysis.category, Category::Billing);
        assert_eq!(resolution.analysis.priority, Priority::High);
        assert_eq!(
            resolution.analysis.key_points,
            vec!["Our invoice shows billing from the 15th."]
        );
        assert!(resolution.response.response_text.starts_with("Hi Sarah Jones,"));
        assert!(!resolution.response.requires_approval);
    }

    #[tokio::test]
    async fn context_does_not_leak_between_tickets() {
        let processor = processor();
        let templates = TemplateSet::builtin();
        let named = TicketInput::from_value(json!({
            "content": "my invoice",
            "customer_info": { "name": "Alex Brown" }
        }));
        let anonymous = TicketInput::from_value(json!({ "content": "my invoice" }));

        processor.process(&named, &templates).await;
        let resolution = processor.process(&anonymous, &templates).await;

        assert!(!resolution.response.response_text.contains("Alex Brown"));
        assert!(resolution.response.response_text.contains("Customer_Name"));
    }

    #[tokio::test]
    async fn processing_is_deterministic() {
        let processor = processor();
        let templates = TemplateSet::builtin();
        let ticket = TicketInput::from_value(json!({
            "id": "TKT-003",
            "content": "System crashed during customer demo!!!\nCall me ASAP",
            "customer_info": { "role": "Sales Director", "name": "Alex Brown" }
        }));

        let first = processor.process(&ticket, &templates).await;
        let second = processor.process(&ticket, &templates).await;

        assert_eq!(first, second);
        assert_eq!(first.analysis.priority, Priority::Urgent);
        assert_eq!(first.analysis.category, Category::Technical);
    }
}
