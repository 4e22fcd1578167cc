use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{SentimentScorer, TemplateRenderer};
use crate::workflow::{Classifier, Responder, TicketProcessor};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub processor: Arc<TicketProcessor>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        sentiment: Arc<dyn SentimentScorer>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        let classifier = Classifier::new(config.vocabulary.clone(), sentiment);
        let responder = Responder::new(config.policy, config.actions.clone(), renderer);
        Self {
            processor: Arc::new(TicketProcessor::new(classifier, responder)),
            config,
        }
    }
}
