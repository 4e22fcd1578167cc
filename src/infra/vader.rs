use async_trait::async_trait;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::error::{AppError, AppResult};
use crate::services::SentimentScorer;

#[derive(Debug, Default, Clone, Copy)]
pub struct VaderSentimentScorer;

impl VaderSentimentScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> AppResult<f64> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }
        let analyzer = SentimentIntensityAnalyzer::new();
        analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .ok_or_else(|| AppError::Sentiment("analyzer returned no compound score".to_string()))
    }
}

#[async_trait]
impl SentimentScorer for VaderSentimentScorer {
    async fn compound(&self, text: &str) -> AppResult<f64> {
        self.score(text)
    }
}
