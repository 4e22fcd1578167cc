use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Signed compound polarity of `text` in [-1, 1].
    async fn compound(&self, text: &str) -> AppResult<f64>;
}
