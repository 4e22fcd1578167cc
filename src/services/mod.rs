pub mod sentiment;
pub mod template;

pub use sentiment::SentimentScorer;
pub use template::TemplateRenderer;
