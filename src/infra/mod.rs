pub mod tera_template;
pub mod vader;

pub use tera_template::TeraTemplateRenderer;
pub use vader::VaderSentimentScorer;
