use async_trait::async_trait;

use crate::domain::fields::FieldMap;
use crate::error::TemplateError;

#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    /// Fills every named placeholder in `template` from `values`. Either the
    /// whole template renders or nothing does.
    async fn render(&self, template: &str, values: &FieldMap) -> Result<String, TemplateError>;
}
