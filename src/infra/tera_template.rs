use std::error::Error as _;

use async_trait::async_trait;
use tera::{Context, Tera};

use crate::domain::fields::FieldMap;
use crate::error::TemplateError;
use crate::services::TemplateRenderer;

const TEMPLATE_NAME: &str = "response";

/// Renders `{{ name }}` placeholders with tera. Undefined names fail the render.
#[derive(Debug, Default, Clone, Copy)]
pub struct TeraTemplateRenderer;

impl TeraTemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn fill(template: &str, values: &FieldMap) -> Result<String, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, template)
            .map_err(|err| TemplateError::Parse(describe(&err)))?;
        let context =
            Context::from_serialize(values).map_err(|err| TemplateError::Render(describe(&err)))?;
        tera.render(TEMPLATE_NAME, &context)
            .map_err(|err| TemplateError::Render(describe(&err)))
    }
}

fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl TemplateRenderer for TeraTemplateRenderer {
    async fn render(&self, template: &str, values: &FieldMap) -> Result<String, TemplateError> {
        Self::fill(template, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::{FALLBACK_TEMPLATE, TemplateSet};

    fn values() -> FieldMap {
        let mut values = FieldMap::new();
        values.insert("name", "Ada");
        values.insert("eta", "2 hours");
        values
    }

    #[test]
    fn substitutes_named_placeholders() {
        let text = TeraTemplateRenderer::fill("Hi {{ name }}, ETA {{eta}}.", &values()).unwrap();
        assert_eq!(text, "Hi Ada, ETA 2 hours.");
    }

    #[test]
    fn leaves_markup_characters_unescaped() {
        let mut values = values();
        values.insert("name", "<Ada & Co>");
        let text = TeraTemplateRenderer::fill("Hello {{ name }}", &values).unwrap();
        assert_eq!(text, "Hello <Ada & Co>");
    }

    #[test]
    fn single_braces_are_literal_text() {
        let text = TeraTemplateRenderer::fill("{literal} for {{ name }}", &values()).unwrap();
        assert_eq!(text, "{literal} for Ada");
    }

    #[test]
    fn undefined_placeholder_fails_the_render() {
        let err = TeraTemplateRenderer::fill("Hello {{ customer }}", &values()).unwrap_err();
        match err {
            TemplateError::Render(message) => assert!(message.contains("customer")),
            other => panic!("expected a render error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_template_fails_to_parse() {
        let err = TeraTemplateRenderer::fill("Hello {{ name", &values()).unwrap_err();
        assert!(matches!(err, TemplateError::Parse(_)));
    }

    #[test]
    fn builtin_templates_render_with_every_placeholder() {
        let mut values = FieldMap::new();
        for name in [
            "name",
            "feature",
            "diagnosis",
            "resolution_steps",
            "priority_level",
            "eta",
            "billing_topic",
            "explanation",
            "next_steps",
        ] {
            values.insert(name, format!("<{name}>"));
        }

        let builtin = TemplateSet::builtin();
        let keys: Vec<&str> = builtin.keys().collect();
        for key in keys {
            let template = builtin.get(key).unwrap();
            let text = TeraTemplateRenderer::fill(template, &values).unwrap();
            assert!(text.contains("<name>"), "{key} did not render the name");
            assert!(!text.contains("{{"), "{key} left a placeholder behind");
        }
        let fallback = TeraTemplateRenderer::fill(FALLBACK_TEMPLATE, &values).unwrap();
        assert!(fallback.contains("Thank you for contacting support."));
    }
}
