use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const GENERAL_RESPONSE: &str = "general_response";

pub const FALLBACK_TEMPLATE: &str = "Hello {{ name }},\n\nThank you for contacting support. \
We are looking into your issue and would get to you as soon as possible.\n\n\
Best regards,\nSupport Team";

const ACCESS_ISSUE: &str = "Hello {{ name }},

I understand you're having trouble accessing {{ feature }}. Let me help you resolve this.

{{ diagnosis }}

{{ resolution_steps }}

Priority Status: {{ priority_level }}
Estimated Resolution: {{ eta }}

Please let me know if you need any clarification.

Best regards,
Support Team
";

const BILLING_INQUIRY: &str = "Hi {{ name }},

Thank you for your inquiry about {{ billing_topic }}.

{{ explanation }}

{{ next_steps }}

If you have any questions, don't hesitate to ask.

Best regards,
Billing Team
";

const TECHNICAL_ISSUE: &str = "Hello {{ name }},

We have received your technical issue report. Our technical team is reviewing the error details.

{{ diagnosis }}

{{ resolution_steps }}

Thanks for understanding and apologies for any inconvenience.

Priority: {{ priority_level }}
ETA: {{ eta }}

Best regards,
Technical Support Team
";

const FEATURE_REQUEST: &str = "Hi {{ name }},

Thank you for your feature request. We appreciate your feedback and are evaluating your suggestion.

{{ resolution_steps }}

Best regards,
Product Team
";

const GENERAL: &str = "Hello {{ name }},

Thank you for reaching out to us. We have received your request and will get back to you shortly.

Best regards,
Support Team
";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateSet(BTreeMap<String, String>);

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut set = Self::new();
        set.insert("access_issue", ACCESS_ISSUE);
        set.insert("billing_inquiry", BILLING_INQUIRY);
        set.insert("technical_issue", TECHNICAL_ISSUE);
        set.insert("feature_request", FEATURE_REQUEST);
        set.insert(GENERAL_RESPONSE, GENERAL);
        set
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.0.insert(key.into(), template.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|template| !template.trim().is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
