use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::analysis::Category;
use crate::domain::fields::defaults;
use crate::domain::template::GENERAL_RESPONSE;

const BILLING: &[&str] = &[
    "billing",
    "invoice",
    "pro-rating",
    "account",
    "cost",
    "money",
    "payroll",
];
const ACCESS: &[&str] = &[
    "admin dashboard",
    "access",
    "login",
    "403",
    "authentication",
    "security",
    "admin",
    "dashboard",
];
const FEATURE: &[&str] = &["feature", "request", "function", "characteristic"];
const TECHNICAL: &[&str] = &[
    "crash",
    "system",
    "failed",
    "technical error",
    "not working",
    "server",
    "down",
    "stuck",
];

const URGENCY: &[&str] = &[
    "asap",
    "urgent",
    "emergency",
    "immediately",
    "crash",
    "system down",
    "money lost",
    "data lost",
];
const IMPACT: &[&str] = &[
    "payroll",
    "demo",
    "impact on business",
    "payment",
    "system down",
    "business problem",
    "emergency",
];
const SENIORITY: &[&str] = &[
    "director", "admin", "c-level", "ceo", "cto", "cfo", "coo", "vp", "manager",
];

const FRUSTRATION_SUFFIX: &str = " The customer is frustrated as their issue does not seem to \
have been resolved and may need to be escalated to higher authorities.";

/// Lexical tables driving the classifier. Every field falls back to the
/// built-in table when omitted from a vocabulary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub category_keywords: BTreeMap<Category, Vec<String>>,
    pub urgency_keywords: Vec<String>,
    pub impact_keywords: Vec<String>,
    pub seniority_markers: Vec<String>,
    pub expertise: BTreeMap<Category, Vec<String>>,
    pub response_types: BTreeMap<Category, String>,
    pub follow_ups: BTreeMap<Category, String>,
    pub frustration_suffix: String,
    pub frustration_threshold: f64,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let category_keywords = BTreeMap::from([
            (Category::Billing, owned(BILLING)),
            (Category::Access, owned(ACCESS)),
            (Category::Feature, owned(FEATURE)),
            (Category::Technical, owned(TECHNICAL)),
        ]);
        let expertise = BTreeMap::from([
            (
                Category::Access,
                owned(&["System Administrator", "Access Manager"]),
            ),
            (
                Category::Billing,
                owned(&["Billing accountant", "Account Manager", "Financial Manager"]),
            ),
            (
                Category::Technical,
                owned(&["Technical Support Engineer", "Customer Support"]),
            ),
            (
                Category::Feature,
                owned(&["Product Manager", "Developer", "Project Manager"]),
            ),
        ]);
        let response_types = BTreeMap::from([
            (Category::Access, "access_issue".to_string()),
            (Category::Billing, "billing_inquiry".to_string()),
            (Category::Technical, "technical_issue".to_string()),
            (Category::Feature, "feature_request".to_string()),
        ]);
        let follow_ups = BTreeMap::from([
            (
                Category::Billing,
                "The client may ask for more information about invoices or payment methods."
                    .to_string(),
            ),
            (
                Category::Access,
                "The customer might request additional troubleshooting steps or more \
                 privileged access."
                    .to_string(),
            ),
            (
                Category::Technical,
                "The customer might ask for further technical support.".to_string(),
            ),
            (
                Category::Feature,
                "The customer might inquire about the product roadmap or feature release \
                 timeline."
                    .to_string(),
            ),
        ]);

        Self {
            category_keywords,
            urgency_keywords: owned(URGENCY),
            impact_keywords: owned(IMPACT),
            seniority_markers: owned(SENIORITY),
            expertise,
            response_types,
            follow_ups,
            frustration_suffix: FRUSTRATION_SUFFIX.to_string(),
            frustration_threshold: 0.4,
        }
    }
}

impl Vocabulary {
    pub fn normalized(mut self) -> Self {
        for keywords in self.category_keywords.values_mut() {
            normalize_terms(keywords);
        }
        normalize_terms(&mut self.urgency_keywords);
        normalize_terms(&mut self.impact_keywords);
        normalize_terms(&mut self.seniority_markers);
        self
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        self.category_keywords
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn expertise_for(&self, category: Category) -> Vec<String> {
        self.expertise
            .get(&category)
            .filter(|roles| !roles.is_empty())
            .cloned()
            .unwrap_or_else(|| vec![defaults::EXPERTISE.to_string()])
    }

    pub fn response_type_for(&self, category: Category) -> String {
        self.response_types
            .get(&category)
            .cloned()
            .unwrap_or_else(|| GENERAL_RESPONSE.to_string())
    }

    pub fn follow_up_for(&self, category: Category, sentiment: f64) -> String {
        let mut prediction = self.follow_ups.get(&category).cloned().unwrap_or_default();
        if sentiment < self.frustration_threshold {
            prediction.push_str(&self.frustration_suffix);
        }
        prediction
    }
}

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|term| term.to_string()).collect()
}

fn normalize_terms(terms: &mut Vec<String>) {
    terms.retain(|term| !term.trim().is_empty());
    for term in terms.iter_mut() {
        *term = term.to_lowercase();
    }
}
