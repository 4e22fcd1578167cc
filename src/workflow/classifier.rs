use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::analysis::{Analysis, BusinessImpact, Category, Priority};
use crate::domain::fields::{FieldMap, defaults};
use crate::services::SentimentScorer;
use crate::workflow::vocabulary::Vocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CategoryVote {
    category: Category,
    occurrences: usize,
    first_offset: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrioritySignals {
    pub urgency: bool,
    pub business_impact: bool,
    pub senior_requester: bool,
}

impl PrioritySignals {
    /// Seniority counts double, so a senior requester alone reaches HIGH.
    pub fn score(&self) -> u32 {
        u32::from(self.urgency)
            + u32::from(self.business_impact)
            + 2 * u32::from(self.senior_requester)
    }

    pub fn priority(&self) -> Priority {
        Priority::from_score(self.score())
    }
}

pub struct Classifier {
    vocabulary: Vocabulary,
    sentiment: Arc<dyn SentimentScorer>,
}

impl Classifier {
    pub fn new(vocabulary: Vocabulary, sentiment: Arc<dyn SentimentScorer>) -> Self {
        Self {
            vocabulary: vocabulary.normalized(),
            sentiment,
        }
    }

    pub async fn analyze(&self, content: &str, customer_info: Option<&FieldMap>) -> Analysis {
        let lowered = content.to_lowercase();

        let category = self.infer_category(&lowered);
        let urgency_indicators = self.urgency_indicators(&lowered);
        let signals = PrioritySignals {
            urgency: !urgency_indicators.is_empty(),
            business_impact: contains_any(&lowered, &self.vocabulary.impact_keywords),
            senior_requester: self.is_senior(customer_info),
        };
        let priority = signals.priority();
        let business_impact = if signals.business_impact {
            BusinessImpact::High
        } else {
            BusinessImpact::Low
        };

        let key_points = self.key_points(content, category);
        let sentiment = self.sentiment(content).await;

        debug!(
            category = %category,
            priority = %priority,
            score = signals.score(),
            key_points = key_points.len(),
            sentiment,
            "ticket classified"
        );

        Analysis {
            category,
            priority,
            key_points,
            required_expertise: self.vocabulary.expertise_for(category),
            sentiment,
            urgency_indicators,
            business_impact,
            suggested_response_type: self.vocabulary.response_type_for(category),
            follow_up_prediction: Some(self.vocabulary.follow_up_for(category, sentiment)),
        }
    }

    /// Highest total keyword count wins; ties go to the category whose
    /// evidence appears first in the text. No evidence means TECHNICAL.
    pub fn infer_category(&self, lowered: &str) -> Category {
        let mut best: Option<CategoryVote> = None;

        for category in Category::ALL {
            let Some(vote) = self.vote(category, lowered) else {
                continue;
            };
            let wins = match best {
                None => true,
                Some(current) => {
                    vote.occurrences > current.occurrences
                        || (vote.occurrences == current.occurrences
                            && vote.first_offset < current.first_offset)
                }
            };
            if wins {
                best = Some(vote);
            }
        }

        best.map(|vote| vote.category).unwrap_or_default()
    }

    fn vote(&self, category: Category, lowered: &str) -> Option<CategoryVote> {
        let mut occurrences = 0;
        let mut first_offset: Option<usize> = None;

        for keyword in self.vocabulary.keywords(category) {
            let count = lowered.matches(keyword.as_str()).count();
            if count == 0 {
                continue;
            }
            occurrences += count;
            if let Some(offset) = lowered.find(keyword.as_str()) {
                first_offset = Some(first_offset.map_or(offset, |seen| seen.min(offset)));
            }
        }

        first_offset.map(|first_offset| CategoryVote {
            category,
            occurrences,
            first_offset,
        })
    }

    fn urgency_indicators(&self, lowered: &str) -> Vec<String> {
        self.vocabulary
            .urgency_keywords
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .cloned()
            .collect()
    }

    fn is_senior(&self, customer_info: Option<&FieldMap>) -> bool {
        let role = customer_info
            .map(|info| info.text_or("role", defaults::CUSTOMER_ROLE))
            .unwrap_or_default()
            .to_lowercase();
        contains_any(&role, &self.vocabulary.seniority_markers)
    }

    pub fn key_points(&self, content: &str, category: Category) -> Vec<String> {
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let category_keywords = self.vocabulary.keywords(category);
        let selected: Vec<String> = lines
            .iter()
            .filter(|line| {
                let lowered = line.to_lowercase();
                contains_any(&lowered, &self.vocabulary.urgency_keywords)
                    || contains_any(&lowered, category_keywords)
            })
            .map(|line| line.to_string())
            .collect();

        if selected.is_empty() {
            lines.into_iter().take(3).map(str::to_string).collect()
        } else {
            selected
        }
    }

    async fn sentiment(&self, content: &str) -> f64 {
        let compound = match self.sentiment.compound(content).await {
            Ok(compound) if compound.is_finite() => compound.clamp(-1.0, 1.0),
            Ok(compound) => {
                warn!(compound, "sentiment score is not finite, treating ticket as neutral");
                0.0
            }
            Err(error) => {
                warn!(%error, "sentiment scorer failed, treating ticket as neutral");
                0.0
            }
        };
        (compound + 1.0) / 2.0
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
