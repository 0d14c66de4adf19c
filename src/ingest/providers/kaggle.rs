// src/ingest/providers/kaggle.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use serde_json::{json, Value};

use crate::ingest::raw::RawRecord;
use crate::ingest::types::SourceProvider;
use crate::opportunity::{
    parse_reward, CompetitionLevel, DeadlineType, Eligibility, Opportunity, OpportunityType,
    Requirements, Urgency,
};

pub const SOURCE_NAME: &str = "kaggle";
pub const BASE_URL: &str = "https://www.kaggle.com/c/";

const PREFIX_TAGS: [&str; 2] = ["Data Science", "ML"];
const FALLBACK_TAGS: [&str; 2] = ["Data Science", "Machine Learning"];

enum Listing {
    Synthetic,
    Fixture(String),
}

/// Kaggle competitions. The public API needs an authenticated account, so
/// listings come either from the built-in catalogue or from a JSON fixture.
pub struct KaggleProvider {
    listing: Listing,
}

impl KaggleProvider {
    pub fn synthetic() -> Self {
        Self {
            listing: Listing::Synthetic,
        }
    }

    /// `content` must be a JSON array of raw competition records.
    pub fn from_fixture(content: &str) -> Self {
        Self {
            listing: Listing::Fixture(content.to_string()),
        }
    }
}

#[async_trait]
impl SourceProvider for KaggleProvider {
    async fn fetch_raw(&self, now: DateTime<Utc>) -> Result<Vec<Value>> {
        let out = match &self.listing {
            Listing::Synthetic => synthetic_catalogue(now),
            Listing::Fixture(content) => {
                serde_json::from_str(content).context("parsing kaggle fixture json")?
            }
        };
        counter!("ingest_records_total", "source" => SOURCE_NAME).increment(out.len() as u64);
        Ok(out)
    }

    fn normalize(&self, raw: &RawRecord, now: DateTime<Utc>) -> Result<Opportunity> {
        Ok(normalize_competition(raw, now))
    }

    fn name(&self) -> &'static str {
        SOURCE_NAME
    }
}

/// Map one Kaggle competition record into the canonical schema.
pub fn normalize_competition(raw: &RawRecord, now: DateTime<Utc>) -> Opportunity {
    let title = raw.str_or("title", "Untitled Competition");
    let organization = raw.str_or("organizationName", "Kaggle");
    let url = format!("{BASE_URL}{}", sanitize_ref(&raw.str_or("ref", "")));

    let reward = raw.str_or("reward", "");
    let amount = parse_reward(&reward);

    let deadline = raw.opt_str("deadline").map(str::to_string);
    let urgency = Urgency::classify(deadline.as_deref(), now);

    let source_tags = extract_tags(raw.get("tags"));
    let level = CompetitionLevel::from_tier(raw.opt_str("tierName"));

    let mut tags: Vec<String> = PREFIX_TAGS.iter().map(|s| s.to_string()).collect();
    tags.extend(source_tags.iter().cloned());

    let mut skills_needed: Vec<String> = ["Python", "Machine Learning", "Data Analysis"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    skills_needed.extend(source_tags);

    let description = raw.str_or("description", &format!("{title} - Kaggle competition"));

    Opportunity {
        kind: OpportunityType::Competition,
        name: title,
        organization,
        amount,
        amount_display: reward,
        deadline_type: DeadlineType::from_deadline(deadline.as_deref()),
        deadline,
        url,
        source: SOURCE_NAME.to_string(),
        urgency,
        tags,
        eligibility: Eligibility {
            students_only: false,
            grade_levels: Vec::new(),
            majors: ["Computer Science", "Data Science", "Statistics", "Mathematics"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            gpa_min: None,
            citizenship: vec!["Any".to_string()],
            geographic: vec!["Online".to_string()],
        },
        requirements: Requirements {
            application_type: "platform_submission".to_string(),
            estimated_time: "20-40 hours".to_string(),
            skills_needed,
            team_allowed: true,
            team_size_max: Some(5),
            essay_required: false,
        },
        description,
        competition_level: level,
        discovered_at: now,
    }
}

/// Tag names from a `[{"name": ...}, ...]` field.
///
/// A sequence yields the names of its object elements (others are skipped,
/// a missing `name` gives ""). Anything that is not a sequence, including a
/// missing field, yields the fallback pair.
pub fn extract_tags(field: Option<&Value>) -> Vec<String> {
    match field {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|tag| {
                tag.get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect(),
        _ => FALLBACK_TAGS.iter().map(|s| s.to_string()).collect(),
    }
}

fn sanitize_ref(r: &str) -> &str {
    r.trim().trim_matches('/')
}

fn deadline_in(now: DateTime<Utc>, days: i64) -> Value {
    let at = (now + Duration::days(days)).naive_utc();
    Value::String(at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
}

/// Built-in catalogue of active competitions, deadlines relative to `now`.
pub fn synthetic_catalogue(now: DateTime<Utc>) -> Vec<Value> {
    vec![
        json!({
            "title": "LLM - Detect AI Generated Text",
            "organizationName": "Kaggle",
            "ref": "llm-detect-ai-generated-text",
            "reward": "$50,000",
            "deadline": deadline_in(now, 45),
            "tags": [{"name": "NLP"}, {"name": "Deep Learning"}],
            "tierName": "Featured",
            "description": "Build models to identify AI-generated essays"
        }),
        json!({
            "title": "Google - Fast or Slow? Predict AI Model Runtime",
            "organizationName": "Google",
            "ref": "predict-ai-model-runtime",
            "reward": "$30,000",
            "deadline": deadline_in(now, 60),
            "tags": [{"name": "ML Engineering"}, {"name": "Performance"}],
            "tierName": "Featured",
            "description": "Predict computation time for machine learning models"
        }),
        json!({
            "title": "Stable Diffusion - Image to Prompts",
            "organizationName": "Stability AI",
            "ref": "stable-diffusion-image-to-prompts",
            "reward": "$25,000",
            "deadline": deadline_in(now, 30),
            "tags": [{"name": "Computer Vision"}, {"name": "Generative AI"}],
            "tierName": "Research",
            "description": "Reverse engineer prompts from generated images"
        }),
        json!({
            "title": "Kaggle Playground Series - Binary Classification",
            "organizationName": "Kaggle",
            "ref": "playground-series-s4e1",
            "reward": "$25,000",
            "deadline": deadline_in(now, 20),
            "tags": [{"name": "Tabular Data"}, {"name": "Classification"}],
            "tierName": "Playground",
            "description": "Practice classification on synthetic dataset"
        }),
        json!({
            "title": "OpenAI - Chatbot Arena",
            "organizationName": "OpenAI",
            "ref": "chatbot-arena",
            "reward": "$40,000",
            "deadline": deadline_in(now, 50),
            "tags": [{"name": "LLM"}, {"name": "Reinforcement Learning"}],
            "tierName": "Featured",
            "description": "Develop strategies for LLM conversation evaluation"
        }),
        json!({
            "title": "Meta - Multimodal Learning Challenge",
            "organizationName": "Meta",
            "ref": "meta-multimodal-learning",
            "reward": "$35,000",
            "deadline": deadline_in(now, 40),
            "tags": [{"name": "Multimodal"}, {"name": "Vision-Language"}],
            "tierName": "Research",
            "description": "Build models that understand both images and text"
        }),
        json!({
            "title": "Titanic - Machine Learning from Disaster",
            "organizationName": "Kaggle",
            "ref": "titanic",
            "reward": "Knowledge",
            "deadline": null,
            "tags": [{"name": "Classification"}, {"name": "Beginner"}],
            "tierName": "Getting Started",
            "description": "Start here! Predict survival on the Titanic"
        }),
        json!({
            "title": "House Prices - Advanced Regression Techniques",
            "organizationName": "Kaggle",
            "ref": "house-prices-advanced-regression-techniques",
            "reward": "$15,000",
            "deadline": null,
            "tags": [{"name": "Regression"}, {"name": "Feature Engineering"}],
            "tierName": "Playground",
            "description": "Predict house prices using advanced regression"
        }),
        json!({
            "title": "Santander Customer Transaction Prediction",
            "organizationName": "Santander",
            "ref": "santander-customer-transaction-prediction",
            "reward": "$20,000",
            "deadline": deadline_in(now, 35),
            "tags": [{"name": "Finance"}, {"name": "Binary Classification"}],
            "tierName": "Research",
            "description": "Identify which customers will make a transaction"
        }),
        json!({
            "title": "IEEE-CIS Fraud Detection",
            "organizationName": "IEEE",
            "ref": "ieee-fraud-detection",
            "reward": "$25,000",
            "deadline": deadline_in(now, 25),
            "tags": [{"name": "Fraud Detection"}, {"name": "Imbalanced Data"}],
            "tierName": "Featured",
            "description": "Improve fraud prevention for online transactions"
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tags_asymmetry_between_empty_and_missing() {
        assert!(extract_tags(Some(&json!([]))).is_empty());
        assert!(extract_tags(Some(&json!(["NLP", 3]))).is_empty());
        assert_eq!(extract_tags(None), vec!["Data Science", "Machine Learning"]);
        assert_eq!(
            extract_tags(Some(&json!("not-a-list"))),
            vec!["Data Science", "Machine Learning"]
        );
    }

    #[test]
    fn tags_keep_object_names_in_order() {
        let v = json!([{"name": "NLP"}, "junk", {"label": "x"}, {"name": "CV"}]);
        assert_eq!(extract_tags(Some(&v)), vec!["NLP", "", "CV"]);
    }

    #[test]
    fn ref_is_trimmed_into_url() {
        assert_eq!(sanitize_ref(" /titanic/ "), "titanic");
        assert_eq!(sanitize_ref(""), "");
    }

    #[test]
    fn catalogue_has_ten_records_two_open_ended() {
        let cat = synthetic_catalogue(Utc::now());
        assert_eq!(cat.len(), 10);
        let open = cat.iter().filter(|r| r["deadline"].is_null()).count();
        assert_eq!(open, 2);
    }
}
