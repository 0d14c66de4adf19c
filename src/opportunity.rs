//! # Opportunity
//!
//! Canonical opportunity record shared by every source adapter, plus the
//! pure helpers used to derive its computed fields:
//!
//! - `parse_reward`: first numeric run of a free-text prize → integer amount.
//! - `Urgency::classify`: deadline → coarse urgency bucket (fail-open to `future`).
//! - `CompetitionLevel::from_tier`: source tier string → difficulty level.
//!
//! None of these read the clock; callers inject `now`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    Competition,
    Grant,
    Scholarship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineType {
    Fixed,
    Ongoing,
}

impl DeadlineType {
    pub fn from_deadline(deadline: Option<&str>) -> Self {
        if deadline.is_some() {
            DeadlineType::Fixed
        } else {
            DeadlineType::Ongoing
        }
    }
}

/// How soon a deadline falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Immediate,
    ThisWeek,
    ThisMonth,
    Future,
}

impl Urgency {
    /// Bucket a deadline relative to `now`.
    ///
    /// Days are whole days between `now` and the deadline, truncated.
    /// Missing or unparseable deadlines map to `Future`.
    pub fn classify(deadline: Option<&str>, now: DateTime<Utc>) -> Self {
        let Some(raw) = deadline else {
            return Urgency::Future;
        };
        let Some(at) = parse_deadline(raw) else {
            return Urgency::Future;
        };

        let days = at.signed_duration_since(now).num_days();
        match days {
            d if d < 2 => Urgency::Immediate,
            d if d < 7 => Urgency::ThisWeek,
            d if d < 30 => Urgency::ThisMonth,
            _ => Urgency::Future,
        }
    }
}

/// Parse an ISO-8601 deadline. A trailing `Z` is rewritten to `+00:00`.
/// Naive date-times and bare dates are taken as UTC.
pub fn parse_deadline(raw: &str) -> Option<DateTime<FixedOffset>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let s = match s.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => s.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&s, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

impl CompetitionLevel {
    /// Map a source tier name to a difficulty level.
    ///
    /// Two independent case-insensitive substring tests: "playground" /
    /// "getting started" → Low, "research" / "featured" → High. Anything
    /// else, including a missing tier, is Medium.
    pub fn from_tier(tier: Option<&str>) -> Self {
        let t = tier.unwrap_or_default().to_lowercase();
        let low = t.contains("playground") || t.contains("getting started");
        let high = t.contains("research") || t.contains("featured");

        if low {
            CompetitionLevel::Low
        } else if high {
            CompetitionLevel::High
        } else {
            CompetitionLevel::Medium
        }
    }
}

/// Extract the first numeric run ("$50,000" → 50000) from a prize string.
///
/// A run is ASCII digits and commas; commas are stripped. Empty text, no
/// run, or a run with no digits (a lone ",") yields 0. Values beyond `u64`
/// saturate.
pub fn parse_reward(reward: &str) -> u64 {
    static RE_AMOUNT: OnceCell<Regex> = OnceCell::new();
    let re = RE_AMOUNT.get_or_init(|| Regex::new(r"[0-9,]+").expect("static regex"));

    let Some(m) = re.find(reward) else {
        return 0;
    };
    m.as_str().as_bytes()
        .iter()
        .filter(|b| b.is_ascii_digit())
        .fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    pub students_only: bool,
    pub grade_levels: Vec<String>,
    pub majors: Vec<String>,
    pub gpa_min: Option<f32>,
    pub citizenship: Vec<String>,
    pub geographic: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    pub application_type: String,
    pub estimated_time: String,
    pub skills_needed: Vec<String>,
    pub team_allowed: bool,
    pub team_size_max: Option<u32>,
    pub essay_required: bool,
}

/// Normalized opportunity, identical in shape for every source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(rename = "type")]
    pub kind: OpportunityType,
    pub name: String,
    pub organization: String,
    pub amount: u64,
    pub amount_display: String,
    pub deadline: Option<String>,
    pub deadline_type: DeadlineType,
    pub url: String,
    pub source: String,
    pub urgency: Urgency,
    pub tags: Vec<String>,
    pub eligibility: Eligibility,
    pub requirements: Requirements,
    pub description: String,
    pub competition_level: CompetitionLevel,
    pub discovered_at: DateTime<Utc>,
}
