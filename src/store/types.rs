use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::Profile;
use crate::scoring::RiskResult;

/// A saved (profile, result) pair. Never modified after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: String,
    pub date: DateTime<Utc>,
    pub profile: Profile,
    pub result: RiskResult,
}

impl StoredReport {
    /// First block of the id, enough to pick a report out of a short list.
    pub fn short_id(&self) -> &str {
        self.id.split('-').next().unwrap_or(&self.id)
    }
}

/// Direction of the score between the two newest reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Stable,
    Increasing,
    Decreasing,
}

/// Differences under this many points count as stable.
pub const STABLE_BAND: f64 = 5.0;

impl Trend {
    pub fn between(latest: f64, previous: f64) -> Self {
        let diff = latest - previous;
        if diff.abs() < STABLE_BAND {
            Trend::Stable
        } else if diff > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        }
    }

    /// Trend over a newest-first report list. None with fewer than two reports.
    pub fn from_reports(reports: &[StoredReport]) -> Option<Self> {
        match reports {
            [latest, previous, ..] => Some(Trend::between(latest.result.score, previous.result.score)),
            _ => None,
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Stable => write!(f, "stable"),
            Trend::Increasing => write!(f, "increasing"),
            Trend::Decreasing => write!(f, "decreasing"),
        }
    }
}
