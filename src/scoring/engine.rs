use serde::{Deserialize, Serialize};
use std::fmt;

use super::confidence::ConfidenceSource;
use super::factors::{FactorKind, FactorStatus};
use super::hormones::HormoneAnalysis;
use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Below 35 is low, below 65 moderate, anything else high.
    pub fn from_score(score: f64) -> Self {
        if score < 35.0 {
            RiskLevel::Low
        } else if score < 65.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            RiskLevel::Low => {
                "Your indicators suggest a low likelihood of PCOS. Continue maintaining a healthy lifestyle."
            }
            RiskLevel::Moderate => {
                "Some indicators suggest you may be at moderate risk. Consider consulting a healthcare provider."
            }
            RiskLevel::High => {
                "Multiple indicators suggest elevated PCOS risk. We strongly recommend consulting a healthcare professional."
            }
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    /// The category's raw 0-100 sub-score, not its weighted share of the total.
    pub contribution: f64,
    pub status: FactorStatus,
    pub description: String,
}

impl RiskFactor {
    pub fn kind(&self) -> Option<FactorKind> {
        FactorKind::from_label(&self.name)
    }

    /// Sub-score times the category weight: what this factor added to the total.
    pub fn weighted_contribution(&self) -> f64 {
        self.kind()
            .map(|kind| self.contribution * kind.weight())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub risk_level: RiskLevel,
    /// Presentation only, in `[70, 95]`.
    pub confidence: f64,
    pub score: f64,
    pub factors: Vec<RiskFactor>,
    pub hormone_analysis: HormoneAnalysis,
}

impl RiskResult {
    pub fn factor(&self, kind: FactorKind) -> Option<&RiskFactor> {
        self.factors.iter().find(|f| f.name == kind.label())
    }
}

/// Score a profile.
///
/// Total over any profile: there is no validation here, and only the
/// per-category ceilings clamp anything. Draws exactly one sample from
/// `confidence`.
pub fn compute_risk<C: ConfidenceSource + ?Sized>(profile: &Profile, confidence: &mut C) -> RiskResult {
    let mut score = 0.0;
    let mut factors = Vec::with_capacity(FactorKind::ALL.len());

    for kind in FactorKind::ALL {
        let sub_score = kind.sub_score(profile);
        score += sub_score * kind.weight();
        factors.push(RiskFactor {
            name: kind.label().to_string(),
            contribution: sub_score,
            status: kind.status(sub_score),
            description: kind.description(profile),
        });
    }

    RiskResult {
        risk_level: RiskLevel::from_score(score),
        confidence: confidence.next_confidence(),
        score,
        factors,
        hormone_analysis: HormoneAnalysis::analyze(profile),
    }
}
