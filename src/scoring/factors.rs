use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::Profile;

/// The five scoring categories, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorKind {
    Bmi,
    MenstrualIrregularity,
    ClinicalSymptoms,
    HormonalMarkers,
    FamilyHistory,
}

impl FactorKind {
    pub const ALL: [FactorKind; 5] = [
        FactorKind::Bmi,
        FactorKind::MenstrualIrregularity,
        FactorKind::ClinicalSymptoms,
        FactorKind::HormonalMarkers,
        FactorKind::FamilyHistory,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FactorKind::Bmi => "BMI",
            FactorKind::MenstrualIrregularity => "Menstrual Irregularity",
            FactorKind::ClinicalSymptoms => "Clinical Symptoms",
            FactorKind::HormonalMarkers => "Hormonal Markers",
            FactorKind::FamilyHistory => "Family History",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// Fixed weight of the category in the total score. The five weights sum to 1.
    pub fn weight(&self) -> f64 {
        match self {
            FactorKind::Bmi => 0.15,
            FactorKind::MenstrualIrregularity => 0.20,
            FactorKind::ClinicalSymptoms => 0.20,
            FactorKind::HormonalMarkers => 0.35,
            FactorKind::FamilyHistory => 0.10,
        }
    }

    /// Raw 0-100 sub-score of this category for a profile.
    pub fn sub_score(&self, profile: &Profile) -> f64 {
        match self {
            FactorKind::Bmi => bmi_score(profile.bmi()),
            FactorKind::MenstrualIrregularity => menstrual_score(profile),
            FactorKind::ClinicalSymptoms => clinical_score(profile),
            FactorKind::HormonalMarkers => hormonal_score(profile),
            FactorKind::FamilyHistory => family_score(profile),
        }
    }

    pub fn description(&self, profile: &Profile) -> String {
        let input = profile.input();
        match self {
            FactorKind::Bmi => format!("BMI {:.1} kg/m²", profile.bmi()),
            FactorKind::MenstrualIrregularity => {
                if input.irregular_periods {
                    "Irregular cycles detected".to_string()
                } else {
                    "Regular cycles".to_string()
                }
            }
            FactorKind::ClinicalSymptoms => format!(
                "Acne: {}/3, Hair Growth: {}/4",
                input.acne_severity, input.excess_hair_growth
            ),
            FactorKind::HormonalMarkers => {
                format!("LH/FSH ratio: {:.2}", profile.lh_fsh_ratio())
            }
            FactorKind::FamilyHistory => {
                if input.family_history {
                    "Family history present".to_string()
                } else {
                    "No family history".to_string()
                }
            }
        }
    }

    /// Status shown next to the category.
    ///
    /// Sub-scores under 30 are normal, under 60 borderline, the rest abnormal.
    /// Family history is never worse than borderline.
    pub fn status(&self, sub_score: f64) -> FactorStatus {
        match self {
            FactorKind::FamilyHistory => {
                if sub_score > 0.0 {
                    FactorStatus::Borderline
                } else {
                    FactorStatus::Normal
                }
            }
            _ => FactorStatus::from_sub_score(sub_score),
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorStatus {
    Normal,
    Borderline,
    Abnormal,
}

impl FactorStatus {
    pub fn from_sub_score(sub_score: f64) -> Self {
        if sub_score < 30.0 {
            FactorStatus::Normal
        } else if sub_score < 60.0 {
            FactorStatus::Borderline
        } else {
            FactorStatus::Abnormal
        }
    }
}

impl fmt::Display for FactorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorStatus::Normal => write!(f, "normal"),
            FactorStatus::Borderline => write!(f, "borderline"),
            FactorStatus::Abnormal => write!(f, "abnormal"),
        }
    }
}

/// Step function over BMI. Underweight scores above normal weight.
pub fn bmi_score(bmi: f64) -> f64 {
    if bmi < 18.5 {
        20.0
    } else if bmi < 25.0 {
        10.0
    } else if bmi < 30.0 {
        40.0
    } else if bmi < 35.0 {
        70.0
    } else {
        90.0
    }
}

pub fn menstrual_score(profile: &Profile) -> f64 {
    let input = profile.input();
    let mut score: f64 = 0.0;
    if input.irregular_periods {
        score += 40.0;
    }
    if input.missed_periods {
        score += 30.0;
    }
    if input.cycle_length > 35 {
        score += 20.0;
    }
    if input.cycle_length > 45 {
        score += 10.0;
    }
    score.min(100.0)
}

pub fn clinical_score(profile: &Profile) -> f64 {
    let input = profile.input();
    let mut score = input.acne_severity as f64 * 15.0;
    score += input.excess_hair_growth as f64 * 12.0;
    if input.hair_fall {
        score += 15.0;
    }
    if input.dark_patches {
        score += 20.0;
    }
    if input.mood_swings {
        score += 10.0;
    }
    score.min(100.0)
}

pub fn hormonal_score(profile: &Profile) -> f64 {
    let input = profile.input();
    let mut score: f64 = 0.0;

    if input.testosterone > 70.0 {
        score += 25.0;
    } else if input.testosterone > 55.0 {
        score += 15.0;
    }

    // AMH is elevated in PCOS
    if input.amh > 6.0 {
        score += 25.0;
    } else if input.amh > 4.0 {
        score += 15.0;
    }

    let ratio = profile.lh_fsh_ratio();
    if ratio > 3.0 {
        score += 30.0;
    } else if ratio > 2.0 {
        score += 20.0;
    }

    if input.cortisol > 23.0 {
        score += 15.0;
    }

    score.min(100.0)
}

pub fn family_score(profile: &Profile) -> f64 {
    if profile.input().family_history {
        70.0
    } else {
        0.0
    }
}
