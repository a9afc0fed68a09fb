use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HormoneStatus {
    Normal,
    Borderline,
    High,
    Low,
}

impl fmt::Display for HormoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HormoneStatus::Normal => write!(f, "Normal"),
            HormoneStatus::Borderline => write!(f, "Borderline"),
            HormoneStatus::High => write!(f, "High"),
            HormoneStatus::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HormoneReading {
    pub value: f64,
    pub status: HormoneStatus,
    /// Clinical reference range, for display.
    pub range: String,
}

/// Per-hormone status used by the results display. Thresholds here are
/// independent of the hormonal sub-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HormoneAnalysis {
    pub testosterone: HormoneReading,
    pub amh: HormoneReading,
    pub lh: HormoneReading,
    pub fsh: HormoneReading,
    pub lh_fsh_ratio: HormoneReading,
    pub cortisol: HormoneReading,
}

impl HormoneAnalysis {
    pub fn analyze(profile: &Profile) -> Self {
        let input = profile.input();
        Self {
            testosterone: reading(
                input.testosterone,
                testosterone_status(input.testosterone),
                "15-70 ng/dL",
            ),
            amh: reading(input.amh, amh_status(input.amh), "1.0-4.0 ng/mL"),
            lh: reading(input.lh, lh_status(input.lh), "2-15 mIU/mL"),
            fsh: reading(input.fsh, fsh_status(input.fsh), "3-10 mIU/mL"),
            lh_fsh_ratio: reading(
                profile.lh_fsh_ratio(),
                lh_fsh_ratio_status(profile.lh_fsh_ratio()),
                "1.0-2.0",
            ),
            cortisol: reading(input.cortisol, cortisol_status(input.cortisol), "6-23 µg/dL"),
        }
    }

    /// Readings with their display names, in chart order.
    pub fn entries(&self) -> [(&'static str, &HormoneReading); 6] {
        [
            ("Testosterone", &self.testosterone),
            ("AMH", &self.amh),
            ("LH", &self.lh),
            ("FSH", &self.fsh),
            ("LH/FSH Ratio", &self.lh_fsh_ratio),
            ("Cortisol", &self.cortisol),
        ]
    }
}

fn reading(value: f64, status: HormoneStatus, range: &str) -> HormoneReading {
    HormoneReading {
        value,
        status,
        range: range.to_string(),
    }
}

pub fn testosterone_status(value: f64) -> HormoneStatus {
    if value > 70.0 {
        HormoneStatus::High
    } else if value > 55.0 {
        HormoneStatus::Borderline
    } else {
        HormoneStatus::Normal
    }
}

pub fn amh_status(value: f64) -> HormoneStatus {
    if value > 6.0 {
        HormoneStatus::High
    } else if value > 4.0 {
        HormoneStatus::Borderline
    } else {
        HormoneStatus::Normal
    }
}

pub fn lh_status(value: f64) -> HormoneStatus {
    if value > 15.0 {
        HormoneStatus::High
    } else if value > 12.0 {
        HormoneStatus::Borderline
    } else {
        HormoneStatus::Normal
    }
}

pub fn fsh_status(value: f64) -> HormoneStatus {
    if value < 3.0 {
        HormoneStatus::Low
    } else if value > 10.0 {
        HormoneStatus::High
    } else {
        HormoneStatus::Normal
    }
}

pub fn lh_fsh_ratio_status(value: f64) -> HormoneStatus {
    if value > 3.0 {
        HormoneStatus::High
    } else if value > 2.0 {
        HormoneStatus::Borderline
    } else {
        HormoneStatus::Normal
    }
}

pub fn cortisol_status(value: f64) -> HormoneStatus {
    if value > 23.0 {
        HormoneStatus::High
    } else if value < 6.0 {
        HormoneStatus::Low
    } else {
        HormoneStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DemoPreset;

    #[test]
    fn test_normal_preset_all_normal() {
        let analysis = HormoneAnalysis::analyze(&DemoPreset::Normal.profile());
        for (name, reading) in analysis.entries() {
            assert_eq!(reading.status, HormoneStatus::Normal, "{}", name);
        }
        assert_eq!(analysis.testosterone.value, 35.0);
        assert_eq!(analysis.lh_fsh_ratio.value, 1.09);
    }

    #[test]
    fn test_likely_pcos_preset() {
        let analysis = HormoneAnalysis::analyze(&DemoPreset::LikelyPcos.profile());
        assert_eq!(analysis.testosterone.status, HormoneStatus::High);
        assert_eq!(analysis.amh.status, HormoneStatus::High);
        assert_eq!(analysis.lh.status, HormoneStatus::High);
        assert_eq!(analysis.fsh.status, HormoneStatus::Normal);
        assert_eq!(analysis.lh_fsh_ratio.status, HormoneStatus::High);
        assert_eq!(analysis.cortisol.status, HormoneStatus::High);
    }

    #[test]
    fn test_borderline_thresholds() {
        assert_eq!(testosterone_status(55.0), HormoneStatus::Normal);
        assert_eq!(testosterone_status(56.0), HormoneStatus::Borderline);
        assert_eq!(testosterone_status(70.0), HormoneStatus::Borderline);
        assert_eq!(amh_status(4.5), HormoneStatus::Borderline);
        assert_eq!(lh_status(12.0), HormoneStatus::Normal);
        assert_eq!(lh_status(13.0), HormoneStatus::Borderline);
        assert_eq!(lh_status(15.5), HormoneStatus::High);
        assert_eq!(lh_fsh_ratio_status(2.4), HormoneStatus::Borderline);
    }

    #[test]
    fn test_low_statuses() {
        assert_eq!(fsh_status(2.9), HormoneStatus::Low);
        assert_eq!(fsh_status(3.0), HormoneStatus::Normal);
        assert_eq!(fsh_status(10.5), HormoneStatus::High);
        assert_eq!(cortisol_status(5.0), HormoneStatus::Low);
        assert_eq!(cortisol_status(6.0), HormoneStatus::Normal);
        assert_eq!(cortisol_status(23.5), HormoneStatus::High);
    }

    #[test]
    fn test_reference_ranges() {
        let analysis = HormoneAnalysis::analyze(&DemoPreset::Normal.profile());
        let ranges: Vec<&str> = analysis
            .entries()
            .iter()
            .map(|(_, r)| r.range.as_str())
            .collect();
        assert_eq!(
            ranges,
            vec![
                "15-70 ng/dL",
                "1.0-4.0 ng/mL",
                "2-15 mIU/mL",
                "3-10 mIU/mL",
                "1.0-2.0",
                "6-23 µg/dL"
            ]
        );
    }
}
