use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

use super::types::{Profile, ProfileInput};

/// Hand-authored demo profiles that stand in for real intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoPreset {
    Normal,
    Borderline,
    LikelyPcos,
}

impl DemoPreset {
    pub const ALL: [DemoPreset; 3] = [
        DemoPreset::Normal,
        DemoPreset::Borderline,
        DemoPreset::LikelyPcos,
    ];

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "normal" => Ok(DemoPreset::Normal),
            "borderline" => Ok(DemoPreset::Borderline),
            "likely-pcos" | "likelyPCOS" | "likely_pcos" => Ok(DemoPreset::LikelyPcos),
            other => bail!(
                "Unknown demo preset '{}'. Expected one of: normal, borderline, likely-pcos",
                other
            ),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            DemoPreset::Normal => "normal",
            DemoPreset::Borderline => "borderline",
            DemoPreset::LikelyPcos => "likely-pcos",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DemoPreset::Normal => "Normal",
            DemoPreset::Borderline => "Borderline",
            DemoPreset::LikelyPcos => "Likely PCOS",
        }
    }

    pub fn input(&self) -> ProfileInput {
        match self {
            DemoPreset::Normal => ProfileInput {
                age: 28,
                height: 162.0,
                weight: 58.0,
                family_history: false,
                cycle_length: 28,
                irregular_periods: false,
                missed_periods: false,
                acne_severity: 0,
                excess_hair_growth: 0,
                hair_fall: false,
                dark_patches: false,
                mood_swings: false,
                testosterone: 35.0,
                amh: 2.5,
                lh: 6.0,
                fsh: 5.5,
                cortisol: 12.0,
            },
            DemoPreset::Borderline => ProfileInput {
                age: 26,
                height: 160.0,
                weight: 68.0,
                family_history: true,
                cycle_length: 35,
                irregular_periods: true,
                missed_periods: false,
                acne_severity: 2,
                excess_hair_growth: 2,
                hair_fall: true,
                dark_patches: false,
                mood_swings: true,
                testosterone: 55.0,
                amh: 5.5,
                lh: 12.0,
                fsh: 5.0,
                cortisol: 18.0,
            },
            DemoPreset::LikelyPcos => ProfileInput {
                age: 24,
                height: 158.0,
                weight: 78.0,
                family_history: true,
                cycle_length: 45,
                irregular_periods: true,
                missed_periods: true,
                acne_severity: 3,
                excess_hair_growth: 4,
                hair_fall: true,
                dark_patches: true,
                mood_swings: true,
                testosterone: 85.0,
                amh: 10.5,
                lh: 18.0,
                fsh: 4.5,
                cortisol: 24.0,
            },
        }
    }

    /// The preset as a profile. Its derived BMI and LH/FSH ratio come out as
    /// 22.1/1.09, 26.6/2.4 and 31.2/4.0.
    pub fn profile(&self) -> Profile {
        Profile::from_input(self.input())
    }
}

impl FromStr for DemoPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        DemoPreset::parse(s)
    }
}

impl fmt::Display for DemoPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preset_names() {
        assert_eq!(DemoPreset::parse("normal").unwrap(), DemoPreset::Normal);
        assert_eq!(DemoPreset::parse(" borderline ").unwrap(), DemoPreset::Borderline);
        assert_eq!(DemoPreset::parse("likely-pcos").unwrap(), DemoPreset::LikelyPcos);
        assert_eq!(DemoPreset::parse("likelyPCOS").unwrap(), DemoPreset::LikelyPcos);
    }

    #[test]
    fn test_parse_unknown_preset() {
        let err = DemoPreset::parse("severe").unwrap_err();
        assert!(err.to_string().contains("severe"));
    }

    #[test]
    fn test_derived_values_match_authored_constants() {
        let normal = DemoPreset::Normal.profile();
        assert_eq!(normal.bmi(), 22.1);
        assert_eq!(normal.lh_fsh_ratio(), 1.09);

        let borderline = DemoPreset::Borderline.profile();
        assert_eq!(borderline.bmi(), 26.6);
        assert_eq!(borderline.lh_fsh_ratio(), 2.4);

        let likely = DemoPreset::LikelyPcos.profile();
        assert_eq!(likely.bmi(), 31.2);
        assert_eq!(likely.lh_fsh_ratio(), 4.0);
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for preset in DemoPreset::ALL {
            assert_eq!(DemoPreset::parse(&preset.to_string()).unwrap(), preset);
        }
    }
}
