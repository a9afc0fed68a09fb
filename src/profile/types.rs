use serde::{Deserialize, Serialize};

/// Source fields of a health profile, as collected by intake.
///
/// `bmi` and the LH/FSH ratio are not part of the input; they are derived
/// when the input is turned into a [`Profile`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    // Basic details
    pub age: u32,
    /// Height in cm
    pub height: f64,
    /// Weight in kg
    pub weight: f64,
    #[serde(default)]
    pub family_history: bool,

    // Menstrual and clinical symptoms
    /// Cycle length in days
    pub cycle_length: u32,
    #[serde(default)]
    pub irregular_periods: bool,
    #[serde(default)]
    pub missed_periods: bool,
    /// 0-3
    #[serde(default)]
    pub acne_severity: u8,
    /// 0-4
    #[serde(default)]
    pub excess_hair_growth: u8,
    #[serde(default)]
    pub hair_fall: bool,
    /// Neck or armpits
    #[serde(default)]
    pub dark_patches: bool,
    #[serde(default)]
    pub mood_swings: bool,

    // Hormonal values
    /// ng/dL
    pub testosterone: f64,
    /// ng/mL
    pub amh: f64,
    /// mIU/mL
    pub lh: f64,
    /// mIU/mL
    pub fsh: f64,
    /// µg/dL
    pub cortisol: f64,
}

impl Default for ProfileInput {
    /// Starting values of a blank intake form.
    fn default() -> Self {
        Self {
            age: 25,
            height: 160.0,
            weight: 60.0,
            family_history: false,
            cycle_length: 28,
            irregular_periods: false,
            missed_periods: false,
            acne_severity: 0,
            excess_hair_growth: 0,
            hair_fall: false,
            dark_patches: false,
            mood_swings: false,
            testosterone: 40.0,
            amh: 2.5,
            lh: 6.0,
            fsh: 5.0,
            cortisol: 12.0,
        }
    }
}

/// A submitted health profile: the source fields plus the two derived ones.
///
/// The derived fields can only change through [`Profile::update`] and the
/// setters, which re-derive them whenever their sources change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ProfileInput")]
pub struct Profile {
    #[serde(flatten)]
    input: ProfileInput,
    bmi: f64,
    lh_fsh_ratio: f64,
}

impl Profile {
    pub fn from_input(input: ProfileInput) -> Self {
        let mut profile = Self {
            input,
            bmi: 0.0,
            lh_fsh_ratio: 0.0,
        };
        profile.rederive();
        profile
    }

    pub fn input(&self) -> &ProfileInput {
        &self.input
    }

    pub fn into_input(self) -> ProfileInput {
        self.input
    }

    /// Body mass index in kg/m², rounded to one decimal.
    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    /// LH divided by FSH, rounded to two decimals.
    pub fn lh_fsh_ratio(&self) -> f64 {
        self.lh_fsh_ratio
    }

    /// Apply an arbitrary change to the source fields, then re-derive.
    pub fn update<F: FnOnce(&mut ProfileInput)>(&mut self, change: F) {
        change(&mut self.input);
        self.rederive();
    }

    pub fn set_height(&mut self, height: f64) {
        self.update(|input| input.height = height);
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.update(|input| input.weight = weight);
    }

    pub fn set_lh(&mut self, lh: f64) {
        self.update(|input| input.lh = lh);
    }

    pub fn set_fsh(&mut self, fsh: f64) {
        self.update(|input| input.fsh = fsh);
    }

    // A non-positive source leaves the previous derived value in place.
    fn rederive(&mut self) {
        if let Some(bmi) = derive_bmi(self.input.height, self.input.weight) {
            self.bmi = bmi;
        }
        if let Some(ratio) = derive_lh_fsh_ratio(self.input.lh, self.input.fsh) {
            self.lh_fsh_ratio = ratio;
        }
    }
}

impl From<ProfileInput> for Profile {
    fn from(input: ProfileInput) -> Self {
        Self::from_input(input)
    }
}

/// weight / (height in m)², rounded to one decimal.
/// Returns None unless both height and weight are positive.
pub fn derive_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if height_cm > 0.0 && weight_kg > 0.0 {
        let height_m = height_cm / 100.0;
        let bmi = weight_kg / (height_m * height_m);
        Some(round_to(bmi, 1))
    } else {
        None
    }
}

/// lh / fsh, rounded to two decimals.
/// Returns None unless both values are positive.
pub fn derive_lh_fsh_ratio(lh: f64, fsh: f64) -> Option<f64> {
    if lh > 0.0 && fsh > 0.0 {
        Some(round_to(lh / fsh, 2))
    } else {
        None
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
