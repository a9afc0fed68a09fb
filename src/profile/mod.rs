pub mod intake;
pub mod presets;
pub mod types;
pub mod validation;

pub use intake::IntakeWizard;
pub use presets::DemoPreset;
pub use types::{derive_bmi, derive_lh_fsh_ratio, Profile, ProfileInput};
pub use validation::{validate_profile, validate_step, FieldError, FieldErrorKind, IntakeStep};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a profile from a YAML or JSON file (chosen by extension, YAML otherwise).
///
/// Only the source fields are read; BMI and the LH/FSH ratio are derived.
pub fn load_profile(path: &Path) -> Result<Profile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile at {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let input: ProfileInput = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse profile: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse profile: invalid YAML in {}", path.display()))?
    };

    Ok(Profile::from_input(input))
}
