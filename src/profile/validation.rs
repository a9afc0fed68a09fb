use std::fmt;

use super::types::ProfileInput;

/// The three intake steps, in the order the form walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStep {
    BasicDetails,
    ClinicalSymptoms,
    HormonalValues,
}

impl IntakeStep {
    pub const ALL: [IntakeStep; 3] = [
        IntakeStep::BasicDetails,
        IntakeStep::ClinicalSymptoms,
        IntakeStep::HormonalValues,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            IntakeStep::BasicDetails => "Basic Details",
            IntakeStep::ClinicalSymptoms => "Clinical Symptoms",
            IntakeStep::HormonalValues => "Hormonal Values",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    BelowMinimum,
    AboveMaximum,
}

/// One out-of-range intake field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
    pub value: f64,
    pub bound: f64,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FieldErrorKind::BelowMinimum => write!(
                f,
                "{}: value below minimum ({} < {})",
                self.field, self.value, self.bound
            ),
            FieldErrorKind::AboveMaximum => write!(
                f,
                "{}: value above maximum ({} > {})",
                self.field, self.value, self.bound
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Inclusive range accepted for one field.
struct FieldRange {
    field: &'static str,
    min: f64,
    max: f64,
}

static BASIC_RANGES: [FieldRange; 3] = [
    FieldRange { field: "age", min: 15.0, max: 60.0 },
    FieldRange { field: "height", min: 100.0, max: 220.0 },
    FieldRange { field: "weight", min: 30.0, max: 200.0 },
];

static CLINICAL_RANGES: [FieldRange; 3] = [
    FieldRange { field: "cycleLength", min: 15.0, max: 90.0 },
    FieldRange { field: "acneSeverity", min: 0.0, max: 3.0 },
    FieldRange { field: "excessHairGrowth", min: 0.0, max: 4.0 },
];

static HORMONAL_RANGES: [FieldRange; 5] = [
    FieldRange { field: "testosterone", min: 0.0, max: 200.0 },
    FieldRange { field: "amh", min: 0.0, max: 50.0 },
    FieldRange { field: "lh", min: 0.0, max: 100.0 },
    FieldRange { field: "fsh", min: 0.0, max: 50.0 },
    FieldRange { field: "cortisol", min: 0.0, max: 50.0 },
];

fn check(range: &FieldRange, value: f64, errors: &mut Vec<FieldError>) {
    if value.is_nan() || value < range.min {
        errors.push(FieldError {
            field: range.field,
            kind: FieldErrorKind::BelowMinimum,
            value,
            bound: range.min,
        });
    } else if value > range.max {
        errors.push(FieldError {
            field: range.field,
            kind: FieldErrorKind::AboveMaximum,
            value,
            bound: range.max,
        });
    }
}

fn step_values(step: IntakeStep, input: &ProfileInput) -> Vec<(&'static FieldRange, f64)> {
    match step {
        IntakeStep::BasicDetails => vec![
            (&BASIC_RANGES[0], input.age as f64),
            (&BASIC_RANGES[1], input.height),
            (&BASIC_RANGES[2], input.weight),
        ],
        IntakeStep::ClinicalSymptoms => vec![
            (&CLINICAL_RANGES[0], input.cycle_length as f64),
            (&CLINICAL_RANGES[1], input.acne_severity as f64),
            (&CLINICAL_RANGES[2], input.excess_hair_growth as f64),
        ],
        IntakeStep::HormonalValues => vec![
            (&HORMONAL_RANGES[0], input.testosterone),
            (&HORMONAL_RANGES[1], input.amh),
            (&HORMONAL_RANGES[2], input.lh),
            (&HORMONAL_RANGES[3], input.fsh),
            (&HORMONAL_RANGES[4], input.cortisol),
        ],
    }
}

/// Validate the fields of a single intake step.
/// Returns all errors for the step at once (not just the first).
pub fn validate_step(step: IntakeStep, input: &ProfileInput) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    for (range, value) in step_values(step, input) {
        check(range, value, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a whole profile before it is submitted for scoring.
/// Returns all validation errors across every step.
pub fn validate_profile(input: &ProfileInput) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = IntakeStep::ALL
        .iter()
        .filter_map(|step| validate_step(*step, input).err())
        .flatten()
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
