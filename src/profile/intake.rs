use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

use super::types::{Profile, ProfileInput};
use super::validation::{validate_step, IntakeStep};

/// Interactive three-step intake over any line-based input and output.
///
/// Each step re-prompts until its fields pass validation. Empty answers keep
/// the value shown in brackets.
pub struct IntakeWizard<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> IntakeWizard<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Walk through every step, starting from `start` (the blank form or a preset).
    pub fn run(&mut self, start: ProfileInput) -> Result<Profile> {
        let mut profile = start;
        for (index, step) in IntakeStep::ALL.iter().enumerate() {
            writeln!(self.output)?;
            writeln!(self.output, "Step {} of 3: {}", index + 1, step.title())?;
            let accepted = profile.clone();
            loop {
                self.ask_step(*step, &mut profile)?;
                match validate_step(*step, &profile) {
                    Ok(()) => break,
                    Err(errors) => {
                        for error in errors {
                            writeln!(self.output, "  Invalid: {}. Try again.", error)?;
                            // Offer the previous value again, not the rejected one
                            restore_field(&mut profile, &accepted, error.field);
                        }
                    }
                }
            }
        }
        Ok(Profile::from_input(profile))
    }

    fn ask_step(&mut self, step: IntakeStep, p: &mut ProfileInput) -> Result<()> {
        match step {
            IntakeStep::BasicDetails => {
                p.age = self.ask_number("Age (years)", p.age)?;
                p.height = self.ask_number("Height (cm)", p.height)?;
                p.weight = self.ask_number("Weight (kg)", p.weight)?;
                p.family_history = self.ask_yes_no("Family history of PCOS?", p.family_history)?;
            }
            IntakeStep::ClinicalSymptoms => {
                p.cycle_length = self.ask_number("Cycle length (days)", p.cycle_length)?;
                p.irregular_periods = self.ask_yes_no("Irregular periods?", p.irregular_periods)?;
                p.missed_periods = self.ask_yes_no("Missed periods?", p.missed_periods)?;
                p.acne_severity = self.ask_number("Acne severity (0-3)", p.acne_severity)?;
                p.excess_hair_growth =
                    self.ask_number("Excess hair growth (0-4)", p.excess_hair_growth)?;
                p.hair_fall = self.ask_yes_no("Hair fall?", p.hair_fall)?;
                p.dark_patches = self.ask_yes_no("Dark patches (neck/armpits)?", p.dark_patches)?;
                p.mood_swings = self.ask_yes_no("Mood swings?", p.mood_swings)?;
            }
            IntakeStep::HormonalValues => {
                p.testosterone = self.ask_number("Testosterone (ng/dL)", p.testosterone)?;
                p.amh = self.ask_number("AMH (ng/mL)", p.amh)?;
                p.lh = self.ask_number("LH (mIU/mL)", p.lh)?;
                p.fsh = self.ask_number("FSH (mIU/mL)", p.fsh)?;
                p.cortisol = self.ask_number("Cortisol (µg/dL)", p.cortisol)?;
            }
        }
        Ok(())
    }

    /// Prompt with a message and return the trimmed answer.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message)?;
        self.output.flush().context("Failed to flush output")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input ended before intake was complete");
        }
        Ok(line.trim().to_string())
    }

    fn ask_number<T>(&mut self, message: &str, current: T) -> Result<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        loop {
            let answer = self.prompt(&format!("{} [{}]: ", message, current))?;
            if answer.is_empty() {
                return Ok(current);
            }
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "  Invalid: '{}' is not a valid value. Try again.", answer)?,
            }
        }
    }

    fn ask_yes_no(&mut self, message: &str, current: bool) -> Result<bool> {
        let hint = if current { "Y/n" } else { "y/N" };
        loop {
            let answer = self.prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
            match answer.as_str() {
                "" => return Ok(current),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "  Invalid: '{}' is not yes or no. Try again.", answer)?,
            }
        }
    }
}

/// Copy one range-checked field back from `source`.
fn restore_field(target: &mut ProfileInput, source: &ProfileInput, field: &str) {
    match field {
        "age" => target.age = source.age,
        "height" => target.height = source.height,
        "weight" => target.weight = source.weight,
        "cycleLength" => target.cycle_length = source.cycle_length,
        "acneSeverity" => target.acne_severity = source.acne_severity,
        "excessHairGrowth" => target.excess_hair_growth = source.excess_hair_growth,
        "testosterone" => target.testosterone = source.testosterone,
        "amh" => target.amh = source.amh,
        "lh" => target.lh = source.lh,
        "fsh" => target.fsh = source.fsh,
        "cortisol" => target.cortisol = source.cortisol,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DemoPreset;
    use std::io::Cursor;

    // 4 basic + 8 clinical + 5 hormonal answers
    fn run_with(start: ProfileInput, answers: &str) -> (Result<Profile>, String) {
        let mut output = Vec::new();
        let result = IntakeWizard::new(Cursor::new(answers.to_string()), &mut output).run(start);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_accepting_all_defaults_keeps_start() {
        let answers = "\n".repeat(17);
        let (result, output) = run_with(DemoPreset::Borderline.input(), &answers);
        let profile = result.unwrap();
        assert_eq!(profile, DemoPreset::Borderline.profile());
        assert!(output.contains("Step 1 of 3: Basic Details"));
        assert!(output.contains("Step 3 of 3: Hormonal Values"));
    }

    #[test]
    fn test_answers_are_applied_and_derived() {
        let answers = [
            "30", "170", "85", "y", // basic
            "50", "y", "n", "1", "0", "", "", "", // clinical
            "80", "", "20", "5", "", // hormonal
        ]
        .join("\n")
            + "\n";
        let (result, _) = run_with(ProfileInput::default(), &answers);
        let profile = result.unwrap();
        assert_eq!(profile.input().age, 30);
        assert!(profile.input().family_history);
        assert_eq!(profile.input().cycle_length, 50);
        assert!(profile.input().irregular_periods);
        assert_eq!(profile.input().acne_severity, 1);
        assert_eq!(profile.input().testosterone, 80.0);
        // 85 / 1.7^2
        assert_eq!(profile.bmi(), 29.4);
        assert_eq!(profile.lh_fsh_ratio(), 4.0);
    }

    #[test]
    fn test_invalid_step_is_asked_again() {
        let mut answers = vec!["10", "", "", ""]; // age out of range
        answers.extend(["20", "", "", ""]); // step 1 again
        answers.extend(vec![""; 13]);
        let (result, output) = run_with(ProfileInput::default(), &(answers.join("\n") + "\n"));
        assert_eq!(result.unwrap().input().age, 20);
        assert!(output.contains("age: value below minimum"));
    }

    #[test]
    fn test_rejected_value_is_not_offered_again() {
        let mut answers = vec!["10", "170", "", ""]; // age out of range
        answers.extend(["", "", "", ""]); // accept the offered values
        answers.extend(vec![""; 13]);
        let (result, output) = run_with(ProfileInput::default(), &(answers.join("\n") + "\n"));
        let profile = result.unwrap();
        assert_eq!(profile.input().age, 25);
        assert_eq!(profile.input().height, 170.0);
        assert_eq!(output.matches("Age (years) [25]: ").count(), 2);
        assert!(!output.contains("Age (years) [10]"));
    }

    #[test]
    fn test_yes_no_typo_reprompts_field() {
        let mut answers = vec!["", "", "", "yse", "yes"];
        answers.extend(vec![""; 13]);
        let (result, output) = run_with(ProfileInput::default(), &(answers.join("\n") + "\n"));
        assert!(result.unwrap().input().family_history);
        assert!(output.contains("Invalid: 'yse' is not yes or no. Try again."));
    }

    #[test]
    fn test_yes_no_accepts_explicit_no() {
        let mut answers = vec!["", "", "", "no"];
        answers.extend(vec![""; 13]);
        let (result, _) = run_with(DemoPreset::Borderline.input(), &(answers.join("\n") + "\n"));
        assert!(!result.unwrap().input().family_history);
    }

    #[test]
    fn test_out_of_type_range_number_reprompts() {
        // acne severity is the 4th clinical prompt
        let mut answers = vec![""; 7];
        answers.extend(["300", "2"]);
        answers.extend(vec![""; 9]);
        let (result, output) = run_with(ProfileInput::default(), &(answers.join("\n") + "\n"));
        assert_eq!(result.unwrap().input().acne_severity, 2);
        assert!(output.contains("'300' is not a valid value"));
    }

    #[test]
    fn test_non_numeric_answer_reprompts_field() {
        let mut answers = vec!["abc", "33"];
        answers.extend(vec![""; 16]);
        let (result, output) = run_with(ProfileInput::default(), &(answers.join("\n") + "\n"));
        assert_eq!(result.unwrap().input().age, 33);
        assert!(output.contains("'abc' is not a valid value"));
    }

    #[test]
    fn test_input_ending_early_is_error() {
        let (result, _) = run_with(ProfileInput::default(), "30\n");
        assert!(result.unwrap_err().to_string().contains("Input ended"));
    }
}
