use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::config::ColorMode;
use crate::scoring::{FactorStatus, HormoneAnalysis, HormoneStatus, RiskFactor, RiskLevel, RiskResult};
use crate::store::{StoredReport, Trend};

/// Bar width used when stdout is not a terminal
const DEFAULT_BAR_WIDTH: usize = 30;
const MAX_BAR_WIDTH: usize = 40;
/// Label column plus the score and status columns around a bar
const CHART_FIXED_WIDTH: usize = 24 + 8 + 13;

/// Decide whether to color output for a color mode
pub fn should_use_colors(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    }
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

fn bar_width() -> usize {
    match get_terminal_width() {
        Some(width) if width > CHART_FIXED_WIDTH + 10 => {
            (width - CHART_FIXED_WIDTH).min(MAX_BAR_WIDTH)
        }
        Some(_) => 10,
        None => DEFAULT_BAR_WIDTH,
    }
}

/// Score with one decimal ("88.8")
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

fn paint_level(level: RiskLevel, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match level {
        RiskLevel::Low => text.green().bold().to_string(),
        RiskLevel::Moderate => text.yellow().bold().to_string(),
        RiskLevel::High => text.red().bold().to_string(),
    }
}

fn paint_status(status: FactorStatus, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match status {
        FactorStatus::Normal => text.green().to_string(),
        FactorStatus::Borderline => text.yellow().to_string(),
        FactorStatus::Abnormal => text.red().to_string(),
    }
}

fn paint_hormone(status: HormoneStatus, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match status {
        HormoneStatus::Normal => text.green().to_string(),
        HormoneStatus::Borderline => text.yellow().to_string(),
        HormoneStatus::High | HormoneStatus::Low => text.red().to_string(),
    }
}

/// Horizontal bar for a 0-100 value. Out-of-range values are clamped for drawing only.
pub fn render_bar(value: f64, width: usize) -> String {
    let filled = ((value.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// One line per factor: label, bar of the raw sub-score, sub-score, status.
pub fn format_factor_chart(factors: &[RiskFactor], width: usize, use_colors: bool) -> String {
    factors
        .iter()
        .map(|factor| {
            let bar = render_bar(factor.contribution, width);
            let status = format!("{:<10}", factor.status.to_string());
            format!(
                "  {:<24}{} {:>5.0}  {}",
                factor.name,
                paint_status(factor.status, &bar, use_colors),
                factor.contribution,
                paint_status(factor.status, &status, use_colors)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table of hormone readings with status and reference range.
pub fn format_hormone_table(analysis: &HormoneAnalysis, use_colors: bool) -> String {
    analysis
        .entries()
        .iter()
        .map(|(name, reading)| {
            let status = format!("{:<10}", reading.status.to_string());
            format!(
                "  {:<14}{:>8.2}  {}  {}",
                name,
                reading.value,
                paint_hormone(reading.status, &status, use_colors),
                if use_colors {
                    reading.range.dimmed().to_string()
                } else {
                    reading.range.clone()
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full multi-section result summary
pub fn format_result(result: &RiskResult, use_colors: bool) -> String {
    let headline = format!(
        "{}  score {} / 100  (confidence {:.0}%)",
        paint_level(result.risk_level, result.risk_level.label(), use_colors),
        format_score(result.score),
        result.confidence
    );

    let mut sections = vec![
        headline,
        result.risk_level.guidance().to_string(),
        String::new(),
        "Risk factors".to_string(),
        format_factor_chart(&result.factors, bar_width(), use_colors),
    ];

    let details: Vec<String> = result
        .factors
        .iter()
        .map(|f| format!("  {:<24}{}", f.name, f.description))
        .collect();
    sections.push(String::new());
    sections.push(details.join("\n"));

    sections.push(String::new());
    sections.push("Hormone analysis".to_string());
    sections.push(format_hormone_table(&result.hormone_analysis, use_colors));

    sections.join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

fn format_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = format_age(now - date);
    let when = date.format("%Y-%m-%d %H:%M");
    if age == "now" {
        format!("{} (now)", when)
    } else {
        format!("{} ({} ago)", when, age)
    }
}

/// Format stored reports as a table, newest first.
/// Columns: index, short id, date, level, score. No headers.
pub fn format_history(reports: &[StoredReport], use_colors: bool) -> String {
    if reports.is_empty() {
        return "No saved reports.".to_string();
    }

    let now = Utc::now();
    reports
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            let index_str = format!("{:>2}.", idx + 1);
            let level = format!("{:<14}", report.result.risk_level.label());
            let score = format!("{:>5}", format_score(report.result.score));
            if use_colors {
                format!(
                    "{} {}  {:<28}  {}{}",
                    index_str.dimmed(),
                    report.short_id().cyan(),
                    format_date(report.date, now),
                    paint_level(report.result.risk_level, &level, true),
                    score.bold()
                )
            } else {
                format!(
                    "{} {}  {:<28}  {}{}",
                    index_str,
                    report.short_id(),
                    format_date(report.date, now),
                    level,
                    score
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_trend(trend: Option<Trend>, use_colors: bool) -> String {
    let text = match trend {
        None => return "Trend: not enough reports".to_string(),
        Some(t) => t.to_string(),
    };
    let painted = match (trend, use_colors) {
        (Some(Trend::Increasing), true) => text.red().to_string(),
        (Some(Trend::Decreasing), true) => text.green().to_string(),
        (_, true) => text.dimmed().to_string(),
        (_, false) => text,
    };
    format!("Trend: {}", painted)
}

/// One summary line for a labelled result (demo listing)
pub fn format_summary_line(label: &str, result: &RiskResult, use_colors: bool) -> String {
    let level = format!("{:<14}", result.risk_level.label());
    format!(
        "  {:<14}{}{:>5}",
        label,
        paint_level(result.risk_level, &level, use_colors),
        format_score(result.score)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DemoPreset;
    use crate::scoring::{compute_risk, FixedConfidence};

    fn result_for(preset: DemoPreset) -> RiskResult {
        compute_risk(&preset.profile(), &mut FixedConfidence(0.2))
    }

    fn report_for(preset: DemoPreset, id: &str, age: Duration) -> StoredReport {
        StoredReport {
            id: id.to_string(),
            date: Utc::now() - age,
            profile: preset.profile(),
            result: result_for(preset),
        }
    }

    #[test]
    fn test_should_use_colors_forced() {
        assert!(should_use_colors(ColorMode::Always));
        assert!(!should_use_colors(ColorMode::Never));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(88.75), "88.8");
        assert_eq!(format_score(1.5), "1.5");
        assert_eq!(format_score(0.0), "0.0");
    }

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0.0, 4), "░░░░");
        assert_eq!(render_bar(50.0, 4), "██░░");
        assert_eq!(render_bar(100.0, 4), "████");
        assert_eq!(render_bar(150.0, 4), "████");
        assert_eq!(render_bar(-10.0, 4), "░░░░");
    }

    #[test]
    fn test_factor_chart_plain() {
        let result = result_for(DemoPreset::LikelyPcos);
        let chart = format_factor_chart(&result.factors, 10, false);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("BMI"));
        assert!(lines[0].contains("███████░░░"));
        assert!(lines[0].contains("70"));
        assert!(lines[0].contains("abnormal"));
        assert!(lines[4].contains("Family History"));
        assert!(lines[4].contains("borderline"));
    }

    #[test]
    fn test_hormone_table_plain() {
        let result = result_for(DemoPreset::Normal);
        let table = format_hormone_table(&result.hormone_analysis, false);
        assert_eq!(table.lines().count(), 6);
        assert!(table.contains("Testosterone"));
        assert!(table.contains("35.00"));
        assert!(table.contains("15-70 ng/dL"));
        assert!(table.contains("LH/FSH Ratio"));
    }

    #[test]
    fn test_format_result_plain() {
        let output = format_result(&result_for(DemoPreset::Normal), false);
        assert!(output.starts_with("Low Risk  score 1.5 / 100  (confidence 75%)"));
        assert!(output.contains("Continue maintaining a healthy lifestyle"));
        assert!(output.contains("Risk factors"));
        assert!(output.contains("BMI 22.1 kg/m²"));
        assert!(output.contains("Hormone analysis"));
    }

    #[test]
    fn test_format_result_colored_has_escapes() {
        let output = format_result(&result_for(DemoPreset::LikelyPcos), true);
        assert!(output.contains("\u{1b}["));
        assert!(output.contains("High Risk"));
    }

    #[test]
    fn test_format_history_empty() {
        assert_eq!(format_history(&[], false), "No saved reports.");
    }

    #[test]
    fn test_format_history_rows() {
        let reports = vec![
            report_for(DemoPreset::LikelyPcos, "aaaa1111-0000-4000-8000-000000000000", Duration::hours(2)),
            report_for(DemoPreset::Normal, "bbbb2222-0000-4000-8000-000000000000", Duration::days(3)),
        ];
        let output = format_history(&reports, false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1. aaaa1111"));
        assert!(lines[0].contains("High Risk"));
        assert!(lines[0].contains("88.8"));
        assert!(lines[0].contains("2h ago"));
        assert!(lines[1].starts_with(" 2. bbbb2222"));
        assert!(lines[1].contains("3d ago"));
    }

    #[test]
    fn test_format_trend() {
        assert_eq!(format_trend(None, false), "Trend: not enough reports");
        assert_eq!(format_trend(Some(Trend::Stable), false), "Trend: stable");
        assert_eq!(format_trend(Some(Trend::Increasing), false), "Trend: increasing");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::seconds(30)), "now");
        assert_eq!(format_age(Duration::minutes(30)), "30m");
        assert_eq!(format_age(Duration::hours(3)), "3h");
        assert_eq!(format_age(Duration::days(2)), "2d");
        assert_eq!(format_age(Duration::weeks(2)), "2w");
    }

    #[test]
    fn test_summary_line() {
        let result = result_for(DemoPreset::Borderline);
        let line = format_summary_line("Borderline", &result, false);
        assert!(line.contains("Borderline"));
        assert!(line.contains("Moderate Risk"));
        assert!(line.ends_with(&format_score(result.score)));
        assert!(line.starts_with("  Borderline"));
    }
}
