pub mod formatter;

pub use formatter::{
    format_age, format_factor_chart, format_history, format_hormone_table, format_result,
    format_score, format_summary_line, format_trend, render_bar, should_use_colors,
};
