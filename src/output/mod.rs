pub mod formatter;
pub mod report;

pub use formatter::{
    format_summary, format_verdict, format_verdict_detail, format_verdict_line,
    format_verdict_tsv, match_label, should_use_colors, OutputFormat,
};
pub use report::write_report;
