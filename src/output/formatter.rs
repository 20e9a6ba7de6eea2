use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::reconcile::{Tally, Verdict};

/// Output layout for per-record lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// "Link: <linkId> <score> <Match|Mismatch>"
    #[default]
    Text,
    /// Tab-separated: linkId, companyId, score, label
    Tsv,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

pub fn match_label(is_match: bool) -> &'static str {
    if is_match {
        "Match"
    } else {
        "Mismatch"
    }
}

/// Format one verdict as "Link: <linkId> <score> <Match|Mismatch>"
pub fn format_verdict_line(verdict: &Verdict, use_colors: bool) -> String {
    let label = match_label(verdict.is_match());
    if use_colors {
        let label = if verdict.is_match() {
            label.green().to_string()
        } else {
            label.red().to_string()
        };
        format!(
            "Link: {} {} {}",
            verdict.link_id.cyan(),
            verdict.score.final_score.bold(),
            label
        )
    } else {
        format!(
            "Link: {} {} {}",
            verdict.link_id, verdict.score.final_score, label
        )
    }
}

/// Format one verdict as tab-separated values for scripting (no colors)
pub fn format_verdict_tsv(verdict: &Verdict) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        verdict.link_id,
        verdict.company_id,
        verdict.score.final_score,
        match_label(verdict.is_match())
    )
}

pub fn format_verdict(verdict: &Verdict, format: OutputFormat, use_colors: bool) -> String {
    match format {
        OutputFormat::Text => format_verdict_line(verdict, use_colors),
        OutputFormat::Tsv => format_verdict_tsv(verdict),
    }
}

/// Per-component breakdown (for verbose mode)
pub fn format_verdict_detail(verdict: &Verdict) -> String {
    let score = &verdict.score;
    let mut detail = format!(
        "  Company: {}{}\n  Name: {:.3}  Email: {:.3}  Phone: {:.3}  Local: {:.3}\n  External: {:.3}  Final: {:.3}",
        verdict.company_id,
        if verdict.customer_found { "" } else { " (no customer)" },
        score.local.name,
        score.local.email,
        score.local.phone,
        score.local_score,
        score.external_score,
        score.final_score
    );
    if let Some(ref err) = verdict.scorer_error {
        detail.push_str(&format!("\n  Scorer error: {}", err));
    }
    detail
}

/// Two-line run summary
pub fn format_summary(tally: &Tally, use_colors: bool) -> String {
    if use_colors {
        format!(
            "Matches: {}\nMismatches: {}",
            tally.matches.green(),
            tally.mismatches.red()
        )
    } else {
        format!("Matches: {}\nMismatches: {}", tally.matches, tally.mismatches)
    }
}
