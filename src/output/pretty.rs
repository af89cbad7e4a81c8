use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use colored::Colorize;
use uuid::Uuid;

use crate::backend::{AnalysisResult, EducationalContent};
use crate::offline::{DrainSummary, QueueStats, QueuedAction};

const PAYLOAD_PREVIEW: usize = 48;

/// Format a queue snapshot as a pretty table
pub fn format_queue_pretty(actions: &[QueuedAction], total: usize, now: DateTime<Utc>) -> String {
    if actions.is_empty() {
        return "Offline queue (0 actions)\n  Nothing waiting to be sent".to_string();
    }

    let mut output = if actions.len() == total {
        format!("Offline queue ({total} actions)\n")
    } else {
        format!("Offline queue ({} of {total} actions)\n", actions.len())
    };
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for action in actions {
        let marker = if action.retry_count == 0 {
            "●".white()
        } else {
            "↻".yellow()
        };

        let _ = write!(
            output,
            "{} {}  {}  {}",
            marker,
            action.kind.bold(),
            short_id(action.id).dimmed(),
            format_age(action.timestamp, now).dimmed()
        );

        if action.retry_count > 0 {
            let attempts = action.max_retries.map_or_else(
                || format!("retry {}", action.retry_count),
                |max| format!("retry {}/{max}", action.retry_count),
            );
            let _ = write!(output, "  {}", attempts.yellow());
        }

        let _ = writeln!(output, "  {}", preview(&action.payload.to_string()).cyan());
    }

    output
}

/// Format queue statistics
pub fn format_stats_pretty(stats: &QueueStats, now: DateTime<Utc>) -> String {
    let mut lines = vec!["Offline queue".bold().to_string(), "─".repeat(40)];

    lines.push(format!(
        "  {}: {}",
        "Pending".dimmed(),
        stats.pending.to_string().cyan()
    ));
    lines.push(format!(
        "  {}: {}",
        "Retrying".dimmed(),
        if stats.retrying > 0 {
            stats.retrying.to_string().yellow()
        } else {
            stats.retrying.to_string().normal()
        }
    ));

    if let Some(oldest) = stats.oldest {
        lines.push(format!(
            "  {}: {} ({})",
            "Oldest".dimmed(),
            oldest.format("%Y-%m-%d %H:%M"),
            format_age(oldest, now)
        ));
    }

    lines.join("\n")
}

/// Format the outcome of a drain request
pub fn format_summary_pretty(summary: Option<&DrainSummary>) -> String {
    let Some(summary) = summary else {
        return format!("{} Offline; queue left untouched", "○".dimmed());
    };

    if summary.attempted == 0 {
        return format!("{} Queue is empty, nothing to send", "✓".green());
    }

    let mut line = format!(
        "{} Sent {} of {} queued actions",
        if summary.failed == 0 { "✓".green() } else { "!".yellow() },
        summary.succeeded,
        summary.attempted
    );

    if summary.failed > 0 {
        let _ = write!(line, ", {} failed", summary.failed.to_string().yellow());
    }
    if summary.dropped > 0 {
        let _ = write!(line, ", {} dropped", summary.dropped.to_string().red());
    }
    if summary.remaining > 0 {
        let _ = write!(line, "\n  {} still waiting", summary.remaining);
    }

    line
}

/// Format a newly queued action, plus the drain it triggered if any
pub fn format_queued_pretty(
    id: Uuid,
    kind: &str,
    pending: bool,
    summary: Option<&DrainSummary>,
    analysis: Option<&AnalysisResult>,
) -> String {
    let headline = if pending {
        format!("{} Queued {} {}", "+".green(), kind.bold(), short_id(id).dimmed())
    } else {
        format!("{} Delivered {} {}", "✓".green(), kind.bold(), short_id(id).dimmed())
    };

    let mut output = match summary {
        Some(summary) if pending => format!("{headline}\n{}", format_summary_pretty(Some(summary))),
        Some(_) => headline,
        None => format!("{headline}\n  Will be sent when back online"),
    };

    if let Some(analysis) = analysis {
        output.push('\n');
        output.push_str(&"─".repeat(40));
        output.push('\n');
        output.push_str(&format_analysis_pretty(analysis));
    }

    output
}

fn verdict(result: &AnalysisResult) -> String {
    if result.is_misinformation {
        format!("{} {}", "✗".red(), "Likely misinformation".red().bold())
    } else {
        format!("{} {}", "✓".green(), "Likely accurate".green().bold())
    }
}

fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

/// Format one analysis result
pub fn format_analysis_pretty(result: &AnalysisResult) -> String {
    let mut output = verdict(result);
    output.push('\n');
    let _ = writeln!(output, "  {}: {}", "Confidence".dimmed(), percent(result.confidence));

    if let Some(id) = &result.id {
        let _ = writeln!(output, "  {}: {}", "ID".dimmed(), id);
    }

    if !result.explanation.is_empty() {
        let _ = writeln!(output, "  {}: {}", "Explanation".dimmed(), result.explanation);
    }

    if !result.sources.is_empty() {
        let _ = writeln!(output, "  {}:", "Sources".dimmed());
        for source in &result.sources {
            match &source.url {
                Some(url) => {
                    let _ = writeln!(output, "    - {} {}", source.title, url.cyan());
                }
                None => {
                    let _ = writeln!(output, "    - {}", source.title);
                }
            }
        }
    }

    output
}

/// Format previous analyses as a list
pub fn format_analyses_pretty(results: &[AnalysisResult]) -> String {
    if results.is_empty() {
        return "Analysis history (0)\n  No analyses yet".to_string();
    }

    let mut output = format!("Analysis history ({})\n", results.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for result in results {
        let marker = if result.is_misinformation {
            "✗".red()
        } else {
            "✓".green()
        };
        let _ = write!(output, "{} {:>4}", marker, percent(result.confidence));
        if let Some(id) = &result.id {
            let _ = write!(output, "  {}", id.dimmed());
        }
        let _ = writeln!(output, "  {}", preview(&result.explanation));
    }

    output
}

/// Format educational articles as a list
pub fn format_education_pretty(items: &[EducationalContent]) -> String {
    if items.is_empty() {
        return "Learn (0 articles)\n  No articles".to_string();
    }

    let mut output = format!("Learn ({} articles)\n", items.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for item in items {
        let _ = write!(output, "{}  {}", item.title.bold(), item.id.dimmed());
        if !item.category.is_empty() || !item.difficulty.is_empty() {
            let _ = write!(
                output,
                "  {}",
                format!("[{} · {}]", item.category, item.difficulty).yellow()
            );
        }
        if !item.tags.is_empty() {
            let tags = item
                .tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(output, "  {}", tags.cyan());
        }
        output.push('\n');
    }

    output
}

fn short_id(id: Uuid) -> String {
    let text = id.simple().to_string();
    text[text.len() - 8..].to_string()
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PAYLOAD_PREVIEW {
        return text.to_string();
    }
    let head: String = text.chars().take(PAYLOAD_PREVIEW - 1).collect();
    format!("{head}…")
}

/// Describe how long ago `then` was, relative to `now`.
pub fn format_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
