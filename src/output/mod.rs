//! Output formatting for athena.
//!
//! This module renders queue state and drain results in various formats.

mod json;
mod pretty;

use chrono::Utc;
use uuid::Uuid;

use crate::backend::{AnalysisResult, EducationalContent};
use crate::cli::args::OutputFormat;
use crate::error::AthenaError;
use crate::offline::{DrainSummary, QueueStats, QueuedAction};

pub use json::*;
pub use pretty::*;

/// Format a queue snapshot based on output format
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_queue(
    actions: &[QueuedAction],
    total: usize,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    match format {
        OutputFormat::Pretty => Ok(format_queue_pretty(actions, total, Utc::now())),
        OutputFormat::Json => format_queue_json(actions, total),
    }
}

/// Format queue statistics based on output format
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_stats(stats: &QueueStats, format: OutputFormat) -> Result<String, AthenaError> {
    match format {
        OutputFormat::Pretty => Ok(format_stats_pretty(stats, Utc::now())),
        OutputFormat::Json => format_stats_json(stats),
    }
}

/// Format a drain result based on output format
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_summary(
    summary: Option<&DrainSummary>,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    match format {
        OutputFormat::Pretty => Ok(format_summary_pretty(summary)),
        OutputFormat::Json => format_summary_json(summary),
    }
}

/// Format a newly queued action based on output format
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_queued(
    id: Uuid,
    kind: &str,
    pending: bool,
    summary: Option<&DrainSummary>,
    analysis: Option<&AnalysisResult>,
    format: OutputFormat,
) -> Result<String, AthenaError> {
    match format {
        OutputFormat::Pretty => Ok(format_queued_pretty(id, kind, pending, summary, analysis)),
        OutputFormat::Json => format_queued_json(id, kind, pending, summary, analysis),
    }
}

/// Format one analysis result based on output format
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_analysis(result: &AnalysisResult, format: OutputFormat) -> Result<String, AthenaError> {
    match format {
        OutputFormat::Pretty => Ok(format_analysis_pretty(result)),
        OutputFormat::Json => to_json(result),
    }
}

/// Format previous analyses based on output format
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_analyses(
    results: &[AnalysisResult],
    format: OutputFormat,
) -> Result<String, AthenaError> {
    match format {
        OutputFormat::Pretty => Ok(format_analyses_pretty(results)),
        OutputFormat::Json => format_analyses_json(results),
    }
}

/// Format educational articles based on output format
///
/// # Errors
///
/// Returns `AthenaError::Parse` if JSON serialization fails.
pub fn format_education(
    items: &[EducationalContent],
    format: OutputFormat,
) -> Result<String, AthenaError> {
    match format {
        OutputFormat::Pretty => Ok(format_education_pretty(items)),
        OutputFormat::Json => format_education_json(items),
    }
}
