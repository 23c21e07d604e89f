//! Type definitions for the rule system.
//!
//! - [`Severity`] - Diagnostic severity levels (Info, Warning, Error)
//! - [`RuleCategory`] - Rule categories (Usage, Schema, Typing)
//! - [`Diagnostic`] - Individual findings with location and context
//! - [`AnalysisReport`] - Complete analysis results

use serde::Serialize;

use crate::{analysis::SiteAnalysis, probe::ProbeRecord, syntax::Location};

/// Severity level of a diagnostic.
///
/// Ordered from lowest to highest severity for sorting purposes.
/// Exit codes are determined by the highest severity diagnostic found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Informational, does not affect exit code
    Info,
    /// May indicate a problem (exit code 1)
    Warning,
    /// Must be addressed (exit code 2)
    Error
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR")
        }
    }
}

/// Category of a rule for grouping and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleCategory {
    /// Parameter registrations the command text never uses
    Usage,
    /// Command text rejected by the schema
    Schema,
    /// Parameter values with no placeholder type
    Typing
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage => write!(f, "Usage"),
            Self::Schema => write!(f, "Schema"),
            Self::Typing => write!(f, "Typing")
        }
    }
}

/// A single finding.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Unique rule identifier (e.g., "SQLV001")
    pub rule_id:    &'static str,
    /// Human-readable rule name
    pub rule_name:  &'static str,
    pub message:    String,
    pub severity:   Severity,
    pub category:   RuleCategory,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
    pub location:   Location,
    /// Index of the construction site the finding belongs to
    pub site_index: usize
}

impl Diagnostic {
    /// Diagnostic carrying the defaults of `info`
    pub fn new(info: &RuleInfo, message: String, location: Location, site_index: usize) -> Self {
        Self {
            rule_id: info.id,
            rule_name: info.name,
            message,
            severity: info.severity,
            category: info.category,
            suggestion: None,
            location,
            site_index
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Metadata about a rule for identification and configuration.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    /// Unique rule identifier (e.g., "SQLV001")
    pub id:       &'static str,
    /// Human-readable rule name
    pub name:     &'static str,
    /// Default severity level
    pub severity: Severity,
    pub category: RuleCategory
}

/// Complete analysis report.
///
/// Use [`error_count`](Self::error_count),
/// [`warning_count`](Self::warning_count), and [`info_count`](Self::info_count)
/// to get diagnostic counts by severity.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub diagnostics: Vec<Diagnostic>,
    /// Per-site analysis results
    pub sites:       Vec<SiteAnalysis>,
    /// Probe outcome per site, empty when the probe did not run
    pub probes:      Vec<ProbeRecord>,
    /// Number of syntax models analyzed
    pub files_count: usize,
    /// Number of rules executed
    pub rules_count: usize
}

impl AnalysisReport {
    pub fn new(files_count: usize, rules_count: usize) -> Self {
        Self {
            diagnostics: Vec::new(),
            sites: Vec::new(),
            probes: Vec::new(),
            files_count,
            rules_count
        }
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn sites_count(&self) -> usize {
        self.sites.len()
    }

    /// Order by severity (highest first), then site index
    pub fn sort_diagnostics(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.site_index.cmp(&b.site_index))
        });
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}
