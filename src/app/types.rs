//! Application types for CLI commands.

use crate::{
    cli::{Dialect, Format},
    rules::AnalysisReport
};

/// Parameters for the analyze command.
///
/// Options left as `None` fall back to the loaded configuration.
///
/// # Example
///
/// ```
/// use sql_param_validator::{
///     app::AnalyzeParams,
///     cli::{Dialect, Format}
/// };
///
/// let params = AnalyzeParams {
///     model_paths:   vec!["UserRepository.json".to_string()],
///     connection:    Some("file:schema.sql".to_string()),
///     dialect:       Some(Dialect::Mssql),
///     strict_types:  false,
///     ignore_case:   false,
///     no_probe:      false,
///     timeout_ms:    None,
///     output_format: Format::Text,
///     verbose:       false,
///     no_color:      true
/// };
/// ```
#[derive(Debug, Clone)]
pub struct AnalyzeParams {
    /// Syntax model files, or "-" for a JSON model on stdin.
    pub model_paths:   Vec<String>,
    /// Schema probe target overriding configuration and environment.
    pub connection:    Option<String>,
    /// SQL dialect overriding configuration.
    pub dialect:       Option<Dialect>,
    /// Refuse parameter values with no placeholder type.
    pub strict_types:  bool,
    /// Match placeholders case-insensitively.
    pub ignore_case:   bool,
    /// Skip the schema probe.
    pub no_probe:      bool,
    /// Per-site probe timeout overriding configuration.
    pub timeout_ms:    Option<u64>,
    pub output_format: Format,
    /// Show per-site details.
    pub verbose:       bool,
    /// Disable colored terminal output.
    pub no_color:      bool
}

/// Result of analysis containing all outputs.
#[derive(Debug, Clone)]
pub struct AnalyzeResult {
    /// Exit code based on diagnostic severity (0, 1, or 2).
    pub exit_code:         i32,
    /// Rendered report.
    pub output:            String,
    pub report:            AnalysisReport,
    /// Set when Ctrl-C abandoned the probe step.
    pub probe_interrupted: bool
}
