//! Helper functions for CLI operations.
//!
//! This module provides utility functions used by the analyze command for
//! reading syntax models, calculating exit codes, merging CLI flags into the
//! configuration and opening the schema probe connection.

use std::{
    io::{self, Read},
    path::Path
};

use super::{
    convert::{convert_dialect, convert_format},
    types::AnalyzeParams
};
use crate::{
    analysis::UnmappedTypePolicy,
    cli::Format,
    config::{Config, PlaceholderMatching},
    error::{AppResult, file_read_error},
    output::OutputOptions,
    probe::{Connection, ConnectionTarget},
    rules::{AnalysisReport, Severity},
    syntax::SyntaxModel
};

/// Calculates the process exit code based on diagnostic severities.
///
/// Examines all diagnostics in the analysis report and returns an exit
/// code reflecting the highest severity found:
/// - `0` - No diagnostics or only informational messages
/// - `1` - At least one warning present
/// - `2` - At least one error present
///
/// # Example
///
/// ```
/// use sql_param_validator::{app::calculate_exit_code, rules::AnalysisReport};
///
/// let report = AnalysisReport::new(1, 2);
/// assert_eq!(calculate_exit_code(&report), 0);
/// ```
pub fn calculate_exit_code(report: &AnalysisReport) -> i32 {
    if report
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error)
    {
        2
    } else if report
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Warning)
    {
        1
    } else {
        0
    }
}

/// Reads one syntax model from a file or stdin.
///
/// The path "-" reads a JSON model from standard input. Files ending in
/// `.yaml` or `.yml` are read as YAML, everything else as JSON.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a valid model.
pub fn read_model_input(path: &str) -> AppResult<SyntaxModel> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        SyntaxModel::from_json("stdin", &buffer)
    } else {
        SyntaxModel::load(Path::new(path))
    }
}

/// Reads every model, stopping at the first one that fails.
pub fn load_models(paths: &[String]) -> AppResult<Vec<SyntaxModel>> {
    paths.iter().map(|p| read_model_input(p)).collect()
}

/// Creates output options from CLI parameters.
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

/// Applies command-line flags on top of the loaded configuration.
///
/// Flags only ever tighten or replace settings: `--ignore-case` and
/// `--strict-types` cannot switch off what the configuration enables.
pub fn apply_cli_overrides(config: &mut Config, params: &AnalyzeParams) {
    if let Some(connection) = &params.connection {
        config.probe.connection = Some(connection.clone());
    }
    if let Some(dialect) = params.dialect {
        config.probe.dialect = convert_dialect(dialect);
    }
    if params.strict_types {
        config.analysis.unmapped_types = UnmappedTypePolicy::Strict;
    }
    if params.ignore_case {
        config.analysis.placeholder_matching = PlaceholderMatching::IgnoreCase;
    }
    if let Some(timeout_ms) = params.timeout_ms {
        config.probe.timeout_ms = timeout_ms;
    }
}

/// Opens the configured probe connection.
///
/// Returns `None` when no connection is configured or probing is turned
/// off.
///
/// # Errors
///
/// Returns an error if the connection target is not recognized.
pub fn open_connection(config: &Config, no_probe: bool) -> AppResult<Option<Connection>> {
    if no_probe {
        return Ok(None);
    }
    let Some(target) = config
        .probe
        .connection
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    else {
        return Ok(None);
    };
    let target = ConnectionTarget::parse(target)?;
    Connection::open(target, config).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cli::Dialect,
        query::SqlDialect,
        rules::{Diagnostic, UNMAPPED_TYPE_RULE, UNUSED_PARAMETER_RULE},
        syntax::Location
    };

    fn params() -> AnalyzeParams {
        AnalyzeParams {
            model_paths:   vec![],
            connection:    None,
            dialect:       None,
            strict_types:  false,
            ignore_case:   false,
            no_probe:      false,
            timeout_ms:    None,
            output_format: Format::Text,
            verbose:       false,
            no_color:      true
        }
    }

    #[test]
    fn test_exit_code_follows_highest_severity() {
        let mut report = AnalysisReport::new(1, 2);
        report.add_diagnostic(Diagnostic::new(
            &UNUSED_PARAMETER_RULE,
            "Unused parameter: a".into(),
            Location::default(),
            0
        ));
        assert_eq!(calculate_exit_code(&report), 1);
        report.add_diagnostic(Diagnostic::new(
            &UNMAPPED_TYPE_RULE,
            "Cannot synthesize a placeholder for type `X`".into(),
            Location::default(),
            0
        ));
        assert_eq!(calculate_exit_code(&report), 2);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();
        let params = AnalyzeParams {
            connection: Some("file:db.sql".into()),
            dialect: Some(Dialect::Sqlite),
            strict_types: true,
            ignore_case: true,
            timeout_ms: Some(250),
            ..params()
        };
        apply_cli_overrides(&mut config, &params);
        assert_eq!(config.probe.connection.as_deref(), Some("file:db.sql"));
        assert_eq!(config.probe.dialect, SqlDialect::SQLite);
        assert_eq!(config.analysis.unmapped_types, UnmappedTypePolicy::Strict);
        assert_eq!(
            config.analysis.placeholder_matching,
            PlaceholderMatching::IgnoreCase
        );
        assert_eq!(config.probe.timeout_ms, 250);
    }

    #[test]
    fn test_flags_do_not_loosen_config() {
        let mut config = Config::default();
        config.analysis.unmapped_types = UnmappedTypePolicy::Strict;
        apply_cli_overrides(&mut config, &params());
        assert_eq!(config.analysis.unmapped_types, UnmappedTypePolicy::Strict);
        assert!(config.probe.connection.is_none());
    }

    #[test]
    fn test_open_connection() {
        let mut config = Config::default();
        assert!(open_connection(&config, false).unwrap().is_none());

        config.probe.connection = Some("https://db.local/validate".into());
        assert!(open_connection(&config, true).unwrap().is_none());
        assert!(matches!(
            open_connection(&config, false).unwrap(),
            Some(Connection::Http(_))
        ));

        config.probe.connection = Some("Server=.;Database=app".into());
        assert!(open_connection(&config, false).is_err());
    }

    #[test]
    fn test_missing_model_file() {
        assert!(load_models(&["does/not/exist.json".to_string()]).is_err());
    }
}
