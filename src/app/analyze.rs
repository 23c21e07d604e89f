//! Core analysis execution logic.
//!
//! This module contains the main `run_analyze` function that orchestrates
//! the complete validation pipeline: loading syntax models, analyzing every
//! command construction site, running the rules and the optional schema
//! probe.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::{
    helpers::{
        apply_cli_overrides, calculate_exit_code, create_output_options, load_models,
        open_connection
    },
    types::{AnalyzeParams, AnalyzeResult}
};
use crate::{
    analysis::Analyzer,
    config::Config,
    error::AppResult,
    output::format_report,
    probe::{ProbeRunner, SCHEMA_PROBE_RULE},
    rules::RuleRunner
};

/// Executes the complete validation pipeline.
///
/// 1. **Model Loading**: Reads every syntax model (from file or stdin)
/// 2. **Site Analysis**: Folds command text and collects parameter bindings
/// 3. **Rules**: Runs all enabled rules against the analyzed sites
/// 4. **Schema Probe** (optional): Checks each resolvable site against the
///    configured connection, abandoned on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - A model file cannot be read or is malformed
/// - The connection target is not recognized
///
/// # Example
///
/// ```no_run
/// use sql_param_validator::{
///     app::{AnalyzeParams, run_analyze},
///     cli::Format,
///     config::Config
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = AnalyzeParams {
///     model_paths:   vec!["UserRepository.json".to_string()],
///     connection:    None,
///     dialect:       None,
///     strict_types:  false,
///     ignore_case:   false,
///     no_probe:      true,
///     timeout_ms:    None,
///     output_format: Format::Text,
///     verbose:       false,
///     no_color:      false
/// };
///
/// let result = run_analyze(params, Config::default()).await?;
/// println!("Exit code: {}", result.exit_code);
/// # Ok(())
/// # }
/// ```
pub async fn run_analyze(params: AnalyzeParams, mut config: Config) -> AppResult<AnalyzeResult> {
    apply_cli_overrides(&mut config, &params);
    let models = load_models(&params.model_paths)?;
    let connection = open_connection(&config, params.no_probe)?;
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);

    let sites = Analyzer::new(config.analysis.clone()).analyze_all(&models);
    let runner = RuleRunner::with_config(&config.rules, &config.analysis);
    let mut report = runner.analyze(sites, models.len());
    let mut probe_interrupted = false;

    if runner.is_enabled(SCHEMA_PROBE_RULE.id) {
        let probe = ProbeRunner::new(connection, Duration::from_millis(config.probe.timeout_ms));

        let spinner = probe.is_configured().then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
            {
                pb.set_style(style);
            }
            pb.set_message(format!("Probing {} site(s)...", report.sites.len()));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let outcome = tokio::select! {
            result = probe.run(&report.sites) => Some(result),
            Ok(()) = tokio::signal::ctrl_c() => None
        };
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        match outcome {
            Some((records, diagnostics)) => {
                report.probes = records;
                for diagnostic in diagnostics {
                    if let Some(diagnostic) = runner.adjust(diagnostic) {
                        report.add_diagnostic(diagnostic);
                    }
                }
                report.sort_diagnostics();
            }
            None => {
                tracing::warn!("schema probe interrupted, reporting static findings only");
                probe_interrupted = true;
            }
        }
    }

    let output = format_report(&report, &output_opts);
    let exit_code = calculate_exit_code(&report);

    Ok(AnalyzeResult {
        exit_code,
        output,
        report,
        probe_interrupted
    })
}
