//! Rule engine over analyzed construction sites.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   Sites     │────▶│  RuleRunner  │────▶│   Report    │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!                            │
//!                     ┌──────┴──────┐
//!                     │   Rules     │
//!                     │  (parallel) │
//!                     └─────────────┘
//! ```
//!
//! The [`RuleRunner`] executes all enabled rules in parallel using [`rayon`],
//! collecting diagnostics into an [`AnalysisReport`]. Schema probe findings
//! are produced elsewhere and pass through [`RuleRunner::adjust`] so the same
//! disable and severity settings apply to them.
//!
//! # Rules
//!
//! | ID | Name | Default |
//! |----|------|---------|
//! | SQLV001 | Unused parameter | Warning |
//! | SQLV002 | Schema probe failure | Warning |
//! | SQLV003 | Unmapped parameter type | Error |
//!
//! # Configuration
//!
//! ```toml
//! [rules]
//! disabled = ["SQLV002"]
//!
//! [rules.severity]
//! SQLV001 = "error"
//! ```

mod types;
mod typing;
mod usage;

use std::collections::HashMap;

use rayon::prelude::*;
pub use types::{AnalysisReport, Diagnostic, RuleCategory, RuleInfo, Severity};
pub use typing::{UNMAPPED_TYPE_RULE, UnmappedParameterType};
pub use usage::{UNUSED_PARAMETER_RULE, UnusedParameter};

use crate::{
    analysis::SiteAnalysis,
    config::{AnalysisConfig, RulesConfig},
    probe::SCHEMA_PROBE_RULE
};

/// A check over one analyzed construction site.
///
/// Rules must be `Send + Sync` for parallel execution.
///
/// # Example
///
/// ```
/// use sql_param_validator::{
///     analysis::SiteAnalysis,
///     rules::{Diagnostic, Rule, RuleCategory, RuleInfo, Severity}
/// };
///
/// struct EmptyCommand;
///
/// const INFO: RuleInfo = RuleInfo {
///     id:       "CUSTOM001",
///     name:     "Empty command",
///     severity: Severity::Info,
///     category: RuleCategory::Usage
/// };
///
/// impl Rule for EmptyCommand {
///     fn info(&self) -> RuleInfo {
///         INFO
///     }
///
///     fn check(&self, site: &SiteAnalysis) -> Vec<Diagnostic> {
///         match &site.command_text {
///             Ok(text) if text.trim().is_empty() => vec![Diagnostic::new(
///                 &INFO,
///                 "Command text is empty".into(),
///                 site.location.clone(),
///                 site.index
///             )],
///             _ => vec![]
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns metadata about this rule.
    fn info(&self) -> RuleInfo;

    /// Findings for one site, empty if it passes.
    fn check(&self, site: &SiteAnalysis) -> Vec<Diagnostic>;
}

/// Parallel rule execution engine.
///
/// # Example
///
/// ```
/// use sql_param_validator::{
///     analysis::Analyzer,
///     config::{AnalysisConfig, RulesConfig},
///     rules::RuleRunner,
///     syntax::SyntaxModelBuilder
/// };
///
/// let mut b = SyntaxModelBuilder::new("Repo.cs");
/// let sql = b.literal("SELECT * FROM T WHERE id=@id");
/// let ctor = b.construct("System.Data.SqlClient.SqlCommand", &[sql]);
/// let cmd = b.declare("cmd", Some(ctor));
/// let name = b.literal("name");
/// let add = b.parameter_call(cmd, "AddWithValue", &[name]);
/// b.scope(&[ctor, add]);
/// let model = b.build().unwrap();
///
/// let sites = Analyzer::default().analyze(&model);
/// let runner = RuleRunner::with_config(&RulesConfig::default(), &AnalysisConfig::default());
/// let report = runner.analyze(sites, 1);
///
/// assert_eq!(report.warning_count(), 1);
/// assert_eq!(report.diagnostics[0].message, "Unused parameter: name");
/// ```
pub struct RuleRunner {
    rules:          Vec<Box<dyn Rule>>,
    disabled:       Vec<String>,
    severity_cache: HashMap<&'static str, Severity>
}

impl Default for RuleRunner {
    fn default() -> Self {
        Self::with_config(&RulesConfig::default(), &AnalysisConfig::default())
    }
}

impl RuleRunner {
    /// Create a runner with the built-in rules minus the disabled ones
    pub fn with_config(config: &RulesConfig, analysis: &AnalysisConfig) -> Self {
        let all_rules: Vec<Box<dyn Rule>> = vec![
            Box::new(UnusedParameter::new(
                analysis.placeholder_marker.clone(),
                analysis.placeholder_matching
            )),
            Box::new(UnmappedParameterType),
        ];
        let is_disabled = |id: &str| config.disabled.iter().any(|d| d.eq_ignore_ascii_case(id));
        let rules: Vec<Box<dyn Rule>> = all_rules
            .into_iter()
            .filter(|r| !is_disabled(r.info().id))
            .collect();

        let mut severity_cache = HashMap::new();
        let known = rules
            .iter()
            .map(|r| r.info().id)
            .chain(std::iter::once(SCHEMA_PROBE_RULE.id));
        for rule_id in known {
            let configured = config
                .severity
                .iter()
                .find(|(id, _)| id.eq_ignore_ascii_case(rule_id))
                .map(|(_, sev)| sev);
            if let Some(sev_str) = configured
                && let Some(sev) = parse_severity(sev_str)
            {
                severity_cache.insert(rule_id, sev);
            }
        }
        Self {
            rules,
            disabled: config.disabled.clone(),
            severity_cache
        }
    }

    /// Metadata of the enabled site rules
    pub fn rule_infos(&self) -> Vec<RuleInfo> {
        self.rules.iter().map(|r| r.info()).collect()
    }

    pub fn is_enabled(&self, rule_id: &str) -> bool {
        !self.disabled.iter().any(|d| d.eq_ignore_ascii_case(rule_id))
    }

    /// Apply disable and severity settings to a diagnostic from outside
    /// the site rules
    pub fn adjust(&self, mut diagnostic: Diagnostic) -> Option<Diagnostic> {
        if !self.is_enabled(diagnostic.rule_id) {
            return None;
        }
        if let Some(&severity) = self.severity_cache.get(diagnostic.rule_id) {
            diagnostic.severity = severity;
        }
        Some(diagnostic)
    }

    /// Run all rules on the analyzed sites (parallel execution)
    pub fn analyze(&self, sites: Vec<SiteAnalysis>, files_count: usize) -> AnalysisReport {
        let mut report = AnalysisReport::new(files_count, self.rules.len());
        let diagnostics: Vec<Diagnostic> = sites
            .par_iter()
            .flat_map(|site| {
                self.rules
                    .par_iter()
                    .flat_map(|rule| rule.check(site))
                    .collect::<Vec<_>>()
            })
            .collect();
        for diagnostic in diagnostics {
            if let Some(diagnostic) = self.adjust(diagnostic) {
                report.add_diagnostic(diagnostic);
            }
        }
        report.sites = sites;
        report.sort_diagnostics();
        report
    }
}

/// Every rule the validator can report, site rules and probe alike
pub fn catalog() -> [RuleInfo; 3] {
    [UNUSED_PARAMETER_RULE, SCHEMA_PROBE_RULE, UNMAPPED_TYPE_RULE]
}

/// Parse severity string to enum
fn parse_severity(s: &str) -> Option<Severity> {
    match s.to_lowercase().as_str() {
        "error" => Some(Severity::Error),
        "warning" | "warn" => Some(Severity::Warning),
        "info" => Some(Severity::Info),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Location;

    fn probe_diagnostic() -> Diagnostic {
        Diagnostic::new(
            &SCHEMA_PROBE_RULE,
            "Invalid object name 'T'.".into(),
            Location::default(),
            0
        )
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse_severity("WARN"), Some(Severity::Warning));
        assert_eq!(parse_severity("Error"), Some(Severity::Error));
        assert_eq!(parse_severity("fatal"), None);
    }

    #[test]
    fn test_disabled_rules_are_dropped() {
        let config = RulesConfig {
            disabled: vec!["sqlv001".into(), "SQLV002".into()],
            ..Default::default()
        };
        let runner = RuleRunner::with_config(&config, &AnalysisConfig::default());
        assert_eq!(runner.rule_infos().len(), 1);
        assert!(!runner.is_enabled("SQLV002"));
        assert!(runner.adjust(probe_diagnostic()).is_none());
    }

    #[test]
    fn test_probe_severity_override() {
        let mut config = RulesConfig::default();
        config.severity.insert("SQLV002".into(), "error".into());
        let runner = RuleRunner::with_config(&config, &AnalysisConfig::default());
        let adjusted = runner.adjust(probe_diagnostic()).unwrap();
        assert_eq!(adjusted.severity, Severity::Error);
    }

    #[test]
    fn test_severity_override_ignores_id_case() {
        let mut config = RulesConfig::default();
        config.severity.insert("sqlv002".into(), "info".into());
        let runner = RuleRunner::with_config(&config, &AnalysisConfig::default());
        let adjusted = runner.adjust(probe_diagnostic()).unwrap();
        assert_eq!(adjusted.severity, Severity::Info);
    }
}
