// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_param_validator::{
    analysis::{Bindings, DummyValue, ParamBinding, SiteAnalysis, UnmappedParameter},
    config::{AnalysisConfig, PlaceholderMatching, RulesConfig},
    rules::{RuleCategory, RuleRunner, Severity, catalog},
    syntax::{Location, Span}
};

fn location(line: u32) -> Location {
    Location {
        file: "OrderRepository.cs".into(),
        span: Span::new(line, 9, line, 48)
    }
}

fn binding(name: &str, line: u32) -> ParamBinding {
    ParamBinding {
        name:     Ok(name.to_string()),
        location: location(line),
        value:    Some(DummyValue::Int32(0))
    }
}

fn site(index: usize, text: &str, names: &[&str]) -> SiteAnalysis {
    let bindings: Vec<ParamBinding> = names
        .iter()
        .enumerate()
        .map(|(i, n)| binding(n, 10 * (index as u32 + 1) + i as u32 + 1))
        .collect();
    SiteAnalysis {
        index,
        location: location(10 * (index as u32 + 1)),
        command_text: Ok(text.to_string()),
        bindings: Bindings::from_vec(bindings),
        unmapped: Vec::new()
    }
}

fn rule_ids(sites: Vec<SiteAnalysis>, config: &RulesConfig) -> Vec<&'static str> {
    RuleRunner::with_config(config, &AnalysisConfig::default())
        .analyze(sites, 1)
        .diagnostics
        .iter()
        .map(|d| d.rule_id)
        .collect()
}

#[test]
fn test_unused_parameter_reported_at_registration() {
    let report = RuleRunner::default().analyze(
        vec![site(0, "SELECT * FROM Orders WHERE id=@id", &["id", "status"])],
        1
    );
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.message, "Unused parameter: status");
    assert_eq!(diagnostic.location.span.line, 12);
    assert_eq!(diagnostic.category, RuleCategory::Usage);
    assert!(diagnostic.suggestion.as_deref().unwrap().contains("@status"));
}

#[test]
fn test_placeholder_prefix_of_longer_name_counts_as_used() {
    let ids = rule_ids(
        vec![site(0, "SELECT * FROM Orders WHERE id=@idx", &["id"])],
        &RulesConfig::default()
    );
    assert!(ids.is_empty());
}

#[test]
fn test_site_without_bindings_is_clean() {
    let ids = rule_ids(
        vec![site(0, "SELECT * FROM Orders", &[])],
        &RulesConfig::default()
    );
    assert!(ids.is_empty());
}

#[test]
fn test_disabled_rule() {
    let config = RulesConfig {
        disabled: vec!["SQLV001".into()],
        ..Default::default()
    };
    let ids = rule_ids(vec![site(0, "SELECT 1", &["unused"])], &config);
    assert!(ids.is_empty());
}

#[test]
fn test_severity_override() {
    let mut config = RulesConfig::default();
    config.severity.insert("SQLV001".into(), "error".into());
    let report = RuleRunner::with_config(&config, &AnalysisConfig::default())
        .analyze(vec![site(0, "SELECT 1", &["unused"])], 1);
    assert_eq!(report.diagnostics[0].severity, Severity::Error);
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.warning_count(), 0);
}

#[test]
fn test_severity_override_with_lowercase_id() {
    let mut config = RulesConfig::default();
    config.severity.insert("sqlv001".into(), "error".into());
    let report = RuleRunner::with_config(&config, &AnalysisConfig::default())
        .analyze(vec![site(0, "SELECT 1", &["unused"])], 1);
    assert_eq!(report.diagnostics[0].severity, Severity::Error);
}

#[test]
fn test_invalid_severity_override_is_ignored() {
    let mut config = RulesConfig::default();
    config.severity.insert("SQLV001".into(), "critical".into());
    let report = RuleRunner::with_config(&config, &AnalysisConfig::default())
        .analyze(vec![site(0, "SELECT 1", &["unused"])], 1);
    assert_eq!(report.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_diagnostics_sorted_by_severity_then_site() {
    let unmapped = SiteAnalysis {
        index:        2,
        location:     location(30),
        command_text: Ok("SELECT @x".into()),
        bindings:     Bindings::new(),
        unmapped:     vec![UnmappedParameter {
            name:      Ok("x".into()),
            type_name: Some("Address".into()),
            location:  location(31)
        }]
    };
    let report = RuleRunner::default().analyze(
        vec![
            site(1, "SELECT 1", &["b"]),
            site(0, "SELECT 1", &["a"]),
            unmapped,
        ],
        1
    );
    let order: Vec<(&str, usize)> = report
        .diagnostics
        .iter()
        .map(|d| (d.rule_id, d.site_index))
        .collect();
    assert_eq!(order, vec![("SQLV003", 2), ("SQLV001", 0), ("SQLV001", 1)]);
}

#[test]
fn test_ignore_case_matching() {
    let analysis = AnalysisConfig {
        placeholder_matching: PlaceholderMatching::IgnoreCase,
        ..Default::default()
    };
    let report = RuleRunner::with_config(&RulesConfig::default(), &analysis)
        .analyze(vec![site(0, "SELECT * FROM T WHERE Id=@ID", &["id"])], 1);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_report_keeps_sites_and_counts() {
    let report = RuleRunner::default().analyze(
        vec![site(0, "SELECT 1", &[]), site(1, "SELECT 2", &[])],
        2
    );
    assert_eq!(report.sites_count(), 2);
    assert_eq!(report.files_count, 2);
    assert_eq!(report.rules_count, 2);
}

#[test]
fn test_catalog_lists_every_rule() {
    let ids: Vec<&str> = catalog().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["SQLV001", "SQLV002", "SQLV003"]);
}
