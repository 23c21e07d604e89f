//! Report rendering.
//!
//! - `text` - `file:line:col SEVERITY [ID] message` lines and a summary
//! - `json` / `yaml` - the full [`AnalysisReport`] through serde
//! - `sarif` - SARIF 2.1.0 for code scanning integrations

use colored::Colorize;
use serde_json::{Map, Value, json};

use crate::{
    analysis::SiteAnalysis,
    probe::ProbeOutcome,
    rules::{AnalysisReport, Diagnostic, RuleInfo, Severity, catalog},
    syntax::Span
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
    Sarif
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Render a report in the requested format
pub fn format_report(report: &AnalysisReport, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(report).unwrap_or_default(),
        OutputFormat::Sarif => {
            serde_json::to_string_pretty(&to_sarif(report)).unwrap_or_default()
        }
        OutputFormat::Text => format_text(report, opts)
    }
}

fn format_text(report: &AnalysisReport, opts: &OutputOptions) -> String {
    let mut output = String::new();

    if opts.verbose {
        for site in &report.sites {
            output.push_str(&format_site(site, report, opts));
        }
    }

    for diagnostic in &report.diagnostics {
        output.push_str(&format_diagnostic(diagnostic, opts));
    }

    if !report.diagnostics.is_empty() || opts.verbose {
        output.push('\n');
    }
    output.push_str(&format_summary(report, opts));
    output
}

fn format_diagnostic(diagnostic: &Diagnostic, opts: &OutputOptions) -> String {
    let severity = diagnostic.severity.to_string();
    let severity = if opts.colored {
        match diagnostic.severity {
            Severity::Error => severity.red().bold().to_string(),
            Severity::Warning => severity.yellow().bold().to_string(),
            Severity::Info => severity.blue().to_string()
        }
    } else {
        severity
    };
    let mut line = format!(
        "{} {} [{}] {}\n",
        diagnostic.location, severity, diagnostic.rule_id, diagnostic.message
    );
    if opts.verbose
        && let Some(suggestion) = &diagnostic.suggestion
    {
        line.push_str(&format!("    help: {}\n", suggestion));
    }
    line
}

fn format_site(site: &SiteAnalysis, report: &AnalysisReport, opts: &OutputOptions) -> String {
    let header = format!("Site #{} at {}", site.index + 1, site.location);
    let mut out = if opts.colored {
        header.cyan().bold().to_string()
    } else {
        header
    };
    out.push('\n');

    match &site.command_text {
        Ok(text) => out.push_str(&format!("  text: {}\n", text)),
        Err(reason) => out.push_str(&format!("  text: <not constant: {}>\n", reason))
    }

    if site.bindings.is_empty() {
        out.push_str("  bindings: none\n");
    } else {
        let list: Vec<String> = site
            .bindings
            .iter()
            .map(|b| {
                let name = match &b.name {
                    Ok(name) => name.clone(),
                    Err(reason) => format!("<{}>", reason)
                };
                match &b.value {
                    Some(value) => format!("{} = {}", name, value),
                    None => format!("{} = <unmapped>", name)
                }
            })
            .collect();
        out.push_str(&format!("  bindings: {}\n", list.join(", ")));
    }
    for unmapped in &site.unmapped {
        out.push_str(&format!(
            "  unmapped: {} at {}\n",
            unmapped.type_name.as_deref().unwrap_or("<unknown>"),
            unmapped.location
        ));
    }

    if let Some(record) = report.probes.iter().find(|r| r.site_index == site.index) {
        let probe = match &record.outcome {
            ProbeOutcome::Validated => String::from("validated"),
            ProbeOutcome::Skipped(reason) => format!("skipped ({})", reason),
            ProbeOutcome::Failed(message) => format!("failed: {}", message)
        };
        out.push_str(&format!("  probe: {}\n", probe));
    }
    out
}

fn format_summary(report: &AnalysisReport, opts: &OutputOptions) -> String {
    let scope = format!(
        "{} file(s), {} construction site(s)",
        report.files_count,
        report.sites_count()
    );
    if report.diagnostics.is_empty() {
        let ok = "No issues found";
        let ok = if opts.colored {
            ok.green().to_string()
        } else {
            ok.to_string()
        };
        return format!("{}: {}\n", scope, ok);
    }
    format!(
        "{}: {} error(s), {} warning(s), {} info\n",
        scope,
        report.error_count(),
        report.warning_count(),
        report.info_count()
    )
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note"
    }
}

fn sarif_rule(info: &RuleInfo) -> Value {
    json!({
        "id": info.id,
        "name": info.name,
        "shortDescription": { "text": info.name },
        "defaultConfiguration": { "level": sarif_level(info.severity) },
        "properties": { "category": info.category.to_string() }
    })
}

fn sarif_region(span: &Span) -> Value {
    let mut region = Map::new();
    region.insert("startLine".into(), json!(span.line.max(1)));
    region.insert("startColumn".into(), json!(span.column.max(1)));
    if span.end_line >= span.line && span.end_line > 0 {
        region.insert("endLine".into(), json!(span.end_line));
        if span.end_column > 0 {
            region.insert("endColumn".into(), json!(span.end_column));
        }
    }
    Value::Object(region)
}

/// SARIF 2.1.0 log of a report
pub fn to_sarif(report: &AnalysisReport) -> Value {
    let rules: Vec<Value> = catalog().iter().map(sarif_rule).collect();
    let results: Vec<Value> = report
        .diagnostics
        .iter()
        .map(|d| {
            let mut result = json!({
                "ruleId": d.rule_id,
                "level": sarif_level(d.severity),
                "message": { "text": d.message },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": { "uri": d.location.file },
                        "region": sarif_region(&d.location.span)
                    }
                }]
            });
            if let Some(suggestion) = &d.suggestion {
                result["properties"] = json!({ "suggestion": suggestion });
            }
            result
        })
        .collect();

    json!({
        "$schema": "https://json.schemastore.org/sarif-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "sql-param-validator",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rules": rules
                }
            },
            "results": results
        }]
    })
}
