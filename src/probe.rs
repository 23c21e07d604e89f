//! Schema probing of resolved command text.
//!
//! A [`SchemaProbe`] binds a site's placeholder values into its command text
//! and asks something that knows the schema whether the result would run.
//! Two probes exist, picked by [`ConnectionTarget`]:
//!
//! - `file:<path>` or `*.sql`: [`SchemaFileProbe`] checks table and column
//!   names against DDL
//! - `http://` or `https://`: [`HttpProbe`] posts to a validation endpoint
//!
//! [`ProbeRunner`] decides which sites are probed, bounds every probe by a
//! timeout and turns failures into `SQLV002` diagnostics. A failure never
//! stops other sites from being probed.

mod bind;
mod http;
mod schema_file;

use std::{future::Future, path::PathBuf, time::Duration};

pub use bind::ParameterBinder;
pub use http::HttpProbe;
pub use schema_file::SchemaFileProbe;
use serde::Serialize;

use crate::{
    analysis::{ParamBinding, SiteAnalysis},
    config::Config,
    error::{AppResult, connection_error},
    rules::{Diagnostic, RuleCategory, RuleInfo, Severity}
};

/// Rule metadata of probe failures
pub const SCHEMA_PROBE_RULE: RuleInfo = RuleInfo {
    id:       "SQLV002",
    name:     "Schema probe failure",
    severity: Severity::Warning,
    category: RuleCategory::Schema
};

/// Result of probing one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Validated,
    /// Probe not attempted, with the reason
    Skipped(String),
    /// Probe rejected the command, with the failure message
    Failed(String)
}

/// Probe outcome of one site.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeRecord {
    pub site_index: usize,
    pub outcome:    ProbeOutcome
}

/// Validates command text with its bound placeholder values.
///
/// Implementations report every failure as [`ProbeOutcome::Failed`];
/// they never panic or return errors.
pub trait SchemaProbe: Send + Sync {
    fn probe(
        &self,
        sql: &str,
        bindings: &[ParamBinding]
    ) -> impl Future<Output = ProbeOutcome> + Send;
}

/// Where probes are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    Http(String),
    SchemaFile(PathBuf)
}

impl ConnectionTarget {
    /// Classify a connection string.
    ///
    /// # Errors
    ///
    /// Fails for anything that is neither an HTTP(S) URL nor a schema file.
    pub fn parse(target: &str) -> AppResult<Self> {
        let target = target.trim();
        let lower = target.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Http(target.to_string()));
        }
        if let Some(path) = target.strip_prefix("file:") {
            if path.is_empty() {
                return Err(connection_error("Connection target 'file:' has no path"));
            }
            return Ok(Self::SchemaFile(PathBuf::from(path)));
        }
        if lower.ends_with(".sql") {
            return Ok(Self::SchemaFile(PathBuf::from(target)));
        }
        Err(connection_error(format!(
            "Unsupported connection target '{}': expected an http(s):// URL, file:<path> or a .sql file",
            target
        )))
    }
}

/// A probe opened from a [`ConnectionTarget`].
#[derive(Debug, Clone)]
pub enum Connection {
    SchemaFile(SchemaFileProbe),
    Http(HttpProbe)
}

impl Connection {
    pub fn open(target: ConnectionTarget, config: &Config) -> AppResult<Self> {
        let timeout = Duration::from_millis(config.probe.timeout_ms);
        Ok(match target {
            ConnectionTarget::SchemaFile(path) => {
                let binder = ParameterBinder::new(&config.analysis.placeholder_marker)?;
                Self::SchemaFile(SchemaFileProbe::open(&path, config.probe.dialect, binder))
            }
            ConnectionTarget::Http(url) => {
                Self::Http(HttpProbe::new(url, config.retry.clone(), timeout))
            }
        })
    }
}

impl SchemaProbe for Connection {
    async fn probe(&self, sql: &str, bindings: &[ParamBinding]) -> ProbeOutcome {
        match self {
            Self::SchemaFile(probe) => probe.probe(sql, bindings).await,
            Self::Http(probe) => probe.probe(sql, bindings).await
        }
    }
}

/// Runs the probe over analyzed sites.
pub struct ProbeRunner<P> {
    probe:   Option<P>,
    timeout: Duration
}

impl<P: SchemaProbe> ProbeRunner<P> {
    /// Without a probe every site is skipped
    pub fn new(probe: Option<P>, timeout: Duration) -> Self {
        Self {
            probe,
            timeout
        }
    }

    pub fn is_configured(&self) -> bool {
        self.probe.is_some()
    }

    /// Probe one site.
    pub async fn probe_site(&self, site: &SiteAnalysis) -> ProbeOutcome {
        let Some(probe) = &self.probe else {
            return ProbeOutcome::Skipped(String::from("no connection configured"));
        };
        let Ok(sql) = &site.command_text else {
            return ProbeOutcome::Skipped(String::from("command text is not a constant"));
        };
        if !site.unmapped.is_empty() {
            return ProbeOutcome::Skipped(String::from("unmapped parameter type"));
        }
        match tokio::time::timeout(self.timeout, probe.probe(sql, &site.bindings)).await {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::Failed(format!(
                "Schema probe timed out after {} ms",
                self.timeout.as_millis()
            ))
        }
    }

    /// Probe every site in order; failures become `SQLV002` diagnostics at
    /// the construction site.
    pub async fn run(&self, sites: &[SiteAnalysis]) -> (Vec<ProbeRecord>, Vec<Diagnostic>) {
        let mut records = Vec::with_capacity(sites.len());
        let mut diagnostics = Vec::new();
        for site in sites {
            let outcome = self.probe_site(site).await;
            match &outcome {
                ProbeOutcome::Validated => {
                    tracing::debug!(site = %site.location, "schema probe validated")
                }
                ProbeOutcome::Skipped(reason) => {
                    tracing::debug!(site = %site.location, %reason, "schema probe skipped")
                }
                ProbeOutcome::Failed(message) => {
                    tracing::warn!(site = %site.location, %message, "schema probe failed");
                    diagnostics.push(Diagnostic::new(
                        &SCHEMA_PROBE_RULE,
                        message.clone(),
                        site.location.clone(),
                        site.index
                    ));
                }
            }
            records.push(ProbeRecord {
                site_index: site.index,
                outcome
            });
        }
        (records, diagnostics)
    }
}
