use std::{fs, path::Path};

use super::{ParameterBinder, ProbeOutcome, SchemaProbe};
use crate::{
    analysis::ParamBinding,
    query::{SqlDialect, extract_statements},
    schema::Schema
};

/// Validates command text against DDL read from a file.
///
/// The file is read once when the probe is opened. If that fails, every
/// probed site fails with the same message instead of the run aborting.
#[derive(Debug, Clone)]
pub struct SchemaFileProbe {
    schema:  Result<Schema, String>,
    dialect: SqlDialect,
    binder:  ParameterBinder
}

impl SchemaFileProbe {
    pub fn open(path: &Path, dialect: SqlDialect, binder: ParameterBinder) -> Self {
        let schema = fs::read_to_string(path)
            .map_err(|e| format!("Cannot open schema file '{}': {}", path.display(), e))
            .and_then(|ddl| {
                Schema::parse(&ddl, dialect).map_err(|e| {
                    format!("Cannot load schema file '{}': {}", path.display(), e)
                })
            });
        match &schema {
            Ok(s) => tracing::debug!(path = %path.display(), tables = s.tables.len(), "schema loaded"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "schema unavailable")
        }
        Self {
            schema,
            dialect,
            binder
        }
    }

    pub fn from_schema(schema: Schema, dialect: SqlDialect, binder: ParameterBinder) -> Self {
        Self {
            schema: Ok(schema),
            dialect,
            binder
        }
    }

    /// Bind, parse and check one command text.
    pub fn check(&self, sql: &str, bindings: &[ParamBinding]) -> ProbeOutcome {
        let schema = match &self.schema {
            Ok(schema) => schema,
            Err(message) => return ProbeOutcome::Failed(message.clone())
        };
        let result = self
            .binder
            .bind(sql, bindings)
            .and_then(|bound| extract_statements(&bound, self.dialect))
            .and_then(|shapes| shapes.iter().try_for_each(|shape| schema.check(shape)));
        match result {
            Ok(()) => ProbeOutcome::Validated,
            Err(message) => ProbeOutcome::Failed(message)
        }
    }
}

impl SchemaProbe for SchemaFileProbe {
    async fn probe(&self, sql: &str, bindings: &[ParamBinding]) -> ProbeOutcome {
        self.check(sql, bindings)
    }
}
