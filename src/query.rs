//! SQL command text parsing.
//!
//! Parses bound command text with [`sqlparser`] and reduces every statement
//! to the object names it references, which is all the schema-file probe
//! needs to check it.

mod extract;
mod types;

use extract::{ExtractionContext, extract_columns_from_expr, extract_from_set_expr};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use sqlparser::{
    dialect::{
        Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect
    },
    parser::Parser
};
pub use types::{ColumnVec, StatementKind, StatementShape};

use crate::error::format_sql_error;

/// SQL dialect for parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    #[default]
    MsSql,
    Generic,
    MySQL,
    PostgreSQL,
    SQLite
}

impl SqlDialect {
    /// Convert to sqlparser dialect for parsing
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::MsSql => Box::new(MsSqlDialect {}),
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {})
        }
    }
}

/// Parse command text into statement shapes.
///
/// # Errors
///
/// Returns the server-style syntax message when the text does not parse.
pub fn extract_statements(sql: &str, dialect: SqlDialect) -> Result<Vec<StatementShape>, String> {
    let parser_dialect = dialect.into_parser_dialect();
    let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)
        .map_err(|e| format_sql_error("Incorrect syntax", &e.to_string()))?;
    Ok(statements.into_iter().map(shape_of).collect())
}

fn shape_of(stmt: sqlparser::ast::Statement) -> StatementShape {
    use sqlparser::ast::Statement;
    let raw = stmt.to_string();
    match stmt {
        Statement::Query(query) => select_shape(raw, *query),
        Statement::Insert(insert) => {
            let mut shape = StatementShape::new(raw, StatementKind::Insert);
            shape.tables.push(insert.table.to_string().into());
            shape
        }
        Statement::Update(sqlparser::ast::Update {
            table,
            selection,
            ..
        }) => {
            let mut shape = StatementShape::new(raw, StatementKind::Update);
            shape.tables.push(table.relation.to_string().into());
            if let Some(sel) = selection {
                let mut cols = IndexSet::new();
                extract_columns_from_expr(&sel, &mut cols);
                shape.columns = cols.into_iter().collect();
            }
            shape
        }
        Statement::Delete(delete) => {
            let mut shape = StatementShape::new(raw, StatementKind::Delete);
            if let Some(sel) = delete.selection {
                let mut cols = IndexSet::new();
                extract_columns_from_expr(&sel, &mut cols);
                shape.columns = cols.into_iter().collect();
            }
            if let sqlparser::ast::FromTable::WithFromKeyword(from_items)
            | sqlparser::ast::FromTable::WithoutKeyword(from_items) = delete.from
            {
                for item in from_items {
                    shape.tables.push(item.relation.to_string().into());
                }
            }
            shape
        }
        _ => StatementShape::new(raw, StatementKind::Other)
    }
}

fn select_shape(raw: String, query: sqlparser::ast::Query) -> StatementShape {
    let mut shape = StatementShape::new(raw, StatementKind::Select);
    for cte in query.with.iter().flat_map(|w| &w.cte_tables) {
        shape.cte_names.push(cte.alias.name.value.as_str().into());
    }
    let mut tables = IndexSet::new();
    let mut columns = IndexSet::new();
    let mut ctx = ExtractionContext {
        tables:      &mut tables,
        columns:     &mut columns,
        has_derived: &mut shape.has_derived
    };
    for cte in query.with.iter().flat_map(|w| &w.cte_tables) {
        extract_from_set_expr(&cte.query.body, &mut ctx);
    }
    extract_from_set_expr(&query.body, &mut ctx);
    shape.tables = tables.into_iter().collect();
    shape.columns = columns.into_iter().collect();
    shape
}
