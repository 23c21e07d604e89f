//! Database schema parsing and representation.
//!
//! Parses `CREATE TABLE` statements into table and column names so command
//! text can be checked against them without a live server.
//!
//! Names are looked up by their last segment, case-insensitively and with
//! `[brackets]`, `"quotes"` and `` `backticks` `` removed, so `[dbo].[Users]`,
//! `dbo.Users` and `users` are the same table.
//!
//! # Example
//!
//! ```
//! use sql_param_validator::{query::SqlDialect, schema::Schema};
//!
//! let sql = r#"
//!     CREATE TABLE [dbo].[Users] (
//!         id INT PRIMARY KEY,
//!         email NVARCHAR(255) NOT NULL
//!     );
//! "#;
//!
//! let schema = Schema::parse(sql, SqlDialect::MsSql).unwrap();
//! let users = schema.table("users").unwrap();
//! assert_eq!(users.columns.len(), 2);
//! assert!(users.has_column("EMAIL"));
//! ```

use std::collections::BTreeMap;

use sqlparser::parser::Parser;

use crate::{
    error::format_sql_error,
    query::{SqlDialect, StatementShape}
};

/// Table declared in the schema.
#[derive(Debug, Clone)]
pub struct TableInfo {
    /// Table name as written
    pub name:    String,
    pub columns: Vec<ColumnInfo>
}

impl TableInfo {
    pub fn has_column(&self, name: &str) -> bool {
        let key = normalize_name(name);
        self.columns.iter().any(|c| normalize_name(&c.name) == key)
    }
}

/// Column metadata extracted from CREATE TABLE.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name:      String,
    /// SQL data type (e.g., "INT", "NVARCHAR(255)")
    pub data_type: String
}

/// Parsed database schema keyed by normalized table name.
///
/// Tables are stored in a `BTreeMap` for deterministic iteration order.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    pub tables: BTreeMap<String, TableInfo>
}

impl Schema {
    /// Parse SQL schema from string with specified dialect
    ///
    /// Statements other than `CREATE TABLE` are ignored. A later definition
    /// of the same table replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns the parser message when the DDL does not parse
    pub fn parse(sql: &str, dialect: SqlDialect) -> Result<Self, String> {
        let parser_dialect = dialect.into_parser_dialect();
        let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)
            .map_err(|e| format_sql_error("Schema parse error", &e.to_string()))?;
        let mut schema = Self::default();
        for stmt in statements {
            if let sqlparser::ast::Statement::CreateTable(create) = stmt {
                let name = create.name.to_string();
                let columns = create
                    .columns
                    .into_iter()
                    .map(|column| ColumnInfo {
                        name:      column.name.value,
                        data_type: column.data_type.to_string()
                    })
                    .collect();
                schema.tables.insert(
                    normalize_name(&name),
                    TableInfo {
                        name,
                        columns
                    }
                );
            }
        }
        Ok(schema)
    }

    /// Look up a table by any spelling of its name
    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.get(&normalize_name(name))
    }

    /// Check that every object a statement names exists.
    ///
    /// Column checks are skipped when the statement reads from a derived
    /// table or a common table expression, since their columns are not
    /// declared anywhere.
    ///
    /// # Errors
    ///
    /// Returns the server-style message for the first missing name
    pub fn check(&self, shape: &StatementShape) -> Result<(), String> {
        let mut resolved = Vec::with_capacity(shape.tables.len());
        let mut columns_known = !shape.has_derived;
        for table in &shape.tables {
            if shape.is_cte(&normalize_name(table)) {
                columns_known = false;
                continue;
            }
            match self.table(table) {
                Some(info) => resolved.push(info),
                None => return Err(format!("Invalid object name '{}'.", table))
            }
        }
        if !columns_known {
            return Ok(());
        }
        for column in &shape.columns {
            if !resolved.iter().any(|t| t.has_column(column)) {
                return Err(format!("Invalid column name '{}'.", column));
            }
        }
        Ok(())
    }
}

/// Last name segment, unquoted and lowercased
pub fn normalize_name(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    last.trim_matches(|c| matches!(c, '[' | ']' | '"' | '`'))
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::extract_statements;

    const DDL: &str = "
        CREATE TABLE [dbo].[Users] (id INT PRIMARY KEY, name NVARCHAR(50));
        CREATE TABLE Orders (id INT, user_id INT);
        CREATE INDEX ix_orders_user ON Orders (user_id);
    ";

    fn check(sql: &str) -> Result<(), String> {
        let schema = Schema::parse(DDL, SqlDialect::MsSql).unwrap();
        let shapes = extract_statements(sql, SqlDialect::MsSql).unwrap();
        shapes.iter().try_for_each(|s| schema.check(s))
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("[dbo].[Users]"), "users");
        assert_eq!(normalize_name("\"Orders\""), "orders");
        assert_eq!(normalize_name("id"), "id");
    }

    #[test]
    fn test_parse_ignores_other_statements() {
        let schema = Schema::parse(DDL, SqlDialect::MsSql).unwrap();
        assert_eq!(schema.tables.len(), 2);
        assert_eq!(schema.table("dbo.users").unwrap().name, "[dbo].[Users]");
    }

    #[test]
    fn test_valid_statement_passes() {
        assert!(check("SELECT u.name FROM Users u JOIN Orders o ON o.user_id = u.id").is_ok());
    }

    #[test]
    fn test_unknown_table() {
        assert_eq!(
            check("SELECT id FROM Customers"),
            Err("Invalid object name 'Customers'.".to_string())
        );
    }

    #[test]
    fn test_unknown_column() {
        assert_eq!(
            check("SELECT email FROM Users WHERE id = 0"),
            Err("Invalid column name 'email'.".to_string())
        );
    }

    #[test]
    fn test_cte_skips_column_checks() {
        assert!(check("WITH u AS (SELECT id FROM Users) SELECT anything FROM u").is_ok());
    }

    #[test]
    fn test_invalid_ddl() {
        assert!(Schema::parse("CREATE TABLE (", SqlDialect::MsSql).is_err());
    }
}
