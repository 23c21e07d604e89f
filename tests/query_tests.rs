// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use sql_param_validator::query::{SqlDialect, StatementKind, extract_statements};

#[test]
fn test_parse_simple_select() {
    let shapes = extract_statements("SELECT id, name FROM users WHERE id = 1", SqlDialect::Generic)
        .unwrap();

    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].kind, StatementKind::Select);
    assert_eq!(shapes[0].tables, vec!["users"]);
    assert!(shapes[0].columns.iter().any(|c| c.as_str() == "name"));
}

#[test]
fn test_parse_join() {
    let shapes = extract_statements(
        "SELECT u.id, o.total FROM users u JOIN orders o ON u.id = o.user_id",
        SqlDialect::Generic
    )
    .unwrap();

    assert_eq!(shapes[0].tables.len(), 2);
    assert!(shapes[0].columns.iter().any(|c| c.as_str() == "user_id"));
}

#[test]
fn test_parse_multiple_statements() {
    let shapes = extract_statements("SELECT * FROM users; SELECT * FROM orders;", SqlDialect::MsSql)
        .unwrap();

    assert_eq!(shapes.len(), 2);
}

#[test]
fn test_parse_insert() {
    let shapes = extract_statements(
        "INSERT INTO users (id, name) VALUES (0, '')",
        SqlDialect::MsSql
    )
    .unwrap();

    assert_eq!(shapes[0].kind, StatementKind::Insert);
    assert_eq!(shapes[0].tables, vec!["users"]);
}

#[test]
fn test_bracketed_names() {
    let shapes = extract_statements("SELECT [name] FROM [dbo].[Users]", SqlDialect::MsSql).unwrap();

    assert_eq!(shapes[0].tables.len(), 1);
    assert!(shapes[0].tables[0].contains("Users"));
}

#[test]
fn test_union_collects_both_sides() {
    let shapes = extract_statements(
        "SELECT id FROM users UNION ALL SELECT id FROM admins",
        SqlDialect::Generic
    )
    .unwrap();

    assert_eq!(shapes[0].tables, vec!["users", "admins"]);
}

#[test]
fn test_unbound_placeholder_is_not_a_column() {
    let shapes = extract_statements("SELECT name FROM users WHERE id = @id", SqlDialect::MsSql)
        .unwrap();

    assert!(!shapes[0].columns.iter().any(|c| c.starts_with('@')));
}

#[test]
fn test_other_statements() {
    let shapes = extract_statements("CREATE TABLE t (id INT)", SqlDialect::Generic).unwrap();

    assert_eq!(shapes[0].kind, StatementKind::Other);
    assert!(shapes[0].tables.is_empty());
}

#[test]
fn test_invalid_sql() {
    let err = extract_statements("SELEC * FROM users", SqlDialect::Generic).unwrap_err();
    assert!(err.starts_with("Incorrect syntax"));
}
