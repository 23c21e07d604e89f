pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create syntax model load error
pub fn model_parse_error(path: &str, message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Invalid syntax model '{}': {}", path, message.into()))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create connection target error
pub fn connection_error(message: impl Into<String>) -> AppError {
    AppError::service(message.into())
}

/// Format SQL error with position highlighting
pub fn format_sql_error(prefix: &str, message: &str) -> String {
    // sqlparser format: "... at Line: X, Column Y"
    if let Some(pos) = extract_position(message) {
        format!(
            "{} at line {}, column {}: {}",
            prefix, pos.line, pos.column, message
        )
    } else {
        format!("{}: {}", prefix, message)
    }
}

struct SqlPosition {
    line:   usize,
    column: usize
}

fn extract_position(message: &str) -> Option<SqlPosition> {
    let line_marker = "Line: ";
    let col_marker = ", Column ";

    let line_start = message.find(line_marker)?;
    let line_num_start = line_start + line_marker.len();
    let col_start = message[line_num_start..].find(col_marker)?;
    let line_str = &message[line_num_start..line_num_start + col_start];
    let col_num_start = line_num_start + col_start + col_marker.len();

    let col_end = message[col_num_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(message.len() - col_num_start);
    let col_str = &message[col_num_start..col_num_start + col_end];

    match (line_str.parse(), col_str.parse()) {
        (Ok(line), Ok(column)) => Some(SqlPosition {
            line,
            column
        }),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sql_error_with_position() {
        let msg = format_sql_error("Parse error", "Expected: end of statement at Line: 3, Column 14");
        assert!(msg.starts_with("Parse error at line 3, column 14:"));
    }

    #[test]
    fn test_format_sql_error_without_position() {
        let msg = format_sql_error("Parse error", "Unexpected EOF");
        assert_eq!(msg, "Parse error: Unexpected EOF");
    }

    #[test]
    fn test_extract_position_rejects_garbage() {
        assert!(extract_position("at Line: x, Column 1").is_none());
        assert!(extract_position("no position here").is_none());
    }
}
