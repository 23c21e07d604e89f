use indexmap::IndexMap;
use regex::Regex;

use crate::{
    analysis::{DummyValue, ParamBinding},
    error::{AppResult, config_error}
};

/// Substitutes placeholder tokens in command text with dummy literals.
///
/// Tokens inside single-quoted string literals and doubled-marker system
/// variables (`@@ROWCOUNT`) are left alone. Names are compared
/// case-insensitively and a binding registered as `@id` binds `@id`.
#[derive(Debug, Clone)]
pub struct ParameterBinder {
    marker:  String,
    pattern: Regex
}

impl ParameterBinder {
    pub fn new(marker: &str) -> AppResult<Self> {
        if marker.is_empty() {
            return Err(config_error("placeholder_marker must not be empty"));
        }
        let m = regex::escape(marker);
        let pattern = Regex::new(&format!(
            r"'(?:[^']|'')*'|{m}{m}\w+|{m}([A-Za-z_][A-Za-z0-9_]*)"
        ))
        .map_err(|e| config_error(format!("Invalid placeholder marker '{}': {}", marker, e)))?;
        Ok(Self {
            marker: marker.to_string(),
            pattern
        })
    }

    /// Bound command text.
    ///
    /// Bindings whose name is not a constant bind nothing. When a name is
    /// registered twice the first registration wins.
    ///
    /// # Errors
    ///
    /// Returns the server message for the first placeholder left unbound.
    pub fn bind(&self, sql: &str, bindings: &[ParamBinding]) -> Result<String, String> {
        let mut values: IndexMap<String, String> = IndexMap::new();
        for binding in bindings {
            if let Ok(name) = &binding.name {
                values
                    .entry(self.key(name))
                    .or_insert_with(|| {
                        binding
                            .value
                            .as_ref()
                            .map_or_else(|| String::from("NULL"), DummyValue::to_sql_literal)
                    });
            }
        }

        let mut bound = String::with_capacity(sql.len());
        let mut last = 0;
        for caps in self.pattern.captures_iter(sql) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            bound.push_str(&sql[last..token.start()]);
            match values.get(&name.as_str().to_lowercase()) {
                Some(literal) => bound.push_str(literal),
                None => {
                    return Err(format!(
                        "Must declare the scalar variable \"{}\".",
                        token.as_str()
                    ));
                }
            }
            last = token.end();
        }
        bound.push_str(&sql[last..]);
        Ok(bound)
    }

    fn key(&self, name: &str) -> String {
        name.strip_prefix(self.marker.as_str())
            .unwrap_or(name)
            .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::Unresolved,
        syntax::Location
    };

    fn binding(name: &str, value: DummyValue) -> ParamBinding {
        ParamBinding {
            name:     Ok(name.to_string()),
            location: Location::default(),
            value:    Some(value)
        }
    }

    fn binder() -> ParameterBinder {
        ParameterBinder::new("@").unwrap()
    }

    #[test]
    fn test_binds_by_name() {
        let sql = "SELECT * FROM T WHERE id=@id AND name=@Name";
        let bound = binder()
            .bind(
                sql,
                &[
                    binding("id", DummyValue::Int32(0)),
                    binding("@name", DummyValue::Text(String::new())),
                ]
            )
            .unwrap();
        assert_eq!(bound, "SELECT * FROM T WHERE id=0 AND name=''");
    }

    #[test]
    fn test_unbound_placeholder_fails() {
        let err = binder().bind("SELECT * FROM T WHERE id=@id", &[]).unwrap_err();
        assert_eq!(err, "Must declare the scalar variable \"@id\".");
    }

    #[test]
    fn test_literals_and_system_variables_untouched() {
        let sql = "SELECT 'mail@host', 'it''s @x', @@ROWCOUNT";
        assert_eq!(binder().bind(sql, &[]).unwrap(), sql);
    }

    #[test]
    fn test_unresolved_names_bind_nothing() {
        let mut unknown = binding("id", DummyValue::Int32(0));
        unknown.name = Err(Unresolved::NoSymbol);
        assert!(binder().bind("SELECT @id", &[unknown]).is_err());
    }

    #[test]
    fn test_first_registration_wins() {
        let bound = binder()
            .bind(
                "SELECT @x",
                &[binding("x", DummyValue::Int32(0)), binding("x", DummyValue::Boolean(true))]
            )
            .unwrap();
        assert_eq!(bound, "SELECT 0");
    }

    #[test]
    fn test_value_less_binding_binds_null() {
        let mut unmapped = binding("when", DummyValue::Int32(0));
        unmapped.value = None;
        let bound = binder().bind("SELECT @when", &[unmapped]).unwrap();
        assert_eq!(bound, "SELECT NULL");
    }

    #[test]
    fn test_custom_marker() {
        let binder = ParameterBinder::new(":").unwrap();
        let bound = binder
            .bind("SELECT :a", &[binding("a", DummyValue::Boolean(false))])
            .unwrap();
        assert_eq!(bound, "SELECT 0");
        assert!(ParameterBinder::new("").is_err());
    }
}
