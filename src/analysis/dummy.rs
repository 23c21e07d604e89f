//! Placeholder values for parameters whose runtime value is unknown.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What to do with a static type that has no placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedTypePolicy {
    /// Fall back to an empty string
    #[default]
    Lenient,
    /// Refuse with [`UnmappedType`]
    Strict
}

impl UnmappedTypePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None
        }
    }
}

/// Representative value of a scalar type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DummyValue {
    Text(String),
    Byte(u8),
    SByte(i8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    Decimal(f64),
    Boolean(bool)
}

impl DummyValue {
    /// Literal form for substitution into SQL text.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Boolean(b) => String::from(if *b { "1" } else { "0" }),
            other => other.to_string()
        }
    }
}

impl fmt::Display for DummyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{:?}", s),
            Self::Byte(v) => write!(f, "{}", v),
            Self::SByte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Single(v) => write!(f, "{:?}", v),
            Self::Double(v) | Self::Decimal(v) => write!(f, "{:?}", v),
            Self::Boolean(v) => write!(f, "{}", v)
        }
    }
}

/// Static type with no entry in the placeholder table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedType {
    pub type_name: Option<String>
}

/// Placeholder for a value of `static_type`.
///
/// Namespaces are ignored (`System.Int32` is `Int32`) and keyword aliases are
/// accepted. A missing type counts as unmapped.
pub fn synthesize(
    static_type: Option<&str>,
    policy: UnmappedTypePolicy
) -> Result<DummyValue, UnmappedType> {
    match static_type.and_then(lookup) {
        Some(value) => Ok(value),
        None => match policy {
            UnmappedTypePolicy::Lenient => Ok(DummyValue::Text(String::new())),
            UnmappedTypePolicy::Strict => Err(UnmappedType {
                type_name: static_type.map(str::to_string)
            })
        }
    }
}

fn lookup(type_name: &str) -> Option<DummyValue> {
    let name = type_name.trim();
    let name = name.rsplit('.').next().unwrap_or(name);
    let value = match name {
        "String" | "string" => DummyValue::Text(String::new()),
        "Byte" | "byte" => DummyValue::Byte(0),
        "SByte" | "sbyte" => DummyValue::SByte(0),
        "Int16" | "short" => DummyValue::Int16(0),
        "UInt16" | "ushort" => DummyValue::UInt16(0),
        "Int32" | "int" => DummyValue::Int32(0),
        "UInt32" | "uint" => DummyValue::UInt32(0),
        "Int64" | "long" => DummyValue::Int64(0),
        "UInt64" | "ulong" => DummyValue::UInt64(0),
        "Single" | "float" => DummyValue::Single(0.0),
        "Double" | "double" => DummyValue::Double(0.0),
        "Decimal" | "decimal" => DummyValue::Decimal(0.0),
        "Boolean" | "bool" => DummyValue::Boolean(false),
        _ => return None
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_maps_to_zero() {
        assert_eq!(
            synthesize(Some("Int32"), UnmappedTypePolicy::Strict),
            Ok(DummyValue::Int32(0))
        );
        assert_eq!(
            synthesize(Some("System.Int64"), UnmappedTypePolicy::Strict),
            Ok(DummyValue::Int64(0))
        );
    }

    #[test]
    fn test_text_maps_to_empty_string() {
        assert_eq!(
            synthesize(Some("string"), UnmappedTypePolicy::Strict),
            Ok(DummyValue::Text(String::new()))
        );
    }

    #[test]
    fn test_floating_and_decimal() {
        assert_eq!(
            synthesize(Some("Single"), UnmappedTypePolicy::Lenient),
            Ok(DummyValue::Single(0.0))
        );
        assert_eq!(
            synthesize(Some("decimal"), UnmappedTypePolicy::Lenient),
            Ok(DummyValue::Decimal(0.0))
        );
        assert_eq!(
            synthesize(Some("Boolean"), UnmappedTypePolicy::Lenient),
            Ok(DummyValue::Boolean(false))
        );
    }

    #[test]
    fn test_unmapped_lenient_is_empty_string() {
        assert_eq!(
            synthesize(Some("Customer"), UnmappedTypePolicy::Lenient),
            Ok(DummyValue::Text(String::new()))
        );
        assert_eq!(
            synthesize(None, UnmappedTypePolicy::Lenient),
            Ok(DummyValue::Text(String::new()))
        );
    }

    #[test]
    fn test_unmapped_strict_fails() {
        let err = synthesize(Some("Customer"), UnmappedTypePolicy::Strict).unwrap_err();
        assert_eq!(err.type_name.as_deref(), Some("Customer"));
        let err = synthesize(None, UnmappedTypePolicy::Strict).unwrap_err();
        assert!(err.type_name.is_none());
    }

    #[test]
    fn test_sql_literals() {
        assert_eq!(DummyValue::Text(String::new()).to_sql_literal(), "''");
        assert_eq!(DummyValue::Text("o'k".into()).to_sql_literal(), "'o''k'");
        assert_eq!(DummyValue::Int32(0).to_sql_literal(), "0");
        assert_eq!(DummyValue::Double(0.0).to_sql_literal(), "0.0");
        assert_eq!(DummyValue::Boolean(false).to_sql_literal(), "0");
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(UnmappedTypePolicy::parse("STRICT"), Some(UnmappedTypePolicy::Strict));
        assert_eq!(UnmappedTypePolicy::parse("lenient"), Some(UnmappedTypePolicy::Lenient));
        assert_eq!(UnmappedTypePolicy::parse("loose"), None);
    }
}
