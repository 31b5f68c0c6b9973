//! Cell values moving between CSV rows and SQLite tables.

use std::fmt;

/// A single stored value.
///
/// The row mapper only produces `Integer`, `Real`, and `Text`; `Null` and
/// `Blob` appear when reading existing tables back.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Real(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(value) => write!(f, "{value}"),
            // Keep a trailing ".0" so whole reals stay distinguishable from integers.
            CellValue::Real(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            CellValue::Real(value) => write!(f, "{value}"),
            CellValue::Text(value) => f.write_str(value),
            CellValue::Blob(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Integer(30).to_string(), "30");
        assert_eq!(CellValue::Real(0.0).to_string(), "0.0");
        assert_eq!(CellValue::Real(2.5).to_string(), "2.5");
        assert_eq!(CellValue::from("Alice").to_string(), "Alice");
        assert_eq!(CellValue::Blob(vec![0x0a, 0xff]).to_string(), "0aff");
    }
}
