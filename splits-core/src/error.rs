use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitsError {
    Parse {
        message: String,
        line: usize,
        column: usize,
    },
    Catalog(String),
    Serialization(String),
    Internal(String),
}

impl Display for SplitsError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SplitsError::Parse {
                message,
                line,
                column,
            } => write!(f, "Malformed JSON at line {}, column {}: {}", line, column, message),
            SplitsError::Catalog(s) => write!(f, "Catalog error: {}", s),
            SplitsError::Serialization(s) => write!(f, "Serialization error: {}", s),
            SplitsError::Internal(s) => write!(f, "Internal error: {}", s),
        }
    }
}

impl From<serde_json::Error> for SplitsError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            SplitsError::Parse {
                message: err.to_string(),
                line: err.line(),
                column: err.column(),
            }
        } else {
            SplitsError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_maps_to_parse_variant() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SplitsError = err.into();
        assert!(matches!(err, SplitsError::Parse { line: 1, .. }));
        assert!(err.to_string().starts_with("Malformed JSON at line 1"));
    }

    #[test]
    fn test_data_error_maps_to_serialization() {
        let err = serde_json::from_str::<Vec<String>>("[1]").unwrap_err();
        let err: SplitsError = err.into();
        assert!(matches!(err, SplitsError::Serialization(_)));
    }

    #[test]
    fn test_catalog_display() {
        let err = SplitsError::Catalog("no split definitions found".to_string());
        assert_eq!(err.to_string(), "Catalog error: no split definitions found");
    }
}
