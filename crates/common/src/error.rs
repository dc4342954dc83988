//! Configuration error types

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using the configuration Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_includes_reason() {
        let err = Error::Config("base_url is empty".into());
        assert_eq!(err.to_string(), "invalid configuration: base_url is empty");
    }

    #[test]
    fn io_error_converts_via_question_mark() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/modam/config.toml")?)
        }
        let err = read_missing().unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got: {err:?}");
        assert!(err.to_string().starts_with("I/O error:"));
    }

    #[test]
    fn toml_error_converts_via_question_mark() {
        fn parse_bad() -> Result<toml::Table> {
            Ok(toml::from_str("[api\nbase_url = ")?)
        }
        let err = parse_bad().unwrap_err();
        assert!(matches!(err, Error::Toml(_)), "got: {err:?}");
    }
}
