use thiserror::Error;

/// Errors raised when domain input cannot be interpreted.
///
/// Cell normalization and MSA parsing are total and never produce these;
/// they come from strict parsers such as `AreaType::from_str`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown area type: {0}")]
    UnknownAreaType(String),
}
