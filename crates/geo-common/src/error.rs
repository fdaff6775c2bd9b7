//! Error taxonomy for spatial reference and transform operations.

use thiserror::Error;

/// Result type alias using GeoRefError.
pub type GeoRefResult<T> = Result<T, GeoRefError>;

/// Primary error type for reference, transform and extent operations.
///
/// Every variant is recoverable. Callers are expected to skip the affected
/// layer or point and carry on with the rest of the work.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoRefError {
    #[error("Invalid spatial reference: {0}")]
    ReferenceInvalid(String),

    #[error("No transform available from '{from}' to '{to}'")]
    TransformUnavailable { from: String, to: String },

    #[error("Coordinate ({x}, {y}) is outside the domain of the transform")]
    PointOutOfDomain { x: f64, y: f64 },

    #[error("Extent is degenerate")]
    DegenerateExtent,

    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GeoRefError {
    /// Short machine-readable code, used as a structured logging field.
    pub fn code(&self) -> &'static str {
        match self {
            GeoRefError::ReferenceInvalid(_) => "ReferenceInvalid",
            GeoRefError::TransformUnavailable { .. } => "TransformUnavailable",
            GeoRefError::PointOutOfDomain { .. } => "PointOutOfDomain",
            GeoRefError::DegenerateExtent => "DegenerateExtent",
            GeoRefError::InvalidExtent(_) => "InvalidExtent",
            GeoRefError::Config(_) => "Config",
        }
    }

    /// Whether this error is worth a diagnostic log entry.
    ///
    /// A degenerate extent only means "nothing to contribute" and is skipped
    /// without logging.
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, GeoRefError::DegenerateExtent)
    }
}

impl From<crate::extent::ExtentParseError> for GeoRefError {
    fn from(err: crate::extent::ExtentParseError) -> Self {
        GeoRefError::InvalidExtent(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GeoRefError::ReferenceInvalid("x".into()).code(),
            "ReferenceInvalid"
        );
        assert_eq!(
            GeoRefError::TransformUnavailable {
                from: "a".into(),
                to: "b".into()
            }
            .code(),
            "TransformUnavailable"
        );
    }

    #[test]
    fn test_degenerate_is_not_diagnostic() {
        assert!(!GeoRefError::DegenerateExtent.is_diagnostic());
        assert!(GeoRefError::PointOutOfDomain { x: 0.0, y: 0.0 }.is_diagnostic());
    }
}
