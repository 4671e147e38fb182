use std::fmt;

/// Machine-readable error codes for hosts that surface configuration faults.
///
/// Graph queries never fail; these codes only cover the configuration
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    EmptyLayerName,
    InvalidDepthLimit,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::EmptyLayerName => "E1002",
            Self::InvalidDepthLimit => "E1003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Analysis config parse error",
            Self::EmptyLayerName => "Projection rule has an empty layer name",
            Self::InvalidDepthLimit => "Depth limit must be at least 1",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix the TOML syntax and retry."),
            Self::EmptyLayerName => {
                Some("Give every rule a non-empty source_layer and target_layer.")
            }
            Self::InvalidDepthLimit => Some("Set max_depth to a positive integer."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure for an [`AnalysisConfig`](crate::config::AnalysisConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed TOML: {message}")]
    Parse { message: String },

    #[error("projection rule #{index} has an empty {side} layer")]
    EmptyLayerName { index: usize, side: &'static str },

    #[error("{field} must be at least 1")]
    ZeroDepth { field: &'static str },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse {
            message: err.message().to_string(),
        }
    }
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::EmptyLayerName { .. } => ErrorCode::EmptyLayerName,
            Self::ZeroDepth { .. } => ErrorCode::InvalidDepthLimit,
        }
    }
}
