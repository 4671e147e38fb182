//! Analysis configuration: projection rules and traversal depth limits.
//!
//! The host owns file discovery and reading; this module only parses and
//! validates TOML text.
//!
//! ```toml
//! [projection]
//! max_depth = 10
//! rules = [
//!   { source_layer = "business", target_layer = "application" },
//! ]
//!
//! [reachability]
//! default_max_depth = 5
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::projection::rules::ProjectionRule;
use crate::projection::{DEFAULT_MAX_DEPTH, DEFAULT_REACHABILITY_DEPTH};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub reachability: ReachabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Hop bound for rule-guided traversal.
    #[serde(default = "default_projection_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub rules: Vec<ProjectionRule>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_depth: default_projection_depth(),
            rules: Vec::new(),
        }
    }
}

impl ProjectionConfig {
    /// Rules linking each layer to the next one in `layers`.
    ///
    /// `["motivation", "business", "application"]` yields
    /// `motivation -> business` and `business -> application`.
    #[must_use]
    pub fn standard_layer_chain(layers: &[&str]) -> Vec<ProjectionRule> {
        layers
            .windows(2)
            .map(|pair| ProjectionRule::new(pair[0], pair[1]))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachabilityConfig {
    /// Hop bound used when a caller does not pass one explicitly.
    #[serde(default = "default_reachability_depth")]
    pub default_max_depth: usize,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            default_max_depth: default_reachability_depth(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document. Missing sections take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or fails [`Self::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(ConfigError::from)
            .context("Failed to parse analysis config")?;
        config.validate().context("Invalid analysis config")?;
        Ok(config)
    }

    /// Serialize back to TOML, e.g. for a host that writes a starter config.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize analysis config")
    }

    /// Check rule layer names and depth limits.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projection.max_depth == 0 {
            return Err(ConfigError::ZeroDepth {
                field: "projection.max_depth",
            });
        }
        if self.reachability.default_max_depth == 0 {
            return Err(ConfigError::ZeroDepth {
                field: "reachability.default_max_depth",
            });
        }
        for (index, rule) in self.projection.rules.iter().enumerate() {
            if rule.source_layer.trim().is_empty() {
                return Err(ConfigError::EmptyLayerName {
                    index,
                    side: "source",
                });
            }
            if rule.target_layer.trim().is_empty() {
                return Err(ConfigError::EmptyLayerName {
                    index,
                    side: "target",
                });
            }
        }
        Ok(())
    }
}

const fn default_projection_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

const fn default_reachability_depth() -> usize {
    DEFAULT_REACHABILITY_DEPTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AnalysisConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.projection.max_depth, 10);
        assert_eq!(config.reachability.default_max_depth, 5);
        assert!(config.projection.rules.is_empty());
    }

    #[test]
    fn parses_rules_and_limits() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [projection]
            max_depth = 4
            rules = [
              { source_layer = "business", target_layer = "application" },
              { source_layer = "application", target_layer = "technology" },
            ]

            [reachability]
            default_max_depth = 2
            "#,
        )
        .expect("valid config");

        assert_eq!(config.projection.max_depth, 4);
        assert_eq!(config.reachability.default_max_depth, 2);
        assert_eq!(
            config.projection.rules,
            vec![
                ProjectionRule::new("business", "application"),
                ProjectionRule::new("application", "technology"),
            ]
        );
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = AnalysisConfig::from_toml_str("[projection\nmax_depth = 1")
            .expect_err("malformed toml");
        assert!(err.to_string().contains("parse analysis config"));
        let cause = err
            .downcast_ref::<ConfigError>()
            .expect("config error in chain");
        assert_eq!(cause.code(), ErrorCode::ConfigParseError);
        assert!(matches!(cause, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = AnalysisConfig::from_toml_str("[projection]\nmax_depth = 0")
            .expect_err("zero depth");
        let cause = err
            .downcast_ref::<ConfigError>()
            .expect("config error in chain");
        assert_eq!(cause.code(), ErrorCode::InvalidDepthLimit);
    }

    #[test]
    fn blank_layer_name_is_rejected() {
        let config = AnalysisConfig {
            projection: ProjectionConfig {
                max_depth: 3,
                rules: vec![ProjectionRule::new("business", " ")],
            },
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyLayerName {
                index: 0,
                side: "target"
            })
        );
    }

    #[test]
    fn standard_chain_links_consecutive_layers() {
        let rules =
            ProjectionConfig::standard_layer_chain(&["motivation", "business", "application"]);
        assert_eq!(
            rules,
            vec![
                ProjectionRule::new("motivation", "business"),
                ProjectionRule::new("business", "application"),
            ]
        );
        assert!(ProjectionConfig::standard_layer_chain(&["solo"]).is_empty());
    }

    #[test]
    fn toml_round_trip_preserves_rules() {
        let config = AnalysisConfig {
            projection: ProjectionConfig {
                max_depth: 6,
                rules: vec![ProjectionRule::new("business", "application")],
            },
            ..AnalysisConfig::default()
        };
        let text = config.to_toml_string().expect("serialize");
        let parsed = AnalysisConfig::from_toml_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }
}
