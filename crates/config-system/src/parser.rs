//! Configuration parser for multiple formats

use crate::{ConfigError, MonitorConfig, Result};

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect configuration format from a file extension
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }
}

/// Configuration parser
pub struct ConfigParser;

impl ConfigParser {
    /// Parse configuration from a string. Missing sections fall back to defaults.
    pub fn parse_str(content: &str, format: ConfigFormat) -> Result<MonitorConfig> {
        if content.trim().is_empty() {
            return Ok(MonitorConfig::default());
        }

        match format {
            ConfigFormat::Yaml => Self::parse_yaml(content),
            ConfigFormat::Json => Self::parse_json(content),
            ConfigFormat::Toml => Self::parse_toml(content),
        }
    }

    fn parse_yaml(content: &str) -> Result<MonitorConfig> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("YAML parse error: {}", e)))
    }

    fn parse_json(content: &str) -> Result<MonitorConfig> {
        serde_json::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e)))
    }

    fn parse_toml(content: &str) -> Result<MonitorConfig> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))
    }

    /// Serialize configuration to a string
    pub fn to_string(config: &MonitorConfig, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Yaml => serde_yaml::to_string(config)
                .map_err(|e| ConfigError::Parse(format!("YAML serialize error: {}", e))),
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::Parse(format!("JSON serialize error: {}", e))),
            ConfigFormat::Toml => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::Parse(format!("TOML serialize error: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
feed:
  base_url: "https://plant-1234.firebaseio.com"
  live_path: live_data
simulator:
  default_image: img/idle.png
logging:
  level: debug
"#;

        let config = ConfigParser::parse_str(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.feed.base_url, "https://plant-1234.firebaseio.com");
        assert_eq!(config.feed.alerts_path, "alerts/active");
        assert_eq!(config.simulator.default_image, "img/idle.png");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_json_parsing() {
        let json = r#"{
            "feed": { "namespace": "plant-demo" },
            "dashboard": { "metric_count": 2 }
        }"#;

        let config = ConfigParser::parse_str(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.feed.namespace.as_deref(), Some("plant-demo"));
        assert_eq!(config.dashboard.metric_count, 2);
        assert_eq!(config.dashboard.no_alerts_text, "No active alerts");
    }

    #[test]
    fn test_toml_parsing() {
        let toml = r#"
[simulator]
step_image_template = "assets/stage-{step}.svg"
"#;
        let config = ConfigParser::parse_str(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.simulator.step_image(2), "assets/stage-2.svg");
    }

    #[test]
    fn test_empty_content_is_default() {
        let config = ConfigParser::parse_str("   ", ConfigFormat::Json).unwrap();
        assert_eq!(config, MonitorConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = ConfigParser::parse_str("{ feed: ", ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_defaults_survive_every_format() {
        let config = MonitorConfig::default();
        for format in [ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            let text = ConfigParser::to_string(&config, format).unwrap();
            let parsed = ConfigParser::parse_str(&text, format).unwrap();
            assert_eq!(parsed, config, "{format:?}");
        }
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_extension("yml"), Ok(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension(".TOML"), Ok(ConfigFormat::Toml));
        assert!(ConfigFormat::from_extension("ini").is_err());
    }
}
