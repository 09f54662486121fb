use crate::error::ConfigError;
use crate::input_format::Compression;
use crate::parser::Vocabulary;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = "output.jsonl";
pub const DEFAULT_LANGUAGE_FIELD: &str = "WARC-Identified-Content-Language";
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Record vocabulary loaded from the config document
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ParserConfig {
    pub reserved_words: Vec<String>,
    pub record_start: String,
}

impl ParserConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file. Unknown extensions are read as JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let parsed = if is_yaml {
            serde_yaml::from_str::<ParserConfig>(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str::<ParserConfig>(&content).map_err(|e| e.to_string())
        };

        let config = parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_start.trim().is_empty() {
            return Err(ConfigError::Invalid("record_start must not be empty".to_string()));
        }
        if let Some(pos) = self.reserved_words.iter().position(|w| w.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "reserved_words[{}] must not be empty",
                pos
            )));
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::new(&self.reserved_words, &self.record_start)
    }
}

/// Where and how routed records are written
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub output_root: PathBuf,
    pub file_name: String,
    pub language_field: String,
    pub default_language: String,
    pub buffer_size: usize,
}

impl RouterConfig {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        RouterConfig {
            output_root: output_root.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            language_field: DEFAULT_LANGUAGE_FIELD.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            buffer_size: 65536, // 64KB
        }
    }
}

/// Configuration for pipeline behavior
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub buffer_size: usize,
    pub progress_interval: usize,
    pub skip_empty: bool,
    pub compression: Compression,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            buffer_size: 65536,   // 64KB
            progress_interval: 0, // Disabled
            skip_empty: false,
            compression: Compression::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_json_config() {
        let config = ParserConfig::from_json_str(
            r#"{"reserved_words": ["WARC-Type", "Content-Length"], "record_start": "WARC/1.0"}"#,
        )
        .unwrap();
        assert_eq!(config.reserved_words, vec!["WARC-Type", "Content-Length"]);
        assert_eq!(config.record_start, "WARC/1.0");
    }

    #[test]
    fn test_yaml_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "reserved_words:\n  - WARC-Type\nrecord_start: WARC/1.0").unwrap();

        let config = ParserConfig::from_file(file.path()).unwrap();
        assert_eq!(config.reserved_words, vec!["WARC-Type"]);
    }

    #[test]
    fn test_missing_record_start_is_parse_error() {
        let err = ParserConfig::from_json_str(r#"{"reserved_words": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_blank_record_start_is_invalid() {
        let err =
            ParserConfig::from_json_str(r#"{"reserved_words": [], "record_start": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ParserConfig::from_file(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
