//! Configuration management for classmine.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `classmine.toml` file
//! 3. User config `~/.config/classmine/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Archive walking configuration.
    pub extraction: ExtractionConfig,

    /// Fact output configuration.
    pub output: OutputConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./classmine.toml` (project local)
    /// 2. `~/.config/classmine/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("CLASSMINE_OUTPUT_DIR") {
            self.output.output_dir = dir;
        }
        if let Ok(level) = std::env::var("CLASSMINE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(threads) = std::env::var("CLASSMINE_THREADS") {
            if let Ok(n) = threads.parse() {
                self.extraction.threads = n;
            }
        }
        if let Ok(skip) = std::env::var("CLASSMINE_SKIP_META_INF") {
            if let Ok(b) = skip.parse() {
                self.extraction.skip_meta_inf = b;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.extraction.jar_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "extraction.jar_extensions must not be empty".to_string(),
            ));
        }
        if self.output.output_dir.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "output.output_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Archive walking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Skip entries under `META-INF/`.
    pub skip_meta_inf: bool,

    /// Worker threads for multi-jar runs (0 = one per core).
    pub threads: usize,

    /// Archive extensions (without leading dot) found by directory scans.
    pub jar_extensions: Vec<String>,

    /// Directories excluded from directory scans.
    pub exclude_dirs: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            skip_meta_inf: DEFAULT_SKIP_META_INF,
            threads: DEFAULT_THREADS,
            jar_extensions: DEFAULT_JAR_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExtractionConfig {
    /// Whether an archive entry should go through a class-file pass.
    pub fn is_class_entry(&self, entry_name: &str) -> bool {
        if !entry_name.ends_with(CLASS_FILE_SUFFIX) {
            return false;
        }
        !(self.skip_meta_inf && entry_name.starts_with(META_INF_PREFIX))
    }

    /// Whether a path on disk looks like an archive to extract.
    pub fn is_jar_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                self.jar_extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Fact output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; each jar gets its own subdirectory.
    pub output_dir: String,

    /// Entity facts file name.
    pub entities_file: String,

    /// Relation facts file name.
    pub relations_file: String,

    /// File facts file name.
    pub files_file: String,

    /// Parameter facts file name.
    pub local_variables_file: String,

    /// Completion marker file name.
    pub marker_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            entities_file: DEFAULT_ENTITIES_FILE.to_string(),
            relations_file: DEFAULT_RELATIONS_FILE.to_string(),
            files_file: DEFAULT_FILES_FILE.to_string(),
            local_variables_file: DEFAULT_LOCAL_VARIABLES_FILE.to_string(),
            marker_file: DEFAULT_MARKER_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    /// Output directory for one jar: `<output_dir>/<jar-stem>`.
    pub fn jar_dir(&self, root: &Path, jar: &Path) -> PathBuf {
        let stem = jar
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());
        root.join(stem)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.output_dir, DEFAULT_OUTPUT_DIR);
        assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
        assert!(config.extraction.skip_meta_inf);
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[extraction]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[extraction]
skip_meta_inf = false
threads = 4

[output]
output_dir = "facts"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(!config.extraction.skip_meta_inf);
        assert_eq!(config.extraction.threads, 4);
        assert_eq!(config.output.output_dir, "facts");
        assert_eq!(config.output.relations_file, DEFAULT_RELATIONS_FILE);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_is_class_entry() {
        let mut config = ExtractionConfig::default();
        assert!(config.is_class_entry("a/b/C.class"));
        assert!(!config.is_class_entry("a/b/C.java"));
        assert!(!config.is_class_entry("META-INF/versions/9/a/C.class"));

        config.skip_meta_inf = false;
        assert!(config.is_class_entry("META-INF/versions/9/a/C.class"));
    }

    #[test]
    fn test_is_jar_path() {
        let config = ExtractionConfig::default();
        assert!(config.is_jar_path(Path::new("lib/guava.jar")));
        assert!(config.is_jar_path(Path::new("lib/GUAVA.JAR")));
        assert!(!config.is_jar_path(Path::new("lib/guava.zip")));
        assert!(!config.is_jar_path(Path::new("lib/jar")));
    }

    #[test]
    fn test_jar_dir_uses_stem() {
        let output = OutputConfig::default();
        let dir = output.jar_dir(Path::new("out"), Path::new("/libs/commons-io-2.4.jar"));
        assert_eq!(dir, PathBuf::from("out/commons-io-2.4"));
    }
}
