//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default config location, relative to the working directory.
    pub const DEFAULT_PATH: &'static str = "config/default.toml";

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        config.logging.dir = PathBuf::from(Self::expand_path(&config.logging.dir.to_string_lossy()));
        Ok(config)
    }

    /// Load `path` if given, else the default location; a missing default file
    /// yields the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(Self::DEFAULT_PATH);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.pagesnap`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.snapshot.max_frame_depth, 8);
        assert_eq!(config.output.format, "text");
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [snapshot]
            ref_attribute = "data-ref"
            include_frames = false
            max_frame_depth = 3

            [output]
            format = "json"
            framed = true

            [logging]
            level = "debug"
            file = true
            dir = "/var/log/pagesnap"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.snapshot.ref_attribute, "data-ref");
        assert!(!config.snapshot.include_frames);
        assert_eq!(config.snapshot.max_frame_depth, 3);
        assert_eq!(config.output.format, "json");
        assert!(config.output.framed);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.dir, PathBuf::from("/var/log/pagesnap"));
    }

    #[test]
    fn test_log_dir_tilde_is_expanded() {
        let config = ConfigLoader::load_str("[logging]\ndir = \"~/snap-logs\"").unwrap();
        let dir = config.logging.dir.to_string_lossy().to_string();
        assert!(!dir.starts_with('~'));
        assert!(dir.ends_with("snap-logs"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]").unwrap();
        writeln!(file, "framed = true").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert!(config.output.framed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/pagesnap.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_with_explicit_missing_path() {
        let result = ConfigLoader::load_or_default(Some(Path::new("/nonexistent/pagesnap.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_load_wrong_type() {
        let result = ConfigLoader::load_str("[snapshot]\nmax_frame_depth = \"deep\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("PAGESNAP_TEST_REF_ATTR", "data-test-ref");
        }
        let config =
            ConfigLoader::load_str("[snapshot]\nref_attribute = \"${PAGESNAP_TEST_REF_ATTR}\"").unwrap();
        assert_eq!(config.snapshot.ref_attribute, "data-test-ref");
        unsafe {
            std::env::remove_var("PAGESNAP_TEST_REF_ATTR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_PAGESNAP_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/share";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }
}
