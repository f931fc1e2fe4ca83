//! Optional TOML configuration for the publish command.
//!
//! Flags and environment variables always win; the file only fills in what
//! they leave unset.

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Notion integration token.
    pub token: Option<String>,
    /// Page ID new pages are created under.
    pub parent_page: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_both_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "token = \"secret_abc\"\nparent_page = \"1234\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.token.as_deref(), Some("secret_abc"));
        assert_eq!(config.parent_page.as_deref(), Some("1234"));
    }

    #[test]
    fn fields_are_optional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "token = \"secret_abc\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.parent_page.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tokn = \"typo\"").unwrap();

        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_reports_io() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/notedown.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
