//! `luacube.toml` loading.
//!
//! ```toml
//! [format]
//! call_parens = "always"
//!
//! [compat]
//! if_expressions = true
//! max_iterations = 32
//! ```

use std::path::{Path, PathBuf};

use lc_compat::CompatOptions;
use lc_format::FormatOptions;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "luacube.toml";

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub format: FormatOptions,
    pub compat: CompatOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }

    /// The explicit `--config` file if given, else `luacube.toml` next to
    /// `input`, else defaults.
    pub fn resolve(explicit: Option<&Path>, input: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let dir = input.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config");
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use lc_format::CallParens;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml(Path::new("luacube.toml"), "").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.compat.max_iterations, 64);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = Config::from_toml(
            Path::new("luacube.toml"),
            "[format]\ncall_parens = \"always\"\n\n[compat]\nif_expressions = false\n",
        )
        .unwrap();
        assert_eq!(config.format.call_parens, CallParens::Always);
        assert!(!config.compat.if_expressions);
        assert!(config.compat.floor_division);
    }

    #[test]
    fn bad_values_are_reported_with_the_path() {
        let err = Config::from_toml(Path::new("cfg/luacube.toml"), "[format]\ncall_parens = \"sometimes\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.to_string(), "invalid config cfg/luacube.toml");
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let err = Config::resolve(Some(Path::new("/nonexistent/luacube.toml")), Path::new("x.luau")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
