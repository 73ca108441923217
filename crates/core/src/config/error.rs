//! Errors raised while reading a `.fitkit/` project.
//!
//! Every variant carries the path of the offending file so the CLI can point
//! at `config.toml`, a `routines/*.yaml` definition, or an edit file.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// `config.toml`, a routine or an edit file exists but could not be read.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `config.toml` is not valid TOML or has an unknown shape.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A routine or edit file is not valid YAML, or a field such as
    /// `day_of_week` holds an unknown value.
    #[error("Failed to parse YAML file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// `routines/` could not be listed.
    #[error("Failed to traverse directory {path}: {source}")]
    DirectoryWalk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// Zero `tick-millis`, a routine breaking the exercise rules, or two
    /// routines sharing an id.
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = ConfigError::InvalidConfig {
            path: PathBuf::from(".fitkit/routines/monday.yaml"),
            reason: "duplicate routine id".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration in .fitkit/routines/monday.yaml: duplicate routine id"
        );

        let source = toml::from_str::<toml::Table>("tick-millis = ").unwrap_err();
        let err = ConfigError::TomlParse {
            path: PathBuf::from(".fitkit/config.toml"),
            source,
        };
        assert!(err
            .to_string()
            .starts_with("Failed to parse TOML file at .fitkit/config.toml: "));
    }
}
