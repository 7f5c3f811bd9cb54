use crate::{
    errors::{FileOperation, IoError},
    utils::DEFAULT_PREFIX,
};
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(emptycopy::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(emptycopy::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Run defaults, optionally read from a TOML file:
///
/// ```toml
/// prefix = "skeleton_"
/// depth = 3
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Prepended to the source name to form the default target.
    pub prefix: String,
    /// `None` replicates the whole tree.
    pub depth: Option<usize>,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            depth: None,
        }
    }
}

/// Values given on the command line; each one that is set wins over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub prefix: Option<String>,
    pub depth: Option<usize>,
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::ReadFile, path.to_path_buf(), error))?;

        let parsed = toml::from_str(&content).map_err(|err| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source: err,
        })?;

        Ok(parsed)
    }

    pub fn merge(self, overrides: Overrides) -> Self {
        Self {
            prefix: overrides.prefix.unwrap_or(self.prefix),
            depth: overrides.depth.or(self.depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("emptycopy.toml");
        fs::write(&path, "depth = 2\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();

        assert_eq!(settings.prefix, DEFAULT_PREFIX);
        assert_eq!(settings.depth, Some(2));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("emptycopy.toml");
        fs::write(&path, "deepth = 2\n").unwrap();

        let result = Settings::from_file(&path);

        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = tempdir().unwrap();

        let result = Settings::from_file(tmp.path().join("absent.toml"));

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let file = Settings {
            prefix: "skel_".to_string(),
            depth: Some(4),
        };

        let merged = file.clone().merge(Overrides {
            prefix: None,
            depth: Some(1),
        });

        assert_eq!(merged.prefix, "skel_");
        assert_eq!(merged.depth, Some(1));
        assert_eq!(file.merge(Overrides::default()).depth, Some(4));
    }
}
