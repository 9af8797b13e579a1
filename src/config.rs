use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PinvaultError;
use crate::transform::DEFAULT_SHIFT;

const DEFAULT_FILE: &str = "passwords.txt";

/// Optional TOML overrides, read only when `--config` is given.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Passwords file, relative to the working directory unless absolute.
    pub file: Option<PathBuf>,
    /// Obfuscation shift. Files written with one shift only read back with the same one.
    pub shift: Option<u8>,
}

/// Effective settings for one run.
#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub file: PathBuf,
    pub shift: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_FILE),
            shift: DEFAULT_SHIFT,
        }
    }
}

impl Settings {
    /// Layer settings: CLI flag, then config file, then defaults.
    pub fn resolve(cli_file: Option<PathBuf>, config: Option<FileConfig>) -> Self {
        let config = config.unwrap_or_default();
        let defaults = Self::default();
        Self {
            file: cli_file.or(config.file).unwrap_or(defaults.file),
            shift: config.shift.unwrap_or(defaults.shift),
        }
    }
}

/// Read and parse a config file. A path given explicitly must exist.
pub fn read(path: &Path) -> Result<FileConfig, PinvaultError> {
    if !path.exists() {
        return Err(PinvaultError::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| PinvaultError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(None, None);
        assert_eq!(settings.file, PathBuf::from("passwords.txt"));
        assert_eq!(settings.shift, 3);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pinvault.toml");
        std::fs::write(&path, "file = \"vault.txt\"\nshift = 7\n").unwrap();

        let settings = Settings::resolve(None, Some(read(&path).unwrap()));
        assert_eq!(settings.file, PathBuf::from("vault.txt"));
        assert_eq!(settings.shift, 7);
    }

    #[test]
    fn test_cli_file_beats_config_file() {
        let config = FileConfig {
            file: Some(PathBuf::from("from-config.txt")),
            shift: None,
        };
        let settings = Settings::resolve(Some(PathBuf::from("from-cli.txt")), Some(config));
        assert_eq!(settings.file, PathBuf::from("from-cli.txt"));
        assert_eq!(settings.shift, 3);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pinvault.toml");
        std::fs::write(&path, "shift = 5\n").unwrap();

        let settings = Settings::resolve(None, Some(read(&path).unwrap()));
        assert_eq!(settings.file, PathBuf::from("passwords.txt"));
        assert_eq!(settings.shift, 5);
    }

    #[test]
    fn test_missing_config_is_error() {
        let dir = TempDir::new().unwrap();
        let err = read(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, PinvaultError::Config(_)));
    }

    #[test]
    fn test_unknown_or_bad_keys_are_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pinvault.toml");

        std::fs::write(&path, "colour = \"blue\"\n").unwrap();
        assert!(matches!(read(&path).unwrap_err(), PinvaultError::Config(_)));

        std::fs::write(&path, "shift = 300\n").unwrap();
        assert!(matches!(read(&path).unwrap_err(), PinvaultError::Config(_)));
    }
}
