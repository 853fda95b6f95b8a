//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! configurations from files, directories and strings, and for saving them back to disk.

use crate::config::MachineConfig;
use crate::types::MachineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The file extension of stored machine configurations.
pub const CONFIG_EXTENSION: &str = "json";

/// `ProgramLoader` is a utility struct for loading and storing machine configurations.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine configuration from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(MachineConfig)` if the file is read and parsed successfully.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ParseError)` if the file content is not a valid configuration.
    pub fn load_config(path: &Path) -> Result<MachineConfig, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loading machine configuration");
        MachineConfig::from_json(&content)
    }

    /// Loads a single machine configuration from the provided string content.
    ///
    /// This is useful for configurations that are not stored in files, e.g. piped input.
    pub fn load_config_from_string(content: &str) -> Result<MachineConfig, MachineError> {
        MachineConfig::from_json(content)
    }

    /// Loads all configuration files (`.json` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped. Each remaining file yields
    /// either its path and configuration or the error that prevented loading it.
    pub fn load_configs(directory: &Path) -> Vec<Result<(PathBuf, MachineConfig), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != CONFIG_EXTENSION) {
                    return None;
                }

                match Self::load_config(&path) {
                    Ok(config) => Some(Ok((path, config))),
                    Err(e) => Some(Err(MachineError::FileError(format!(
                        "Failed to load configuration from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // read_dir order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });
        results
    }

    /// Writes `config` as pretty-printed JSON to `path`, replacing any existing file.
    pub fn save_config(path: &Path, config: &MachineConfig) -> Result<(), MachineError> {
        let content = config.to_json()?;

        fs::write(path, content).map_err(|e| {
            MachineError::FileError(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "saved machine configuration");
        Ok(())
    }
}
