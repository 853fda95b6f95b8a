//! The catalog of example machines shipped with the crate.

use crate::config::MachineConfig;
use crate::types::MachineError;
use serde::Deserialize;
use tracing::error;

// Default embedded machines
const PRESET_TEXTS: [&str; 4] = [
    include_str!("../machines/even-binary.json"),
    include_str!("../machines/palindrome.json"),
    include_str!("../machines/binary-increment.json"),
    include_str!("../machines/three-zeros.json"),
];

/// An example machine together with a short explanation and a sample input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Preset {
    /// Short identifier, e.g. `evenBinary`.
    pub key: String,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub config: MachineConfig,
}

lazy_static::lazy_static! {
    pub static ref PRESETS: Vec<Preset> = PRESET_TEXTS
        .iter()
        .filter_map(|text| match serde_json::from_str::<Preset>(text) {
            Ok(preset) => Some(preset),
            Err(e) => {
                error!("Failed to parse preset: {}", e);
                None
            }
        })
        .collect();
}

pub struct PresetManager;

impl PresetManager {
    /// Get the number of available presets
    pub fn count() -> usize {
        PRESETS.len()
    }

    /// Get a preset by its index
    pub fn get_by_index(index: usize) -> Result<&'static Preset, MachineError> {
        PRESETS.get(index).ok_or_else(|| {
            MachineError::ValidationError(format!("Preset index {} out of range", index))
        })
    }

    /// Get a preset by its key
    pub fn get_by_key(key: &str) -> Result<&'static Preset, MachineError> {
        PRESETS
            .iter()
            .find(|preset| preset.key == key)
            .ok_or_else(|| MachineError::ValidationError(format!("Preset '{}' not found", key)))
    }

    /// Get a preset by its display name
    pub fn get_by_name(name: &str) -> Result<&'static Preset, MachineError> {
        PRESETS
            .iter()
            .find(|preset| preset.name == name)
            .ok_or_else(|| MachineError::ValidationError(format!("Preset '{}' not found", name)))
    }

    /// List all preset names
    pub fn list_names() -> Vec<String> {
        PRESETS.iter().map(|preset| preset.name.clone()).collect()
    }

    /// Get summary information about a preset by its index
    pub fn info(index: usize) -> Result<PresetInfo, MachineError> {
        let preset = Self::get_by_index(index)?;

        Ok(PresetInfo {
            index,
            key: preset.key.clone(),
            name: preset.name.clone(),
            initial_state: preset.config.initial_state.clone(),
            input_string: preset.config.input_string.clone(),
            state_count: preset.config.states.len(),
            transition_count: preset.config.transitions.len(),
        })
    }

    /// Search for presets by name, case-insensitively
    pub fn search(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PRESETS
            .iter()
            .enumerate()
            .filter(|(_, preset)| preset.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct PresetInfo {
    pub index: usize,
    pub key: String,
    pub name: String,
    pub initial_state: String,
    pub input_string: String,
    pub state_count: usize,
    pub transition_count: usize,
}
