//! This crate provides the core logic for a deterministic single-tape Turing Machine
//! simulator. It includes modules for describing machines, executing them step by step or
//! continuously, recording the execution trace, storing machine configurations as JSON and
//! a small catalog of example machines.

pub mod config;
pub mod definition;
pub mod history;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the persisted configuration types from the config module.
pub use config::{MachineConfig, TransitionConfig};
/// Re-exports the machine description types from the definition module.
pub use definition::{DefinitionBuilder, MachineDefinition, StateRole, Warning};
/// Re-exports the execution trace types from the history module.
pub use history::{History, HistoryEntry};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the execution engine from the machine module.
pub use machine::{RunHandle, Snapshot, TuringMachine};
/// Re-exports the preset catalog from the programs module.
pub use programs::{Preset, PresetInfo, PresetManager, PRESETS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the shared types from the types module.
pub use types::{Direction, Halt, MachineError, Speed, Status, Step, Transition};
