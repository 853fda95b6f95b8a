//! The persisted machine configuration: a JSON document holding a full definition and the
//! input string.
//!
//! ```json
//! {
//!   "states": ["q0", "qAccept", "qReject"],
//!   "inputAlphabet": ["0", "1"],
//!   "tapeAlphabet": ["0", "1", "B"],
//!   "transitions": {
//!     "q0,0": { "nextState": "qAccept", "writeSymbol": "0", "moveDirection": "R" }
//!   },
//!   "initialState": "q0",
//!   "acceptState": "qAccept",
//!   "rejectState": "qReject",
//!   "blankSymbol": "B",
//!   "inputString": "0"
//! }
//! ```
//!
//! Symbols are stored as strings and transition keys as `"state,symbol"`. This is the only
//! place where that representation exists; everything else works on `char` symbols and
//! structured keys.

use crate::definition::MachineDefinition;
use crate::types::{Direction, MachineError, Transition};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A machine configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineConfig {
    pub states: Vec<String>,
    pub input_alphabet: Vec<String>,
    pub tape_alphabet: Vec<String>,
    pub transitions: IndexMap<String, TransitionConfig>,
    pub initial_state: String,
    pub accept_state: String,
    pub reject_state: String,
    pub blank_symbol: String,
    #[serde(default)]
    pub input_string: String,
}

/// A stored transition rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionConfig {
    pub next_state: String,
    pub write_symbol: String,
    pub move_direction: Direction,
}

impl MachineConfig {
    /// Parses a configuration from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, MachineError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Renders the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, MachineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the normalized definition described by this configuration.
    ///
    /// Fails only on representation problems: a symbol that is not a single character or a
    /// transition key without a comma. Inconsistencies between the sets are repaired by
    /// [`MachineDefinition::new`].
    pub fn to_definition(&self) -> Result<MachineDefinition, MachineError> {
        let input_alphabet = parse_symbols(&self.input_alphabet)?;
        let tape_alphabet = parse_symbols(&self.tape_alphabet)?;
        let blank = parse_symbol(&self.blank_symbol)?;

        let transitions = self
            .transitions
            .iter()
            .map(|(key, rule)| {
                let (state, symbol) = parse_key(key)?;
                let transition = Transition::new(
                    rule.next_state.as_str(),
                    parse_symbol(&rule.write_symbol)?,
                    rule.move_direction,
                );
                Ok::<_, MachineError>(((state, symbol), transition))
            })
            .collect::<Result<Vec<_>, MachineError>>()?;

        Ok(MachineDefinition::new(
            self.states.iter().cloned(),
            input_alphabet,
            tape_alphabet,
            transitions,
            self.initial_state.as_str(),
            self.accept_state.as_str(),
            self.reject_state.as_str(),
            blank,
        ))
    }

    /// Captures a definition and an input string in their stored form.
    pub fn from_definition(definition: &MachineDefinition, input: &str) -> Self {
        Self {
            states: definition.states().iter().cloned().collect(),
            input_alphabet: definition
                .input_alphabet()
                .iter()
                .map(char::to_string)
                .collect(),
            tape_alphabet: definition
                .tape_alphabet()
                .iter()
                .map(char::to_string)
                .collect(),
            transitions: definition
                .transitions()
                .map(|(state, symbol, transition)| {
                    (
                        format!("{},{}", state, symbol),
                        TransitionConfig {
                            next_state: transition.next_state.clone(),
                            write_symbol: transition.write.to_string(),
                            move_direction: transition.direction,
                        },
                    )
                })
                .collect(),
            initial_state: definition.initial_state().to_string(),
            accept_state: definition.accept_state().to_string(),
            reject_state: definition.reject_state().to_string(),
            blank_symbol: definition.blank().to_string(),
            input_string: input.to_string(),
        }
    }
}

/// Splits a comma-separated field into trimmed, non-empty items.
///
/// `"q0, q1,,qAccept "` becomes `["q0", "q1", "qAccept"]`.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_symbol(text: &str) -> Result<char, MachineError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(MachineError::InvalidSymbol(text.to_string())),
    }
}

fn parse_symbols(symbols: &[String]) -> Result<Vec<char>, MachineError> {
    symbols.iter().map(|symbol| parse_symbol(symbol)).collect()
}

// State names never contain commas, so the first comma separates the two parts and the
// symbol itself may be a comma.
fn parse_key(key: &str) -> Result<(String, char), MachineError> {
    let (state, symbol) = key
        .split_once(',')
        .ok_or_else(|| MachineError::InvalidTransitionKey(key.to_string()))?;
    let symbol =
        parse_symbol(symbol).map_err(|_| MachineError::InvalidTransitionKey(key.to_string()))?;

    Ok((state.to_string(), symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVEN_BINARY: &str = r#"{
        "states": ["q0", "q1", "qAccept", "qReject"],
        "inputAlphabet": ["0", "1"],
        "tapeAlphabet": ["0", "1", "B"],
        "transitions": {
            "q0,0": { "nextState": "q0", "writeSymbol": "0", "moveDirection": "R" },
            "q0,1": { "nextState": "q0", "writeSymbol": "1", "moveDirection": "R" },
            "q0,B": { "nextState": "q1", "writeSymbol": "B", "moveDirection": "L" },
            "q1,0": { "nextState": "qAccept", "writeSymbol": "0", "moveDirection": "S" },
            "q1,1": { "nextState": "qReject", "writeSymbol": "1", "moveDirection": "S" }
        },
        "initialState": "q0",
        "acceptState": "qAccept",
        "rejectState": "qReject",
        "blankSymbol": "B",
        "inputString": "1010"
    }"#;

    #[test]
    fn test_parse_config() {
        let config = MachineConfig::from_json(EVEN_BINARY).unwrap();

        assert_eq!(config.states.len(), 4);
        assert_eq!(config.input_string, "1010");
        assert_eq!(config.transitions.len(), 5);
        assert_eq!(
            config.transitions["q0,B"].move_direction,
            Direction::Left
        );
    }

    #[test]
    fn test_config_to_definition() {
        let definition = MachineConfig::from_json(EVEN_BINARY)
            .unwrap()
            .to_definition()
            .unwrap();

        assert!(definition.warnings().is_empty());
        assert_eq!(definition.blank(), 'B');
        assert_eq!(
            definition.lookup("q1", '0'),
            Some(&Transition::new("qAccept", '0', Direction::Stay))
        );
    }

    #[test]
    fn test_definition_to_config_keeps_layout() {
        let config = MachineConfig::from_json(EVEN_BINARY).unwrap();
        let definition = config.to_definition().unwrap();

        let stored = MachineConfig::from_definition(&definition, "1010");
        assert_eq!(stored, config);

        let json: serde_json::Value = serde_json::from_str(&stored.to_json().unwrap()).unwrap();
        let fields: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for field in [
            "states",
            "inputAlphabet",
            "tapeAlphabet",
            "transitions",
            "initialState",
            "acceptState",
            "rejectState",
            "blankSymbol",
            "inputString",
        ] {
            assert!(fields.contains(&field), "missing field {}", field);
        }
        assert_eq!(json["transitions"]["q0,1"]["moveDirection"], "R");
    }

    #[test]
    fn test_missing_input_string_defaults_to_empty() {
        let text = r#"{
            "states": ["q0"], "inputAlphabet": [], "tapeAlphabet": ["B"],
            "transitions": {}, "initialState": "q0", "acceptState": "a",
            "rejectState": "r", "blankSymbol": "B"
        }"#;
        let config = MachineConfig::from_json(text).unwrap();

        assert_eq!(config.input_string, "");
        assert_eq!(config.to_definition().unwrap().states().len(), 3);
    }

    #[test]
    fn test_comma_symbol_key() {
        assert_eq!(parse_key("q0,,").unwrap(), ("q0".to_string(), ','));
        assert_eq!(parse_key("q0,1").unwrap(), ("q0".to_string(), '1'));
    }

    #[test]
    fn test_invalid_keys_and_symbols() {
        assert_eq!(
            parse_key("q0"),
            Err(MachineError::InvalidTransitionKey("q0".to_string()))
        );
        assert_eq!(
            parse_key("q0,ab"),
            Err(MachineError::InvalidTransitionKey("q0,ab".to_string()))
        );

        let mut config = MachineConfig::from_json(EVEN_BINARY).unwrap();
        config.blank_symbol = "".to_string();
        assert_eq!(
            config.to_definition(),
            Err(MachineError::InvalidSymbol("".to_string()))
        );
    }

    #[test]
    fn test_invalid_json() {
        let result = MachineConfig::from_json("{ not json");
        assert!(matches!(result, Err(MachineError::ParseError(_))));

        let result = MachineConfig::from_json(&EVEN_BINARY.replace("\"L\"", "\"Left\""));
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("q0, q1,,qAccept "),
            vec!["q0".to_string(), "q1".to_string(), "qAccept".to_string()]
        );
        assert!(parse_list(" , ").is_empty());
    }
}
