//! This module defines `MachineDefinition`, the immutable description of a deterministic
//! single-tape Turing Machine: its states, alphabets, blank symbol and partial transition
//! function.
//!
//! Construction is tolerant. Identifiers that are referenced but not declared are added to
//! the corresponding set instead of being rejected, and every such repair is recorded as a
//! [`Warning`] so callers can surface it.

use crate::types::{Direction, Transition, DEFAULT_BLANK_SYMBOL};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use tracing::warn;

/// The role a designated state plays in a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRole {
    Initial,
    Accept,
    Reject,
}

impl fmt::Display for StateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StateRole::Initial => "Initial",
            StateRole::Accept => "Accept",
            StateRole::Reject => "Reject",
        })
    }
}

/// A consistency problem found while normalizing a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A designated state was missing from the state set and has been added.
    StateAdded { role: StateRole, state: String },
    /// The blank symbol was missing from the tape alphabet and has been added.
    BlankAdded(char),
    /// An input symbol was missing from the tape alphabet and has been added.
    InputSymbolAdded(char),
    /// The accept and reject states are the same. Acceptance wins when it is entered.
    AcceptIsReject(String),
    /// The blank symbol is also part of the input alphabet.
    BlankInInputAlphabet(char),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::StateAdded { role, state } => {
                write!(f, "{} state {} not in states list. Adding it.", role, state)
            }
            Warning::BlankAdded(symbol) => {
                write!(f, "Blank symbol {} not in tape alphabet. Adding it.", symbol)
            }
            Warning::InputSymbolAdded(symbol) => {
                write!(f, "Input symbol {} not in tape alphabet. Adding it.", symbol)
            }
            Warning::AcceptIsReject(state) => {
                write!(f, "Accept and reject states are both {}.", state)
            }
            Warning::BlankInInputAlphabet(symbol) => {
                write!(f, "Blank symbol {} is part of the input alphabet.", symbol)
            }
        }
    }
}

/// An immutable, normalized Turing Machine description.
///
/// Transitions are keyed by state first and read symbol second, so a lookup never needs to
/// build a composite key.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineDefinition {
    states: IndexSet<String>,
    input_alphabet: IndexSet<char>,
    tape_alphabet: IndexSet<char>,
    transitions: IndexMap<String, IndexMap<char, Transition>>,
    initial_state: String,
    accept_state: String,
    reject_state: String,
    blank: char,
    warnings: Vec<Warning>,
}

impl MachineDefinition {
    /// Creates a normalized definition.
    ///
    /// Never fails: designated states missing from `states` are appended to it, and the blank
    /// symbol and input symbols missing from `tape_alphabet` are appended to that. Each repair
    /// is logged and kept in [`MachineDefinition::warnings`].
    #[allow(clippy::too_many_arguments)]
    pub fn new<S, T>(
        states: impl IntoIterator<Item = S>,
        input_alphabet: impl IntoIterator<Item = char>,
        tape_alphabet: impl IntoIterator<Item = char>,
        transitions: impl IntoIterator<Item = ((T, char), Transition)>,
        initial_state: impl Into<String>,
        accept_state: impl Into<String>,
        reject_state: impl Into<String>,
        blank: char,
    ) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        let mut table: IndexMap<String, IndexMap<char, Transition>> = IndexMap::new();
        for ((state, symbol), transition) in transitions {
            table
                .entry(state.into())
                .or_default()
                .insert(symbol, transition);
        }

        let mut definition = Self {
            states: states.into_iter().map(Into::into).collect(),
            input_alphabet: input_alphabet.into_iter().collect(),
            tape_alphabet: tape_alphabet.into_iter().collect(),
            transitions: table,
            initial_state: initial_state.into(),
            accept_state: accept_state.into(),
            reject_state: reject_state.into(),
            blank,
            warnings: Vec::new(),
        };
        definition.normalize();
        definition
    }

    /// Starts a [`DefinitionBuilder`] with empty sets, no transitions and the default blank.
    pub fn builder() -> DefinitionBuilder {
        DefinitionBuilder::default()
    }

    fn normalize(&mut self) {
        let designated = [
            (StateRole::Initial, self.initial_state.clone()),
            (StateRole::Accept, self.accept_state.clone()),
            (StateRole::Reject, self.reject_state.clone()),
        ];
        for (role, state) in designated {
            if self.states.insert(state.clone()) {
                self.warnings.push(Warning::StateAdded { role, state });
            }
        }

        if self.tape_alphabet.insert(self.blank) {
            self.warnings.push(Warning::BlankAdded(self.blank));
        }

        for &symbol in &self.input_alphabet {
            if self.tape_alphabet.insert(symbol) {
                self.warnings.push(Warning::InputSymbolAdded(symbol));
            }
        }

        if self.accept_state == self.reject_state {
            self.warnings
                .push(Warning::AcceptIsReject(self.accept_state.clone()));
        }

        if self.input_alphabet.contains(&self.blank) {
            self.warnings.push(Warning::BlankInInputAlphabet(self.blank));
        }

        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }

    /// Returns the rule for `(state, symbol)`, or `None` if the pair has no rule.
    pub fn lookup(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.transitions.get(state)?.get(&symbol)
    }

    /// Iterates over all rules as `(state, symbol, rule)` in insertion order.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, char, &Transition)> {
        self.transitions.iter().flat_map(|(state, rules)| {
            rules
                .iter()
                .map(move |(&symbol, transition)| (state.as_str(), symbol, transition))
        })
    }

    /// Returns the total number of rules.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(IndexMap::len).sum()
    }

    pub fn states(&self) -> &IndexSet<String> {
        &self.states
    }

    pub fn input_alphabet(&self) -> &IndexSet<char> {
        &self.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &IndexSet<char> {
        &self.tape_alphabet
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn accept_state(&self) -> &str {
        &self.accept_state
    }

    pub fn reject_state(&self) -> &str {
        &self.reject_state
    }

    /// Returns the blank symbol used by this machine.
    pub fn blank(&self) -> char {
        self.blank
    }

    pub fn is_accept(&self, state: &str) -> bool {
        self.accept_state == state
    }

    pub fn is_reject(&self, state: &str) -> bool {
        self.reject_state == state
    }

    /// Returns the repairs and convention violations found during construction.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// Incremental construction of a [`MachineDefinition`].
///
/// ```
/// use tmsim::{Direction, MachineDefinition};
///
/// let definition = MachineDefinition::builder()
///     .states(["q0", "qAccept", "qReject"])
///     .input_alphabet(['0', '1'])
///     .rule("q0", '0', "qAccept", '0', Direction::Right)
///     .initial_state("q0")
///     .accept_state("qAccept")
///     .reject_state("qReject")
///     .build();
///
/// assert!(definition.lookup("q0", '0').is_some());
/// assert!(definition.lookup("q0", '1').is_none());
/// ```
#[derive(Debug, Clone)]
pub struct DefinitionBuilder {
    states: Vec<String>,
    input_alphabet: Vec<char>,
    tape_alphabet: Vec<char>,
    transitions: Vec<((String, char), Transition)>,
    initial_state: String,
    accept_state: String,
    reject_state: String,
    blank: char,
}

impl Default for DefinitionBuilder {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            input_alphabet: Vec::new(),
            tape_alphabet: Vec::new(),
            transitions: Vec::new(),
            initial_state: String::new(),
            accept_state: String::new(),
            reject_state: String::new(),
            blank: DEFAULT_BLANK_SYMBOL,
        }
    }
}

impl DefinitionBuilder {
    pub fn states<S: Into<String>>(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn input_alphabet(mut self, symbols: impl IntoIterator<Item = char>) -> Self {
        self.input_alphabet.extend(symbols);
        self
    }

    pub fn tape_alphabet(mut self, symbols: impl IntoIterator<Item = char>) -> Self {
        self.tape_alphabet.extend(symbols);
        self
    }

    /// Adds the rule `(state, read) -> (next_state, write, direction)`.
    ///
    /// A later rule for the same pair replaces an earlier one.
    pub fn rule(
        mut self,
        state: impl Into<String>,
        read: char,
        next_state: impl Into<String>,
        write: char,
        direction: Direction,
    ) -> Self {
        self.transitions.push((
            (state.into(), read),
            Transition::new(next_state, write, direction),
        ));
        self
    }

    pub fn initial_state(mut self, state: impl Into<String>) -> Self {
        self.initial_state = state.into();
        self
    }

    pub fn accept_state(mut self, state: impl Into<String>) -> Self {
        self.accept_state = state.into();
        self
    }

    pub fn reject_state(mut self, state: impl Into<String>) -> Self {
        self.reject_state = state.into();
        self
    }

    pub fn blank(mut self, blank: char) -> Self {
        self.blank = blank;
        self
    }

    pub fn build(self) -> MachineDefinition {
        MachineDefinition::new(
            self.states,
            self.input_alphabet,
            self.tape_alphabet,
            self.transitions,
            self.initial_state,
            self.accept_state,
            self.reject_state,
            self.blank,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn even_binary() -> MachineDefinition {
        MachineDefinition::builder()
            .states(["q0", "q1", "qAccept", "qReject"])
            .input_alphabet(['0', '1'])
            .tape_alphabet(['0', '1', 'B'])
            .rule("q0", '0', "q0", '0', Direction::Right)
            .rule("q0", '1', "q0", '1', Direction::Right)
            .rule("q0", 'B', "q1", 'B', Direction::Left)
            .rule("q1", '0', "qAccept", '0', Direction::Stay)
            .rule("q1", '1', "qReject", '1', Direction::Stay)
            .initial_state("q0")
            .accept_state("qAccept")
            .reject_state("qReject")
            .build()
    }

    #[test]
    fn test_consistent_definition_has_no_warnings() {
        let definition = even_binary();

        assert!(definition.warnings().is_empty());
        assert_eq!(definition.states().len(), 4);
        assert_eq!(definition.tape_alphabet().len(), 3);
        assert_eq!(definition.transition_count(), 5);
        assert_eq!(definition.blank(), 'B');
    }

    #[test]
    fn test_lookup_is_exact() {
        let definition = even_binary();

        let transition = definition.lookup("q0", '1').unwrap();
        assert_eq!(transition.next_state, "q0");
        assert_eq!(transition.direction, Direction::Right);

        assert!(definition.lookup("q1", 'B').is_none());
        assert!(definition.lookup("qAccept", '0').is_none());
        assert!(definition.lookup("missing", '0').is_none());
    }

    #[test]
    fn test_missing_states_are_added() {
        let definition = MachineDefinition::builder()
            .states(["q0"])
            .tape_alphabet(['B'])
            .initial_state("start")
            .accept_state("yes")
            .reject_state("no")
            .build();

        let states: Vec<&str> = definition.states().iter().map(String::as_str).collect();
        assert_eq!(states, vec!["q0", "start", "yes", "no"]);
        assert_eq!(
            definition.warnings()[0],
            Warning::StateAdded {
                role: StateRole::Initial,
                state: "start".to_string()
            }
        );
        assert_eq!(definition.warnings().len(), 3);
    }

    #[test]
    fn test_missing_symbols_are_added() {
        let definition = MachineDefinition::builder()
            .states(["q0", "qA", "qR"])
            .input_alphabet(['a', 'b'])
            .tape_alphabet(['a'])
            .blank('_')
            .initial_state("q0")
            .accept_state("qA")
            .reject_state("qR")
            .build();

        let symbols: Vec<char> = definition.tape_alphabet().iter().copied().collect();
        assert_eq!(symbols, vec!['a', '_', 'b']);
        assert_eq!(
            definition.warnings(),
            &[Warning::BlankAdded('_'), Warning::InputSymbolAdded('b')]
        );
    }

    #[test]
    fn test_convention_violations_are_reported() {
        let definition = MachineDefinition::builder()
            .states(["q0", "done"])
            .input_alphabet(['0', 'B'])
            .tape_alphabet(['0', 'B'])
            .initial_state("q0")
            .accept_state("done")
            .reject_state("done")
            .build();

        assert_eq!(
            definition.warnings(),
            &[
                Warning::AcceptIsReject("done".to_string()),
                Warning::BlankInInputAlphabet('B')
            ]
        );
    }

    #[test]
    fn test_later_rule_replaces_earlier_one() {
        let definition = MachineDefinition::builder()
            .rule("q0", '0', "q1", 'X', Direction::Right)
            .rule("q0", '0', "q2", 'Y', Direction::Left)
            .initial_state("q0")
            .accept_state("q2")
            .reject_state("q3")
            .build();

        assert_eq!(definition.transition_count(), 1);
        assert_eq!(
            definition.lookup("q0", '0'),
            Some(&Transition::new("q2", 'Y', Direction::Left))
        );
    }

    #[test]
    fn test_transitions_iterate_in_insertion_order() {
        let definition = even_binary();
        let keys: Vec<(&str, char)> = definition
            .transitions()
            .map(|(state, symbol, _)| (state, symbol))
            .collect();

        assert_eq!(
            keys,
            vec![("q0", '0'), ("q0", '1'), ("q0", 'B'), ("q1", '0'), ("q1", '1')]
        );
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::StateAdded {
            role: StateRole::Accept,
            state: "qAccept".to_string(),
        };

        assert_eq!(
            warning.to_string(),
            "Accept state qAccept not in states list. Adding it."
        );
    }
}
