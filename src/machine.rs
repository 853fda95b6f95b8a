//! This module defines the `TuringMachine` struct, the execution engine of a deterministic
//! single-tape Turing Machine. It owns the mutable run state (tape, head, current state, step
//! counter and history) and drives it either one step at a time or through a timed run.

use crate::definition::MachineDefinition;
use crate::history::{History, HistoryEntry};
use crate::tape::Tape;
use crate::types::{Direction, Halt, Status, Step, Transition};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Cooperative cancellation for [`TuringMachine::run`].
///
/// The handle is checked before every scheduled step; a step that already started always
/// completes. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct RunHandle {
    paused: Arc<AtomicBool>,
}

impl RunHandle {
    /// Asks the run to stop before its next step. The machine ends up `Paused`.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Same as [`RunHandle::pause`]; a cancelled run can be resumed by calling `run` again.
    pub fn cancel(&self) {
        self.pause();
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn arm(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }
}

/// A read-only copy of everything a renderer needs after a call into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tape: Vec<char>,
    pub head_position: usize,
    /// The tape including its padding cells.
    pub buffer: Vec<char>,
    /// The head position within `buffer`.
    pub buffer_head: usize,
    pub current_state: String,
    pub step_count: usize,
    pub history: Vec<HistoryEntry>,
    pub status: Status,
}

/// A deterministic single-tape Turing Machine bound to an input string.
///
/// Status moves through `Ready`, `Running` and `Paused` until the machine enters its accept
/// or reject state, after which `step` and `run` are no-ops until the next reset.
#[derive(Debug)]
pub struct TuringMachine {
    definition: MachineDefinition,
    input: String,
    tape: Tape,
    state: String,
    status: Status,
    step_count: usize,
    history: History,
    control: RunHandle,
}

impl TuringMachine {
    /// Creates a machine for `definition`, reset onto `input`.
    pub fn new(definition: MachineDefinition, input: impl Into<String>) -> Self {
        let input = input.into();
        let tape = Tape::new(&input, definition.blank());

        Self {
            state: definition.initial_state().to_string(),
            definition,
            input,
            tape,
            status: Status::Ready,
            step_count: 0,
            history: History::new(),
            control: RunHandle::default(),
        }
    }

    /// Replaces the definition and input, and returns the machine to its initial
    /// configuration.
    pub fn reset(&mut self, definition: MachineDefinition, input: impl Into<String>) {
        self.definition = definition;
        self.input = input.into();
        self.restart();
    }

    /// Replaces the input only, and returns the machine to its initial configuration.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        self.restart();
    }

    /// Resets the Turing Machine to its initial configuration with the current definition
    /// and input. This includes resetting the state, tape, head position, step count and
    /// history. A pending run is cancelled.
    pub fn restart(&mut self) {
        self.control.pause();
        self.control = RunHandle::default();
        self.tape = Tape::new(&self.input, self.definition.blank());
        self.state = self.definition.initial_state().to_string();
        self.status = Status::Ready;
        self.step_count = 0;
        self.history = History::new();

        info!(
            state = %self.state,
            input = %self.input,
            "machine reset"
        );
    }

    /// Executes a single step of the machine's computation.
    ///
    /// A rule for the current `(state, symbol)` pair is applied in full: write, state change,
    /// head move. If there is no rule, the machine moves to its reject state without touching
    /// the tape and the history entry is flagged as an error. Once halted, further calls
    /// change nothing and report the same outcome.
    ///
    /// A machine sitting in its accept or reject state is halted even if no step has been
    /// taken yet, as when the initial state is also the accept state. Such a call settles
    /// the status and records nothing.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = self.halt() {
            return Step::Halt(halt);
        }

        if let Some(halt) = self.terminal_state() {
            self.status = halt.into();
            info!(state = %self.state, status = %self.status, "machine starts in a halting state");
            return Step::Halt(halt);
        }

        let symbol = self.tape.read();
        let head_position = self.tape.head();
        let from_state = self.state.clone();

        let entry = match self.definition.lookup(&from_state, symbol).cloned() {
            Some(transition) => {
                self.tape.write(transition.write);
                self.tape.shift(transition.direction);
                self.state = transition.next_state.clone();

                HistoryEntry {
                    step_number: self.step_count + 1,
                    from_state,
                    to_state: transition.next_state,
                    read_symbol: symbol,
                    write_symbol: transition.write,
                    move_direction: transition.direction,
                    head_position,
                    is_error: false,
                }
            }
            None => {
                debug!(state = %from_state, %symbol, "no transition found");
                self.state = self.definition.reject_state().to_string();

                HistoryEntry {
                    step_number: self.step_count + 1,
                    from_state,
                    to_state: self.state.clone(),
                    read_symbol: symbol,
                    write_symbol: symbol,
                    move_direction: Direction::Stay,
                    head_position,
                    is_error: true,
                }
            }
        };

        debug!(step = entry.step_number, "{}", entry);
        self.history.push(entry);
        self.step_count += 1;

        if let Some(halt) = self.terminal_state() {
            self.status = halt.into();
        }

        match self.halt() {
            Some(halt) => {
                info!(steps = self.step_count, status = %self.status, "machine halted");
                Step::Halt(halt)
            }
            None => Step::Continue,
        }
    }

    /// Marks the machine as running without stepping it, for callers that schedule steps
    /// themselves. No-op once halted.
    pub fn start(&mut self) {
        if !self.status.is_halted() {
            self.status = Status::Running;
        }
    }

    /// Pauses a running machine. No-op in any other status.
    pub fn pause(&mut self) {
        self.control.pause();
        if self.status == Status::Running {
            self.status = Status::Paused;
        }
    }

    /// Returns a handle that pauses [`TuringMachine::run`] from another task.
    pub fn handle(&self) -> RunHandle {
        self.control.clone()
    }

    /// Runs the machine continuously, waiting `interval` after each step before scheduling
    /// the next one.
    ///
    /// Returns when the machine halts or when a [`RunHandle`] pause is observed before the
    /// next step, with the resulting status. There is no step limit: a machine that never
    /// halts runs until paused. Dropping the returned future cancels the pending step and
    /// leaves the status `Running`; call [`TuringMachine::pause`] afterwards if needed.
    pub async fn run(&mut self, interval: Duration) -> Status {
        if self.status.is_halted() {
            return self.status;
        }

        self.control.arm();
        self.status = Status::Running;
        info!(?interval, "run started");

        loop {
            if self.control.is_paused() {
                self.status = Status::Paused;
                info!(steps = self.step_count, "run paused");
                break;
            }

            if let Step::Halt(_) = self.step() {
                break;
            }

            tokio::time::sleep(interval).await;
        }

        self.status
    }

    /// Steps the machine until it halts or `limit` steps have been taken, returning the
    /// last outcome.
    pub fn run_steps(&mut self, limit: usize) -> Step {
        let mut outcome = match self.halt() {
            Some(halt) => return Step::Halt(halt),
            None => Step::Continue,
        };

        for _ in 0..limit {
            outcome = self.step();
            if let Step::Halt(_) = outcome {
                break;
            }
        }

        outcome
    }

    fn halt(&self) -> Option<Halt> {
        match self.status {
            Status::Accepted => Some(Halt::Accept),
            Status::Rejected => Some(Halt::Reject),
            _ => None,
        }
    }

    // Acceptance is checked first when accept and reject name the same state.
    fn terminal_state(&self) -> Option<Halt> {
        if self.definition.is_accept(&self.state) {
            Some(Halt::Accept)
        } else if self.definition.is_reject(&self.state) {
            Some(Halt::Reject)
        } else {
            None
        }
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Checks if the machine reached its accept or reject state.
    pub fn is_halted(&self) -> bool {
        self.status.is_halted()
    }

    /// Returns the total number of steps executed since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn head_position(&self) -> usize {
        self.tape.head()
    }

    /// Returns the symbol under the head.
    pub fn current_symbol(&self) -> char {
        self.tape.read()
    }

    /// Returns the rule the next step would apply, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.definition.lookup(&self.state, self.tape.read())
    }

    pub fn definition(&self) -> &MachineDefinition {
        &self.definition
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tape: self.tape.symbols(),
            head_position: self.tape.head(),
            buffer: self.tape.buffer(),
            buffer_head: self.tape.buffer_head(),
            current_state: self.state.clone(),
            step_count: self.step_count,
            history: self.history.as_slice().to_vec(),
            status: self.status,
        }
    }
}
