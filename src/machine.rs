//! This module defines the `Machine` trait, the surface both interpreters share: single
//! stepping, bounded runs, reset, and read-only status and log snapshots.

use crate::post::PostMachine;
use crate::turing::TuringMachine;
use crate::types::{Halt, LogEntry, MachineError, Program, Status, Step};

/// A tape automaton driven one instruction at a time.
///
/// Implementations are single threaded and never block. A halted machine stays halted until
/// `reset` is called.
pub trait Machine {
    /// Executes a single fetch-decode-execute step.
    ///
    /// # Returns
    ///
    /// * `Step::Continue(next)` if an instruction was executed; `next` is the new line or state.
    /// * `Step::Halt(_)` if the machine halted on this call. The step counter is not bumped.
    /// * `Step::Idle` if the machine was already halted.
    fn step(&mut self) -> Step;

    /// Restores the initial control value, clears the step counter and the log.
    fn reset(&mut self);

    /// Returns why the machine halted, or `None` while it is running.
    fn halt_reason(&self) -> Option<Halt>;

    /// Returns the total number of executed steps. Halting steps are not counted.
    fn step_count(&self) -> usize;

    /// Returns a snapshot of the machine and its rendered tape.
    fn status(&self) -> Status;

    /// Returns every log entry recorded since construction or the last reset.
    fn log(&self) -> &[LogEntry];

    /// Returns `true` once the machine has halted.
    fn is_halted(&self) -> bool {
        self.halt_reason().is_some()
    }

    /// Returns the log entry at `index`, if any.
    fn log_entry(&self, index: usize) -> Option<&LogEntry> {
        self.log().get(index)
    }

    /// Steps until the machine halts or `max_steps` steps have been executed.
    ///
    /// Never executes more than `max_steps` steps; a machine that reaches the ceiling stays
    /// running. Returns the number of steps actually executed.
    fn run(&mut self, max_steps: usize) -> usize {
        let mut executed = 0;
        while executed < max_steps {
            match self.step() {
                Step::Continue(_) => executed += 1,
                Step::Halt(_) | Step::Idle => break,
            }
        }

        if !self.is_halted() {
            log::debug!("Step ceiling of {max_steps} reached without halting");
        }

        executed
    }
}

impl Program {
    /// Builds a machine for this listing with its tape seeded from `input`.
    pub fn into_machine(self, input: &str) -> Result<Box<dyn Machine>, MachineError> {
        match self {
            Program::Post(program) => Ok(Box::new(PostMachine::with_tape(program, input)?)),
            Program::Turing(program) => Ok(Box::new(TuringMachine::with_tape(program, input))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_post, parse_turing};

    #[test]
    fn test_run_stops_at_ceiling() {
        let program = Program::Turing(parse_turing("0 1 0 1 S").unwrap());
        let mut machine = program.into_machine("1").unwrap();

        assert_eq!(machine.run(5), 5);
        assert!(!machine.is_halted());
        assert_eq!(machine.step_count(), 5);
    }

    #[test]
    fn test_run_does_not_take_pending_halt_step() {
        let program = Program::Post(parse_post("→ 2\n!").unwrap());
        let mut machine = program.into_machine("").unwrap();

        assert_eq!(machine.run(1), 1);
        assert!(!machine.is_halted());
        assert_eq!(machine.log().len(), 1);

        assert_eq!(machine.run(1), 0);
        assert!(machine.is_halted());
        assert_eq!(machine.halt_reason(), Some(Halt::Deliberate));
    }

    #[test]
    fn test_run_on_halted_machine_is_noop() {
        let program = Program::Post(parse_post("!").unwrap());
        let mut machine = program.into_machine("").unwrap();

        assert_eq!(machine.run(10), 0);
        assert_eq!(machine.step(), Step::Idle);
        assert_eq!(machine.run(10), 0);
        assert_eq!(machine.log().len(), 1);
    }

    #[test]
    fn test_log_entry_out_of_range() {
        let program = Program::Post(parse_post("!").unwrap());
        let machine = program.into_machine("").unwrap();

        assert!(machine.log_entry(0).is_none());
    }

    #[test]
    fn test_into_machine_rejects_bad_post_tape() {
        let program = Program::Post(parse_post("!").unwrap());
        assert!(matches!(
            program.into_machine("01a"),
            Err(MachineError::InvalidSymbol {
                symbol: 'a',
                position: 2
            })
        ));
    }
}
