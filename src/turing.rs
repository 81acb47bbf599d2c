//! This module defines the `TuringMachine` struct, which simulates a single-tape Turing
//! machine driven by a table of quintuple rules. It handles the machine's state, tape
//! operations, head movements, and the step log.

use crate::machine::Machine;
use crate::tape::Tape;
use crate::types::{
    Halt, LogEntry, Status, Step, Transition, TuringProgram, TURING_BLANK, TURING_INITIAL_STATE,
};

/// Represents a single-tape Turing machine.
///
/// The machine starts in state `"0"` with the head on position 0 and halts as soon as no
/// rule matches its state and the symbol under the head.
pub struct TuringMachine {
    state: String,
    tape: Tape,
    input: String,
    program: TuringProgram,
    halt: Option<Halt>,
    step_count: usize,
    log: Vec<LogEntry>,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` on a blank tape.
    pub fn new(program: TuringProgram) -> Self {
        Self::with_tape(program, "")
    }

    /// Creates a new `TuringMachine` with its tape seeded from `input`.
    ///
    /// # Arguments
    ///
    /// * `program` - The rules to execute.
    /// * `input` - Initial tape content, leftmost symbol at position 0. `_` is the blank.
    pub fn with_tape(program: TuringProgram, input: &str) -> Self {
        Self {
            state: TURING_INITIAL_STATE.to_string(),
            tape: Tape::with_content(input, TURING_BLANK),
            input: input.to_string(),
            program,
            halt: None,
            step_count: 0,
            log: Vec::new(),
        }
    }

    /// Replaces the tape and remembers `input` as the content `reset` restores.
    pub fn load_tape(&mut self, input: &str) {
        self.input = input.to_string();
        self.tape = Tape::with_content(input, TURING_BLANK);
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn program(&self) -> &TuringProgram {
        &self.program
    }

    /// Finds the rule for the current state and the symbol under the head.
    pub fn transition(&self) -> Option<&Transition> {
        self.program.find(&self.state, self.tape.symbol())
    }
}

impl Machine for TuringMachine {
    /// Executes a single step: write, move, then change state.
    fn step(&mut self) -> Step {
        if self.halt.is_some() {
            return Step::Idle;
        }

        let read = self.tape.read();
        let Some(transition) = self.program.find(&self.state, read).cloned() else {
            log::info!(
                "Turing machine halted in state {} after {} steps: no rule for {read:?}",
                self.state,
                self.step_count
            );

            self.log.push(LogEntry {
                step: self.step_count,
                before: self.state.clone(),
                read,
                instruction: String::new(),
                after: self.state.clone(),
                head: self.tape.head(),
                symbol: read,
                tape: self.tape.contents(),
                origin: self.tape.contents_origin(),
                halt: Some(Halt::NoMatchingRule),
            });
            self.halt = Some(Halt::NoMatchingRule);

            return Step::Halt(Halt::NoMatchingRule);
        };

        self.tape.write(transition.write);
        self.tape.move_head(transition.direction);

        log::debug!(
            "Turing step {}: [{transition}] head {}",
            self.step_count,
            self.tape.head()
        );

        self.log.push(LogEntry {
            step: self.step_count,
            before: std::mem::replace(&mut self.state, transition.next_state.clone()),
            read,
            instruction: transition.to_string(),
            after: transition.next_state,
            head: self.tape.head(),
            symbol: self.tape.symbol(),
            tape: self.tape.contents(),
            origin: self.tape.contents_origin(),
            halt: None,
        });
        self.step_count += 1;

        Step::Continue(self.state.clone())
    }

    /// Resets the state, the tape (from the last loaded input), the step count and the log.
    fn reset(&mut self) {
        self.state = TURING_INITIAL_STATE.to_string();
        self.tape = Tape::with_content(&self.input, TURING_BLANK);
        self.halt = None;
        self.step_count = 0;
        self.log.clear();
    }

    fn halt_reason(&self) -> Option<Halt> {
        self.halt
    }

    fn step_count(&self) -> usize {
        self.step_count
    }

    fn status(&self) -> Status {
        Status {
            control: self.state.clone(),
            head: self.tape.head(),
            symbol: self.tape.symbol(),
            halted: self.halt.is_some(),
            step_count: self.step_count,
            tape: self.tape.contents(),
            origin: self.tape.contents_origin(),
        }
    }

    fn log(&self) -> &[LogEntry] {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_turing, parse_turing_lines};

    const INVERT: &str = "
# flip every symbol walking right, walk back, stop on the left edge
0 0 0 1 R
0 1 0 0 R
0 _ 1 _ L
1 0 1 0 L
1 1 1 1 L
1 _ 2 _ R
";

    fn machine(listing: &str, tape: &str) -> TuringMachine {
        TuringMachine::with_tape(parse_turing(listing).unwrap(), tape)
    }

    #[test]
    fn test_turing_machine_creation() {
        let machine = machine(INVERT, "101");

        assert_eq!(machine.state(), "0");
        assert_eq!(machine.tape().head(), 0);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(machine.status().tape, "101");
        assert!(machine.transition().is_some());
    }

    #[test]
    fn test_single_step() {
        let program = parse_turing_lines(["0 1 1 0 R"]).unwrap();
        let mut machine = TuringMachine::with_tape(program, "1");

        assert_eq!(machine.step(), Step::Continue("1".into()));
        assert_eq!(machine.state(), "1");
        assert_eq!(machine.tape().get(0), '0');
        assert_eq!(machine.tape().head(), 1);

        let entry = &machine.log()[0];
        assert_eq!(entry.before, "0");
        assert_eq!(entry.after, "1");
        assert_eq!(entry.read, '1');
        assert_eq!(entry.instruction, "0 1 1 0 R");
        assert_eq!(entry.symbol, '_');
    }

    #[test]
    fn test_stay_rule_never_halts() {
        let mut machine = machine("0 1 0 1 S", "1");

        for _ in 0..5 {
            assert_eq!(machine.step(), Step::Continue("0".into()));
            assert_eq!(machine.tape().head(), 0);
        }
        assert_eq!(machine.step_count(), 5);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_run_stay_rule_to_ceiling() {
        let mut machine = machine("0 1 0 1 S", "1");

        assert_eq!(machine.run(5), 5);
        assert!(!machine.is_halted());
        assert_eq!(machine.tape().head(), 0);
        assert!(machine.log().iter().all(|entry| entry.head == 0));
    }

    #[test]
    fn test_invert_program() {
        let mut machine = machine(INVERT, "101");

        let executed = machine.run(1000);

        assert!(machine.is_halted());
        assert_eq!(machine.halt_reason(), Some(Halt::NoMatchingRule));
        assert_eq!(machine.status().tape, "010");
        assert_eq!(machine.state(), "2");
        assert_eq!(executed, 8);
        assert_eq!(machine.tape().head(), 0);
        assert_eq!(machine.tape().render(), "_010_");
        assert_eq!(machine.status().origin, 0);
    }

    #[test]
    fn test_status_origin_locates_tape_text() {
        let mut erased = machine("0 1 1 _ R", "11");
        erased.run(10);

        let status = erased.status();
        assert_eq!(status.tape, "1");
        assert_eq!(status.origin, 1);
        assert_eq!(status.head, 1);

        let mut grown = machine("0 a 1 a L\n1 _ 2 y S", "a");
        grown.run(10);

        let status = grown.status();
        assert_eq!(status.tape, "ya");
        assert_eq!(status.origin, -1);
        assert_eq!(status.head, -1);
        assert_eq!(grown.log()[0].origin, 0);
        assert_eq!(grown.log()[1].origin, -1);
    }

    #[test]
    fn test_halt_entry() {
        let mut machine = machine("0 1 1 0 R", "1");
        machine.step();

        assert_eq!(machine.step(), Step::Halt(Halt::NoMatchingRule));
        assert_eq!(machine.step_count(), 1);

        let entry = machine.log().last().unwrap();
        assert_eq!(entry.step, 1);
        assert_eq!(entry.before, "1");
        assert_eq!(entry.after, "1");
        assert_eq!(entry.halt, Some(Halt::NoMatchingRule));
        assert_eq!(machine.step(), Step::Idle);
    }

    #[test]
    fn test_duplicate_rules_first_wins() {
        let mut machine = machine("0 _ a x S\n0 _ b y S", "");
        machine.step();

        assert_eq!(machine.state(), "a");
        assert_eq!(machine.tape().symbol(), 'x');
    }

    #[test]
    fn test_write_blank_erases_cell() {
        let mut machine = machine("0 1 0 _ R", "11");
        machine.run(10);

        assert_eq!(machine.tape().stored(), 0);
        assert_eq!(machine.status().tape, "");
    }

    #[test]
    fn test_reset_restores_input() {
        let mut machine = machine(INVERT, "101");
        machine.run(1000);

        machine.reset();

        assert_eq!(machine.state(), "0");
        assert_eq!(machine.step_count(), 0);
        assert!(machine.log().is_empty());
        assert!(!machine.is_halted());
        assert_eq!(machine.status().tape, "101");
        assert_eq!(machine.tape().head(), 0);
    }

    #[test]
    fn test_load_tape_becomes_reset_target() {
        let mut machine = machine(INVERT, "1");
        machine.load_tape("0_0");
        machine.run(1000);
        assert_eq!(machine.status().tape, "1_0");

        machine.reset();
        assert_eq!(machine.status().tape, "0_0");
    }
}
