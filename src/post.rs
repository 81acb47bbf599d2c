//! This module defines the `PostMachine` struct, an interpreter for Post machine programs.
//!
//! A Post machine works on a tape of unmarked (`0`) and marked (`1`) cells. Control is a
//! line number; every line either moves the head, marks or erases the current cell, branches
//! on the current cell, or halts.

use crate::machine::Machine;
use crate::tape::Tape;
use crate::types::{
    Command, Direction, Halt, LogEntry, MachineError, PostProgram, Status, Step, POST_BLANK,
    POST_FIRST_LINE, POST_MARK,
};

/// Executes a `PostProgram` one numbered line at a time.
pub struct PostMachine {
    program: PostProgram,
    tape: Tape,
    line: usize,
    halt: Option<Halt>,
    step_count: usize,
    log: Vec<LogEntry>,
}

impl PostMachine {
    /// Creates a machine on a blank tape, ready to execute line 1.
    pub fn new(program: PostProgram) -> Self {
        Self {
            program,
            tape: Tape::new(POST_BLANK),
            line: POST_FIRST_LINE,
            halt: None,
            step_count: 0,
            log: Vec::new(),
        }
    }

    /// Creates a machine with its tape seeded from `input`.
    pub fn with_tape(program: PostProgram, input: &str) -> Result<Self, MachineError> {
        let mut machine = Self::new(program);
        machine.load_tape(input)?;
        Ok(machine)
    }

    /// Replaces the tape with one seeded from a string over `{0,1}`.
    ///
    /// The head is placed on position 0. Control state and the log are left untouched.
    pub fn load_tape(&mut self, input: &str) -> Result<(), MachineError> {
        if let Some((position, symbol)) = input
            .chars()
            .enumerate()
            .find(|(_, c)| *c != POST_BLANK && *c != POST_MARK)
        {
            return Err(MachineError::InvalidSymbol { symbol, position });
        }

        self.tape = Tape::with_content(input, POST_BLANK);
        Ok(())
    }

    /// Returns the line that will be executed next (or the line that halted the machine).
    pub fn current_line(&self) -> usize {
        self.line
    }

    /// Returns the tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn program(&self) -> &PostProgram {
        &self.program
    }

    fn halt_with(&mut self, reason: Halt, read: char, instruction: String) -> Step {
        log::info!(
            "Post machine halted at line {} after {} steps: {reason}",
            self.line,
            self.step_count
        );

        self.log.push(LogEntry {
            step: self.step_count,
            before: self.line.to_string(),
            read,
            instruction,
            after: self.line.to_string(),
            head: self.tape.head(),
            symbol: self.tape.symbol(),
            tape: self.tape.render(),
            origin: self.tape.bounds().0,
            halt: Some(reason),
        });
        self.halt = Some(reason);

        Step::Halt(reason)
    }
}

impl Machine for PostMachine {
    fn step(&mut self) -> Step {
        if self.halt.is_some() {
            return Step::Idle;
        }

        let read = self.tape.read();
        let (command, text) = match self.program.find(self.line) {
            Some(instruction) => (instruction.command, instruction.text.clone()),
            None => return self.halt_with(Halt::NoMatchingRule, read, String::new()),
        };

        let next = match command {
            Command::Halt => return self.halt_with(Halt::Deliberate, read, text),
            Command::Malformed => return self.halt_with(Halt::MalformedOperands, read, text),
            Command::MoveRight(next) => {
                self.tape.move_head(Direction::Right);
                next
            }
            Command::MoveLeft(next) => {
                self.tape.move_head(Direction::Left);
                next
            }
            Command::Write0(next) => {
                self.tape.write(POST_BLANK);
                next
            }
            Command::Write1(next) => {
                self.tape.write(POST_MARK);
                next
            }
            Command::Branch(zero, one) => {
                if read == POST_BLANK {
                    zero
                } else {
                    one
                }
            }
        };

        log::debug!(
            "Post step {}: line {} [{text}] -> line {next}, head {}",
            self.step_count,
            self.line,
            self.tape.head()
        );

        self.log.push(LogEntry {
            step: self.step_count,
            before: self.line.to_string(),
            read,
            instruction: text,
            after: next.to_string(),
            head: self.tape.head(),
            symbol: self.tape.symbol(),
            tape: self.tape.render(),
            origin: self.tape.bounds().0,
            halt: None,
        });
        self.line = next;
        self.step_count += 1;

        Step::Continue(next.to_string())
    }

    /// Restarts from line 1 with the head on the origin.
    ///
    /// Tape contents are kept; call `load_tape` to start from a fresh tape.
    fn reset(&mut self) {
        self.line = POST_FIRST_LINE;
        self.halt = None;
        self.step_count = 0;
        self.log.clear();
        self.tape.rewind();
    }

    fn halt_reason(&self) -> Option<Halt> {
        self.halt
    }

    fn step_count(&self) -> usize {
        self.step_count
    }

    fn status(&self) -> Status {
        Status {
            control: self.line.to_string(),
            head: self.tape.head(),
            symbol: self.tape.symbol(),
            halted: self.halt.is_some(),
            step_count: self.step_count,
            tape: self.tape.render(),
            origin: self.tape.bounds().0,
        }
    }

    fn log(&self) -> &[LogEntry] {
        &self.log
    }
}
