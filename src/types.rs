//! This module defines the core data structures shared by the Post and Turing machine
//! interpreters: program listings, transitions, step outcomes, log entries, status snapshots
//! and the crate-level error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rule;

/// The blank symbol of the Post machine alphabet. Unwritten cells read as this.
pub const POST_BLANK: char = '0';
/// The only non-blank symbol of the Post machine alphabet.
pub const POST_MARK: char = '1';
/// The blank symbol used on Turing machine tapes and in Turing listings.
pub const TURING_BLANK: char = '_';
/// The state every Turing machine starts in.
pub const TURING_INITIAL_STATE: &str = "0";
/// The line every Post machine starts on.
pub const POST_FIRST_LINE: usize = 1;
/// The maximum allowed size for a program listing in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The default step ceiling used by drivers that do not pick their own.
pub const DEFAULT_MAX_STEPS: usize = 10000;

/// Represents the possible directions a tape head can move.
///
/// Post machines only ever use `Left` and `Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Parses a direction token of a Turing listing.
    ///
    /// Supports `<` or `L` for Left, `>` or `R` for Right, and `-`, `S` or `N` for Stay.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" | "L" => Some(Direction::Left),
            ">" | "R" => Some(Direction::Right),
            "-" | "S" | "N" => Some(Direction::Stay),
            _ => None,
        }
    }

    /// Returns the canonical single-letter form used when printing rules.
    pub fn as_char(&self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

/// A decoded Post machine command. Operands are 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the head one cell right, then jump.
    MoveRight(usize),
    /// Move the head one cell left, then jump.
    MoveLeft(usize),
    /// Erase the cell under the head, then jump.
    Write0(usize),
    /// Mark the cell under the head, then jump.
    Write1(usize),
    /// Jump to the first line if the cell reads blank, otherwise to the second.
    Branch(usize, usize),
    /// Stop the machine.
    Halt,
    /// Unknown opcode or a bad operand list. Executing it halts the machine.
    Malformed,
}

impl Command {
    /// Returns every line this command may jump to.
    pub fn targets(&self) -> Vec<usize> {
        match *self {
            Command::MoveRight(next)
            | Command::MoveLeft(next)
            | Command::Write0(next)
            | Command::Write1(next) => vec![next],
            Command::Branch(zero, one) => vec![zero, one],
            Command::Halt | Command::Malformed => Vec::new(),
        }
    }
}

/// One line of a Post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The 1-based position among the non-empty lines of the listing.
    pub line: usize,
    /// The command text with any `N.` label stripped.
    pub text: String,
    /// The decoded command.
    pub command: Command,
}

/// A Post machine program: an ordered list of numbered instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProgram {
    pub instructions: Vec<Instruction>,
}

impl PostProgram {
    /// Finds the instruction with the given line number.
    ///
    /// Line numbers may have gaps where the listing had blank lines, so a miss at the
    /// matching index falls back to a scan.
    pub fn find(&self, line: usize) -> Option<&Instruction> {
        line.checked_sub(1)
            .and_then(|index| self.instructions.get(index))
            .filter(|instruction| instruction.line == line)
            .or_else(|| {
                self.instructions
                    .iter()
                    .find(|instruction| instruction.line == line)
            })
    }

    /// Returns the number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// A single Turing machine rule: `state symbol next_state write direction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state this rule applies in.
    pub state: String,
    /// The symbol that must be under the head.
    pub read: char,
    /// The state the machine transitions to.
    pub next_state: String,
    /// The symbol written before moving.
    pub write: char,
    /// The direction the head moves after writing.
    pub direction: Direction,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.state,
            self.read,
            self.next_state,
            self.write,
            self.direction.as_char()
        )
    }
}

/// A Turing machine program: rules in listing order, plus the lines that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TuringProgram {
    pub transitions: Vec<Transition>,
    /// Lines that did not form a valid rule, with their 1-based line number in the listing.
    pub ignored: Vec<(usize, String)>,
}

impl TuringProgram {
    /// Returns the first rule matching `state` and `symbol`.
    ///
    /// Listing order breaks ties between duplicate rules.
    pub fn find(&self, state: &str, symbol: char) -> Option<&Transition> {
        self.transitions
            .iter()
            .find(|t| t.state == state && t.read == symbol)
    }

    /// Returns the number of rules, duplicates included.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if no line formed a valid rule.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Which of the two machines a listing is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineKind {
    Post,
    Turing,
}

impl std::fmt::Display for MachineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineKind::Post => write!(f, "post"),
            MachineKind::Turing => write!(f, "turing"),
        }
    }
}

/// A parsed listing for either machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    Post(PostProgram),
    Turing(TuringProgram),
}

impl Program {
    /// Returns the machine this listing runs on.
    pub fn kind(&self) -> MachineKind {
        match self {
            Program::Post(_) => MachineKind::Post,
            Program::Turing(_) => MachineKind::Turing,
        }
    }

    /// Number of instructions (Post) or rules (Turing).
    pub fn len(&self) -> usize {
        match self {
            Program::Post(program) => program.len(),
            Program::Turing(program) => program.len(),
        }
    }

    /// Returns `true` if the listing produced no instructions or rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Represents the outcome of a single `step()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// An instruction was executed and the machine keeps running. Carries the next control
    /// value: the line (Post) or state (Turing) the machine moved to.
    Continue(String),
    /// The machine halted on this call.
    Halt(Halt),
    /// The machine was already halted; nothing changed.
    Idle,
}

/// Why a machine stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Halt {
    /// The program asked to stop (Post `!`).
    Deliberate,
    /// No line or rule exists for the current control value.
    NoMatchingRule,
    /// The instruction had an unknown opcode or a bad operand list.
    MalformedOperands,
}

impl std::fmt::Display for Halt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Halt::Deliberate => write!(f, "halt instruction"),
            Halt::NoMatchingRule => write!(f, "no matching rule"),
            Halt::MalformedOperands => write!(f, "malformed instruction"),
        }
    }
}

/// An immutable record of one executed or halting step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The step counter before this step was taken.
    pub step: usize,
    /// Control value (line or state) before the step.
    pub before: String,
    /// Symbol read under the head before the step.
    pub read: char,
    /// The instruction or rule applied; empty when none was found.
    pub instruction: String,
    /// Control value after the step. Equal to `before` on a halting entry.
    pub after: String,
    /// Head position after the step.
    pub head: i64,
    /// Symbol under the head after the step.
    pub symbol: char,
    /// Tape snapshot after the step.
    pub tape: String,
    /// Tape position of the first character of `tape`.
    pub origin: i64,
    /// Set only on the entry that halted the machine.
    pub halt: Option<Halt>,
}

/// A read-only snapshot of a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// The current line (Post) or state (Turing).
    pub control: String,
    pub head: i64,
    pub symbol: char,
    pub halted: bool,
    pub step_count: usize,
    pub tape: String,
    /// Tape position of the first character of `tape`, so `head - origin` indexes into it.
    pub origin: i64,
}

/// Represents the errors callers can run into while building machines.
///
/// Execution itself never fails; problems at run time halt the machine instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Indicates a listing line the grammar could not tokenize.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a tape seed containing a symbol outside the machine's alphabet.
    #[error("Invalid tape symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    /// Indicates a listing or lookup that failed validation.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction(line: usize, command: Command) -> Instruction {
        Instruction {
            line,
            text: String::new(),
            command,
        }
    }

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        let stay_json = serde_json::to_string(&Direction::Stay).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(stay_json, "\"Stay\"");

        let left: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, Direction::Left);
    }

    #[test]
    fn test_direction_tokens() {
        assert_eq!(Direction::from_token("L"), Some(Direction::Left));
        assert_eq!(Direction::from_token(">"), Some(Direction::Right));
        assert_eq!(Direction::from_token("N"), Some(Direction::Stay));
        assert_eq!(Direction::from_token("up"), None);
    }

    #[test]
    fn test_post_find_by_line() {
        let program = PostProgram {
            instructions: vec![
                instruction(1, Command::MoveRight(2)),
                instruction(2, Command::Halt),
            ],
        };

        assert_eq!(program.find(2).map(|i| i.command), Some(Command::Halt));
        assert!(program.find(0).is_none());
        assert!(program.find(3).is_none());
    }

    #[test]
    fn test_post_find_across_gap() {
        let program = PostProgram {
            instructions: vec![
                instruction(1, Command::MoveRight(3)),
                instruction(3, Command::Halt),
            ],
        };

        assert_eq!(program.find(3).map(|i| i.command), Some(Command::Halt));
        assert_eq!(program.find(1).map(|i| i.line), Some(1));
        assert!(program.find(2).is_none());
    }

    #[test]
    fn test_turing_find_first_match_wins() {
        let rule = |next: &str| Transition {
            state: "0".into(),
            read: '1',
            next_state: next.into(),
            write: '1',
            direction: Direction::Stay,
        };
        let program = TuringProgram {
            transitions: vec![rule("a"), rule("b")],
            ignored: Vec::new(),
        };

        assert_eq!(program.find("0", '1').unwrap().next_state, "a");
        assert!(program.find("0", '0').is_none());
    }

    #[test]
    fn test_transition_display() {
        let transition = Transition {
            state: "q0".into(),
            read: '_',
            next_state: "q1".into(),
            write: '1',
            direction: Direction::Left,
        };

        assert_eq!(transition.to_string(), "q0 _ q1 1 L");
    }

    #[test]
    fn test_command_targets() {
        assert_eq!(Command::Branch(3, 4).targets(), vec![3, 4]);
        assert!(Command::Halt.targets().is_empty());
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::InvalidSymbol {
            symbol: 'x',
            position: 3,
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("'x'"));
        assert!(error_msg.contains("position 3"));
    }
}
