//! This crate provides interpreters for two abstract machines: a Post machine (a unary tape
//! automaton driven by numbered commands) and a Turing machine (a symbolic tape automaton
//! driven by a table of quintuples). Both run on the same sparse, unbounded tape, execute one
//! instruction per step, and record every step in an inspectable log.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod post;
pub mod programs;
pub mod tape;
pub mod turing;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Machine` trait from the machine module.
pub use machine::Machine;
/// Re-exports the listing parsers from the parser module.
pub use parser::{parse, parse_post, parse_post_lines, parse_turing, parse_turing_lines};
/// Re-exports the `PostMachine` struct from the post module.
pub use post::PostMachine;
/// Re-exports `BuiltinProgram`, `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{BuiltinProgram, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the `TuringMachine` struct from the turing module.
pub use turing::TuringMachine;
/// Re-exports the shared types from the types module.
pub use types::{
    Command, Direction, Halt, Instruction, LogEntry, MachineError, MachineKind, PostProgram,
    Program, Status, Step, Transition, TuringProgram, DEFAULT_MAX_STEPS, MAX_PROGRAM_SIZE,
};
