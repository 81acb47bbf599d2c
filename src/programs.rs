//! Built-in example listings, embedded at compile time.

use crate::parser::parse;
use crate::types::{MachineError, MachineKind, Program};

struct ProgramSource {
    name: &'static str,
    kind: MachineKind,
    tape: &'static str,
    text: &'static str,
}

// Default embedded programs
static PROGRAM_SOURCES: [ProgramSource; 5] = [
    ProgramSource {
        name: "Invert",
        kind: MachineKind::Turing,
        tape: "101",
        text: include_str!("../programs/invert.tur"),
    },
    ProgramSource {
        name: "Binary increment",
        kind: MachineKind::Turing,
        tape: "1011",
        text: include_str!("../programs/binary-increment.tur"),
    },
    ProgramSource {
        name: "Unary addition (Turing)",
        kind: MachineKind::Turing,
        tape: "11+111",
        text: include_str!("../programs/unary-addition.tur"),
    },
    ProgramSource {
        name: "Unary increment",
        kind: MachineKind::Post,
        tape: "111",
        text: include_str!("../programs/unary-increment.post"),
    },
    ProgramSource {
        name: "Unary addition (Post)",
        kind: MachineKind::Post,
        tape: "11011",
        text: include_str!("../programs/unary-addition.post"),
    },
];

/// A parsed built-in listing with its suggested input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinProgram {
    pub name: &'static str,
    pub tape: &'static str,
    pub text: &'static str,
    pub program: Program,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<BuiltinProgram> = PROGRAM_SOURCES
        .iter()
        .filter_map(|source| match parse(source.kind, source.text) {
            Ok(program) => Some(BuiltinProgram {
                name: source.name,
                tape: source.tape,
                text: source.text,
                program,
            }),
            Err(e) => {
                log::error!("Failed to parse built-in program '{}': {}", source.name, e);
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<&'static BuiltinProgram, MachineError> {
        PROGRAMS.get(index).ok_or_else(|| {
            MachineError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name. Matching ignores case.
    pub fn get_program_by_name(name: &str) -> Result<&'static BuiltinProgram, MachineError> {
        PROGRAMS
            .iter()
            .find(|builtin| builtin.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|builtin| builtin.name).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, MachineError> {
        let builtin = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: builtin.name.to_string(),
            kind: builtin.program.kind(),
            initial_tape: builtin.tape.to_string(),
            instruction_count: builtin.program.len(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, builtin)| builtin.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Get the original text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, MachineError> {
        Self::get_program_by_index(index).map(|builtin| builtin.text)
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub kind: MachineKind,
    pub initial_tape: String,
    /// Lines (Post) or rules (Turing).
    pub instruction_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Halt;
    use crate::DEFAULT_MAX_STEPS;

    fn run(name: &str) -> (String, Option<Halt>) {
        let builtin = ProgramManager::get_program_by_name(name).unwrap();
        let mut machine = builtin.program.clone().into_machine(builtin.tape).unwrap();
        machine.run(DEFAULT_MAX_STEPS);
        (machine.status().tape, machine.halt_reason())
    }

    #[test]
    fn test_all_programs_are_loaded() {
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_SOURCES.len());
    }

    #[test]
    fn test_all_programs_halt() {
        for name in ProgramManager::list_program_names() {
            let (_, halt) = run(name);
            assert!(halt.is_some(), "Program '{}' did not halt", name);
        }
    }

    #[test]
    fn test_program_results() {
        assert_eq!(run("Invert").0, "010");
        assert_eq!(run("Binary increment").0, "1100");
        assert_eq!(run("Unary addition (Turing)").0, "11111");
        assert_eq!(run("Unary increment"), ("1111".to_string(), Some(Halt::Deliberate)));
        assert_eq!(run("unary addition (post)").0, "111100");
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
    }

    #[test]
    fn test_program_manager_get_program_by_name() {
        let builtin = ProgramManager::get_program_by_name("Invert").unwrap();
        assert_eq!(builtin.tape, "101");
        assert_eq!(builtin.program.kind(), MachineKind::Turing);

        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(3).unwrap();

        assert_eq!(info.index, 3);
        assert_eq!(info.name, "Unary increment");
        assert_eq!(info.kind, MachineKind::Post);
        assert_eq!(info.instruction_count, 4);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_program_manager_search_programs() {
        assert_eq!(ProgramManager::search_programs("unary").len(), 3);
        assert_eq!(ProgramManager::search_programs("BINARY"), vec![1]);
        assert!(ProgramManager::search_programs("nonexistent").is_empty());
    }

    #[test]
    fn test_program_text_by_index() {
        let text = ProgramManager::get_program_text_by_index(0).unwrap();
        assert!(text.contains("0 _ 1 _ L"));
        assert!(ProgramManager::get_program_text_by_index(999).is_err());
    }
}
