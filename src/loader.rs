//! This module provides the `ProgramLoader` struct, responsible for loading Post and Turing
//! listings from files, directories and strings.

use crate::parser::parse;
use crate::types::{MachineError, MachineKind, Program, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of Post listings.
pub const POST_EXTENSION: &str = "post";
/// File extension of Turing listings.
pub const TURING_EXTENSION: &str = "tur";

/// `ProgramLoader` is a utility struct for loading program listings.
///
/// The machine kind of a file is taken from its extension: `.post` or `.tur`.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Returns the machine kind a path's extension stands for.
    pub fn kind_of(path: &Path) -> Option<MachineKind> {
        match path.extension()?.to_str()? {
            POST_EXTENSION => Some(MachineKind::Post),
            TURING_EXTENSION => Some(MachineKind::Turing),
            _ => None,
        }
    }

    /// Loads a single listing from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is read and tokenized.
    /// * `Err(MachineError::FileError)` if the file cannot be read or has an unknown extension.
    /// * `Err(MachineError::ValidationError)` if the file exceeds `MAX_PROGRAM_SIZE`.
    pub fn load_program(path: &Path) -> Result<Program, MachineError> {
        let kind = Self::kind_of(path).ok_or_else(|| {
            MachineError::FileError(format!(
                "Unknown program type for {} (expected .{} or .{})",
                path.display(),
                POST_EXTENSION,
                TURING_EXTENSION
            ))
        })?;

        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        log::debug!("Loading {kind} program from {}", path.display());
        Self::load_program_from_string(kind, &content)
    }

    /// Loads a single listing from the provided string content.
    pub fn load_program_from_string(
        kind: MachineKind,
        content: &str,
    ) -> Result<Program, MachineError> {
        if content.len() > MAX_PROGRAM_SIZE {
            return Err(MachineError::ValidationError(format!(
                "Program is {} bytes, the limit is {} bytes",
                content.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        parse(kind, content)
    }

    /// Loads every `.post` and `.tur` file in a directory.
    ///
    /// Directories and files with other extensions are skipped. Each element of the result
    /// is either the loaded program with its path or the error that file produced.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                if path.is_dir() || Self::kind_of(&path).is_none() {
                    return None;
                }

                Some(Self::load_program(&path).map(|program| (path, program)))
            })
            .collect()
    }
}
