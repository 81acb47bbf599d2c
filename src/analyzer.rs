//! This module provides static checks over parsed listings. Nothing reported here stops a
//! program from running; the checks point at lines that will halt the machine or can never
//! execute.

use crate::types::{
    Command, PostProgram, Program, TuringProgram, POST_FIRST_LINE, TURING_INITIAL_STATE,
};
use std::collections::{BTreeSet, HashSet, VecDeque};
use thiserror::Error;

/// Represents the problems that can be found in a listing.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum AnalysisError {
    /// A Post line jumps to a line that does not exist.
    #[error("Line {line} jumps to missing line {target}")]
    UndefinedTarget { line: usize, target: usize },
    /// A Post line has an unknown opcode or a bad operand list.
    #[error("Line {line} is malformed: {text:?}")]
    MalformedInstruction { line: usize, text: String },
    /// Post lines that cannot be reached from line 1.
    #[error("Unreachable lines: {0:?}")]
    UnreachableLines(Vec<usize>),
    /// The Post listing has no halt instruction.
    #[error("No halt instruction")]
    MissingHalt,
    /// A Turing line that was skipped because it is not a valid rule.
    #[error("Line {line} is not a rule and was ignored: {text:?}")]
    IgnoredLine { line: usize, text: String },
    /// A Turing rule that can never fire because an earlier rule has the same state and symbol.
    #[error("Rule {rule} is shadowed by an earlier rule for state {state} and symbol {symbol:?}")]
    ShadowedTransition {
        rule: usize,
        state: String,
        symbol: char,
    },
    /// No Turing rule starts from the initial state.
    #[error("No rule for initial state {0}")]
    InvalidStartState(String),
    /// Turing states that have rules but cannot be reached from the initial state.
    #[error("Unreachable states detected: {0:?}")]
    UnreachableStates(Vec<String>),
}

/// Analyzes a listing and returns every problem found, in listing order per check.
pub fn analyze(program: &Program) -> Vec<AnalysisError> {
    let problems = match program {
        Program::Post(program) => analyze_post(program),
        Program::Turing(program) => analyze_turing(program),
    };

    for problem in &problems {
        log::debug!("Analysis: {problem}");
    }

    problems
}

pub fn analyze_post(program: &PostProgram) -> Vec<AnalysisError> {
    let mut problems = Vec::new();

    for instruction in &program.instructions {
        if instruction.command == Command::Malformed {
            problems.push(AnalysisError::MalformedInstruction {
                line: instruction.line,
                text: instruction.text.clone(),
            });
        }

        for target in instruction.command.targets() {
            if program.find(target).is_none() {
                problems.push(AnalysisError::UndefinedTarget {
                    line: instruction.line,
                    target,
                });
            }
        }
    }

    let reachable = reachable(POST_FIRST_LINE, |line| {
        program
            .find(*line)
            .map(|instruction| instruction.command.targets())
            .unwrap_or_default()
    });

    let unreachable: Vec<usize> = program
        .instructions
        .iter()
        .map(|instruction| instruction.line)
        .filter(|line| !reachable.contains(line))
        .collect();

    if !unreachable.is_empty() {
        problems.push(AnalysisError::UnreachableLines(unreachable));
    }

    if !program
        .instructions
        .iter()
        .any(|instruction| instruction.command == Command::Halt)
    {
        problems.push(AnalysisError::MissingHalt);
    }

    problems
}

pub fn analyze_turing(program: &TuringProgram) -> Vec<AnalysisError> {
    let mut problems: Vec<AnalysisError> = program
        .ignored
        .iter()
        .map(|(line, text)| AnalysisError::IgnoredLine {
            line: *line,
            text: text.clone(),
        })
        .collect();

    let mut seen = HashSet::new();
    for (index, transition) in program.transitions.iter().enumerate() {
        if !seen.insert((transition.state.as_str(), transition.read)) {
            problems.push(AnalysisError::ShadowedTransition {
                rule: index + 1,
                state: transition.state.clone(),
                symbol: transition.read,
            });
        }
    }

    if !program
        .transitions
        .iter()
        .any(|t| t.state == TURING_INITIAL_STATE)
    {
        problems.push(AnalysisError::InvalidStartState(
            TURING_INITIAL_STATE.to_string(),
        ));
        return problems;
    }

    let reachable = reachable(TURING_INITIAL_STATE.to_string(), |state| {
        program
            .transitions
            .iter()
            .filter(|t| &t.state == state)
            .map(|t| t.next_state.clone())
            .collect()
    });

    let unreachable: BTreeSet<String> = program
        .transitions
        .iter()
        .map(|t| t.state.clone())
        .filter(|state| !reachable.contains(state))
        .collect();

    if !unreachable.is_empty() {
        problems.push(AnalysisError::UnreachableStates(
            unreachable.into_iter().collect(),
        ));
    }

    problems
}

/// Breadth-first walk over the control graph.
fn reachable<T, F>(start: T, successors: F) -> HashSet<T>
where
    T: Clone + Eq + std::hash::Hash,
    F: Fn(&T) -> Vec<T>,
{
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        if !visited.insert(node.clone()) {
            continue;
        }
        queue.extend(successors(&node));
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_post, parse_turing};

    #[test]
    fn test_clean_post_program() {
        let program = parse_post("? 4 2\n→ 1\n!\n1 3").unwrap();
        assert!(analyze_post(&program).is_empty());
    }

    #[test]
    fn test_post_problems() {
        let program = parse_post("→ 5\n? 1\n!").unwrap();

        assert_eq!(
            analyze_post(&program),
            vec![
                AnalysisError::UndefinedTarget { line: 1, target: 5 },
                AnalysisError::MalformedInstruction {
                    line: 2,
                    text: "? 1".into()
                },
                AnalysisError::UnreachableLines(vec![2, 3]),
            ]
        );
    }

    #[test]
    fn test_post_missing_halt() {
        let program = parse_post("→ 1").unwrap();
        assert_eq!(analyze_post(&program), vec![AnalysisError::MissingHalt]);
    }

    #[test]
    fn test_clean_turing_program() {
        let program = parse_turing("0 1 0 0 R\n0 _ 1 _ L\n1 0 1 0 L").unwrap();
        assert!(analyze_turing(&program).is_empty());
    }

    #[test]
    fn test_turing_problems() {
        let program = parse_turing("0 1 0 0 R\n0 1 1 1 L\nbad line\n7 _ 8 _ S").unwrap();

        assert_eq!(
            analyze_turing(&program),
            vec![
                AnalysisError::IgnoredLine {
                    line: 3,
                    text: "bad line".into()
                },
                AnalysisError::ShadowedTransition {
                    rule: 2,
                    state: "0".into(),
                    symbol: '1'
                },
                AnalysisError::UnreachableStates(vec!["7".into()]),
            ]
        );
    }

    #[test]
    fn test_turing_missing_start_state() {
        let program = parse_turing("q0 1 q1 0 R").unwrap();

        assert_eq!(
            analyze(&Program::Turing(program)),
            vec![AnalysisError::InvalidStartState("0".into())]
        );
    }

    #[test]
    fn test_error_display() {
        let error = AnalysisError::UndefinedTarget { line: 2, target: 9 };
        assert_eq!(error.to_string(), "Line 2 jumps to missing line 9");
    }
}
