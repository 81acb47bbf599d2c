//! This module provides the parser for Post and Turing program listings, utilizing the `pest`
//! crate. Listings are line oriented: each line is tokenized by `grammar.pest` and then decoded
//! into a `Command` (Post) or a `Transition` (Turing).
//!
//! Decoding is permissive. A Post line that does not decode becomes `Command::Malformed` and
//! halts the machine when reached; a Turing line that is not a valid quintuple is skipped and
//! recorded in `TuringProgram::ignored`.

use crate::types::{
    Command, Direction, Instruction, MachineError, MachineKind, PostProgram, Program, Transition,
    TuringProgram,
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the listing grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct ListingParser;

/// Parses a listing for the given machine kind.
pub fn parse(kind: MachineKind, input: &str) -> Result<Program, MachineError> {
    match kind {
        MachineKind::Post => parse_post(input).map(Program::Post),
        MachineKind::Turing => parse_turing(input).map(Program::Turing),
    }
}

/// Parses a Post listing.
pub fn parse_post(input: &str) -> Result<PostProgram, MachineError> {
    parse_post_lines(input.lines())
}

/// Parses a Post listing supplied line by line.
///
/// Every non-empty line becomes an instruction. Its line number is its 1-based position in
/// `lines`, blank lines included; an embedded `N.` label is stripped and otherwise ignored.
pub fn parse_post_lines<I, S>(lines: I) -> Result<PostProgram, MachineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut instructions = Vec::new();

    for (index, raw) in lines.into_iter().enumerate() {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }

        let line = index + 1;
        let tokens: Vec<&str> = parse_line(Rule::post_line, raw)?
            .into_inner()
            .filter(|p| p.as_rule() == Rule::token)
            .map(|p| p.as_str())
            .collect();

        let command = decode_command(&tokens);
        if command == Command::Malformed {
            log::warn!("Post line {line} does not decode: {raw:?}");
        } else {
            log::trace!("Post line {line}: {command:?}");
        }

        instructions.push(Instruction {
            line,
            text: tokens.join(" "),
            command,
        });
    }

    Ok(PostProgram { instructions })
}

/// Parses a Turing listing.
pub fn parse_turing(input: &str) -> Result<TuringProgram, MachineError> {
    parse_turing_lines(input.lines())
}

/// Parses a Turing listing supplied line by line.
///
/// Blank lines and lines starting with `#` are skipped silently. Lines that are not a
/// `state symbol new_state new_symbol direction` quintuple are skipped and recorded.
pub fn parse_turing_lines<I, S>(lines: I) -> Result<TuringProgram, MachineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut program = TuringProgram::default();

    for (index, raw) in lines.into_iter().enumerate() {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }

        let mut tokens = Vec::new();
        let mut comment = false;
        for pair in parse_line(Rule::turing_line, raw)?.into_inner() {
            match pair.as_rule() {
                Rule::comment => comment = true,
                Rule::token => tokens.push(pair.as_str()),
                _ => {} // EOI
            }
        }

        if comment {
            continue;
        }

        match decode_transition(&tokens) {
            Some(transition) => program.transitions.push(transition),
            None => {
                log::warn!("Ignoring Turing line {}: {raw:?}", index + 1);
                program.ignored.push((index + 1, raw.to_string()));
            }
        }
    }

    Ok(program)
}

/// Runs the grammar over a single line and returns the line's pair.
fn parse_line(rule: Rule, line: &str) -> Result<Pair<'_, Rule>, MachineError> {
    ListingParser::parse(rule, line)
        .map_err(|e| MachineError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| MachineError::ValidationError(format!("Empty parse for line {line:?}")))
}

/// Decodes the tokens of a Post line (label already stripped).
///
/// Opcodes: `→ -> >` move right, `← <- <` move left, `1 V` mark, `0 X` erase,
/// `?` branch on blank, `!` halt.
fn decode_command(tokens: &[&str]) -> Command {
    let Some((opcode, operands)) = tokens.split_first() else {
        return Command::Malformed;
    };

    let targets: Option<Vec<usize>> = operands.iter().map(|t| t.parse().ok()).collect();
    let Some(targets) = targets else {
        return Command::Malformed;
    };

    match (*opcode, targets.as_slice()) {
        ("→" | "->" | ">", &[next]) => Command::MoveRight(next),
        ("←" | "<-" | "<", &[next]) => Command::MoveLeft(next),
        ("1" | "V", &[next]) => Command::Write1(next),
        ("0" | "X", &[next]) => Command::Write0(next),
        ("?", &[zero, one]) => Command::Branch(zero, one),
        ("!", &[]) => Command::Halt,
        _ => Command::Malformed,
    }
}

/// Decodes the tokens of a Turing line into a rule.
fn decode_transition(tokens: &[&str]) -> Option<Transition> {
    let &[state, read, next_state, write, direction] = tokens else {
        return None;
    };

    Some(Transition {
        state: state.to_string(),
        read: parse_symbol(read)?,
        next_state: next_state.to_string(),
        write: parse_symbol(write)?,
        direction: Direction::from_token(direction)?,
    })
}

/// Parses a single character symbol. Longer tokens are rejected.
fn parse_symbol(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Some(symbol),
        _ => None,
    }
}
