use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use ptm::{
    analyze, Halt, LogEntry, Machine, MachineKind, Program, ProgramLoader, ProgramManager, Status,
    DEFAULT_MAX_STEPS,
};
use serde::Serialize;
use std::io::{self, Read};
use std::{fs, path::Path};

/// Runs Post and Turing machine programs and prints the final tape.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  ptm-cli --program programs/invert.tur --input 101
  ptm-cli --builtin 'Unary increment' --debug
  cat listing.post | ptm-cli --kind post --input 0110")]
struct Cli {
    /// The program file to execute (.post or .tur)
    #[clap(short, long, conflicts_with = "builtin")]
    program: Option<String>,

    /// Machine kind. Overrides the file extension; required for programs piped into stdin
    #[clap(short, long, value_enum)]
    kind: Option<Kind>,

    /// Name of a built-in program to execute
    #[clap(short, long)]
    builtin: Option<String>,

    /// The initial tape content
    #[clap(short, long)]
    input: Option<String>,

    /// Stop after this many steps if the machine has not halted
    #[clap(short, long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Print each step of the execution
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the final status and the step log as JSON
    #[clap(long)]
    json: bool,

    /// Report problems found in the listing before running it
    #[clap(long)]
    check: bool,

    /// List the built-in programs and exit
    #[clap(long)]
    list: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Post,
    Turing,
}

impl From<Kind> for MachineKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Post => MachineKind::Post,
            Kind::Turing => MachineKind::Turing,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    executed: usize,
    halt: Option<Halt>,
    status: Status,
    log: &'a [LogEntry],
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.list {
        for index in 0..ProgramManager::get_program_count() {
            let info = ProgramManager::get_program_info(index)?;
            println!(
                "{:>2}. {} [{}] tape: {}",
                index, info.name, info.kind, info.initial_tape
            );
        }
        return Ok(());
    }

    let (program, default_tape) = load_program(&cli)?;

    if cli.check {
        for problem in analyze(&program) {
            eprintln!("warning: {}", problem);
        }
    }

    let input = cli.input.clone().unwrap_or(default_tape);
    let kind = program.kind();
    let mut machine = program.into_machine(&input)?;

    log::info!(
        "Running {} program on {:?} for at most {} steps",
        kind,
        input,
        cli.max_steps
    );
    let executed = machine.run(cli.max_steps);

    if cli.json {
        let report = Report {
            executed,
            halt: machine.halt_reason(),
            status: machine.status(),
            log: machine.log(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if cli.debug {
        for entry in machine.log() {
            print_entry(entry);
        }
        println!();
    }

    print_status(machine.as_ref(), executed);

    Ok(())
}

/// Loads the program named by the CLI arguments, with the tape it suggests.
///
/// Tries a built-in program, then a file path, then stdin.
fn load_program(cli: &Cli) -> anyhow::Result<(Program, String)> {
    if let Some(name) = &cli.builtin {
        let builtin = ProgramManager::get_program_by_name(name)?;
        return Ok((builtin.program.clone(), builtin.tape.to_string()));
    }

    let program = if let Some(path) = &cli.program {
        let path = Path::new(path);
        match cli.kind {
            Some(kind) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read file '{}'", path.display()))?;
                ProgramLoader::load_program_from_string(kind.into(), &content)?
            }
            None => ProgramLoader::load_program(path)?,
        }
    } else if atty::isnt(atty::Stream::Stdin) {
        let Some(kind) = cli.kind else {
            bail!("--kind is required when the program is read from stdin");
        };
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        ProgramLoader::load_program_from_string(kind.into(), &buffer)?
    } else {
        bail!("No program given: use --program, --builtin or pipe a listing into stdin");
    };

    Ok((program, String::new()))
}

fn print_entry(entry: &LogEntry) {
    let instruction = if entry.instruction.is_empty() {
        "-"
    } else {
        entry.instruction.as_str()
    };

    match entry.halt {
        Some(halt) => println!(
            "Step: {}, At: {}, Read: {}, Instruction: {}, Halt: {}",
            entry.step, entry.before, entry.read, instruction, halt
        ),
        None => println!(
            "Step: {}, At: {} -> {}, Read: {}, Instruction: {}, Head: {}, Tape: {}",
            entry.step, entry.before, entry.after, entry.read, instruction, entry.head, entry.tape
        ),
    }
}

fn print_status(machine: &dyn Machine, executed: usize) {
    let status = machine.status();

    println!(
        "At: {}, Head: {}, Symbol: {}, Steps: {}, Tape starts at: {}",
        status.control, status.head, status.symbol, status.step_count, status.origin
    );
    match machine.halt_reason() {
        Some(halt) => println!("Machine halted: {}.", halt),
        None => println!("Machine still running after {} steps.", executed),
    }
    println!("{}", status.tape);
}
