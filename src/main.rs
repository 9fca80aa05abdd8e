#[macro_use]
extern crate serde_derive;

use anyhow::{Context, Result, bail};
use docopt::Docopt;
use std::fs::File;
use std::io::{self, Read, Write, stdin};
use std::num::NonZeroUsize;
use std::process::exit;
use tracing_subscriber::EnvFilter;

use bfvm::codegen::emit_c;
use bfvm::{Config, EofPolicy, Interpreter, PointerOverflow, Program, Runnable};

const USAGE: &str = "
bfvm

Usage:
  bfvm [options] <program>
  bfvm (-h | --help)

Options:
  -h --help           Show this screen.
  --tape-length=<n>   Number of cells on the tape [default: 30000].
  --wrap              Wrap the data pointer around the tape instead of aborting.
  --eof=<mode>        Input at end of stream: unchanged, zero or newline [default: unchanged].
  --step-limit=<n>    Abort after executing this many opcodes.
  --disassemble       Display the linked bytecode instead of running it.
  --emit-c            Display equivalent C source instead of running it.
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_program: String,
    flag_tape_length: usize,
    flag_wrap: bool,
    flag_eof: String,
    flag_step_limit: Option<u64>,
    flag_disassemble: bool,
    flag_emit_c: bool,
}

/// What to do with the linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Interpret,
    Disassemble,
    EmitC,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bfvm=warn")),
        )
        .init();

    let (config, backend) = configure(&args).unwrap_or_else(|e| {
        eprintln!("Invalid arguments: {e:#}");
        exit(1)
    });

    let program = read_program(&args.arg_program)
        .and_then(|source| bfvm::build(&source).context("Could not compile program"))
        .unwrap_or_else(|e| {
            eprintln!("Error occurred while loading program: {e:#}");
            exit(1)
        });

    if let Err(e) = execute(program, config, backend) {
        eprintln!("Error occurred while running program: {e:#}");
        exit(1)
    }
}

/// Turn command line flags into an interpreter configuration and a backend.
fn configure(args: &Args) -> Result<(Config, Backend)> {
    let tape_length =
        NonZeroUsize::new(args.flag_tape_length).context("--tape-length must be positive")?;

    let eof = match args.flag_eof.as_str() {
        "unchanged" => EofPolicy::Unchanged,
        "zero" => EofPolicy::Zero,
        "newline" => EofPolicy::Newline,
        other => bail!("unknown --eof mode {other:?}"),
    };

    let pointer_overflow = if args.flag_wrap {
        PointerOverflow::Wrap
    } else {
        PointerOverflow::Abort
    };

    let backend = match (args.flag_disassemble, args.flag_emit_c) {
        (false, false) => Backend::Interpret,
        (true, false) => Backend::Disassemble,
        (false, true) => Backend::EmitC,
        (true, true) => bail!("--disassemble and --emit-c cannot be combined"),
    };

    let config = Config {
        tape_length,
        pointer_overflow,
        eof,
        step_limit: args.flag_step_limit,
    };

    Ok((config, backend))
}

fn execute(program: Program, config: Config, backend: Backend) -> Result<()> {
    match backend {
        Backend::Interpret => {
            let mut runnable: Box<dyn Runnable> = Box::new(Interpreter::new(program, config)?);
            runnable.run()
        }
        Backend::Disassemble => {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{program:?}")?;
            stdout.flush()?;
            Ok(())
        }
        Backend::EmitC => {
            let mut stdout = io::stdout().lock();
            emit_c(&program, &config, &mut stdout)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Read a BrainFuck program's source code.
///
/// When path is "-" this will read from stdin.
fn read_program(path: &str) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut source: Box<dyn Read> = {
        if path == "-" {
            Box::new(stdin())
        } else {
            Box::new(File::open(path).with_context(|| format!("Could not open file {path:?}"))?)
        }
    };

    source
        .read_to_end(&mut buffer)
        .context("Could not read file")?;

    if buffer.is_empty() {
        bail!("nothing to do");
    }

    Ok(buffer)
}
