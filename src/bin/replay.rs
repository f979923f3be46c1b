//! Replay a command file against a [`PackedMemoryArray`].
//!
//! Usage: `replay <input_file> <output_file>`
//!
//! The input holds one command per line, whitespace-separated:
//!
//! | Command | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `INC v` | Insert integer `v`                                            |
//! | `REM v` | Remove integer `v`                                            |
//! | `SUC v` | Write the successor of `v` (or `v` itself when none) + newline |
//! | `IMP`   | Write every stored key ascending, space-separated, + newline   |
//!
//! An empty line ends processing. An unknown command is reported to stderr
//! and skipped; a known command with the wrong shape aborts with a
//! diagnostic naming the 1-indexed line.

use pma::PackedMemoryArray;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    #[cfg(feature = "tracing")]
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Incorrect usage");
        eprintln!("Usage example:");
        eprintln!("\n\treplay <input_file>.txt <output_file>.txt");
        return ExitCode::FAILURE;
    }

    let input = match File::open(&args[1]) {
        Ok(file) => BufReader::new(file),
        Err(err) => {
            eprintln!("Could not open input file {}: {err}", args[1]);
            return ExitCode::FAILURE;
        }
    };
    let output = match File::create(&args[2]) {
        Ok(file) => BufWriter::new(file),
        Err(err) => {
            eprintln!("Could not open output file {}: {err}", args[2]);
            return ExitCode::FAILURE;
        }
    };

    match replay(input, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

/// A fatal problem in the command stream.
///
/// Unknown commands are not errors (they are reported and skipped); these
/// abort the replay.
#[derive(Debug)]
enum CommandError {
    /// A known command with the wrong number of tokens.
    Arity {
        command: &'static str,
        line_no: usize,
        line: String,
    },
    /// A value token that does not parse as an integer.
    BadInteger {
        token: String,
        line_no: usize,
        line: String,
    },
    Io(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity {
                command,
                line_no,
                line,
            } => {
                write!(f, "Error on {command}\nline {line_no}: {line}")
            }

            Self::BadInteger {
                token,
                line_no,
                line,
            } => {
                write!(f, "Not an integer: {token}\nline {line_no}: {line}")
            }

            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Feed every command line from `input` into a fresh set, writing `SUC` and
/// `IMP` results to `output`.
fn replay<R: BufRead, W: Write>(input: R, mut output: W) -> Result<(), CommandError> {
    let mut set: PackedMemoryArray<i64> = PackedMemoryArray::new();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            break;
        }

        match tokens[0] {
            "INC" => {
                let value = single_value("INC", &tokens, line_no, &line)?;
                set.insert(value);
            }

            "REM" => {
                let value = single_value("REM", &tokens, line_no, &line)?;
                set.remove(&value);
            }

            "SUC" => {
                let value = single_value("SUC", &tokens, line_no, &line)?;
                let answer = set.successor(&value).copied().unwrap_or(value);
                writeln!(output, "{answer}")?;
            }

            "IMP" => {
                if tokens.len() != 1 {
                    return Err(CommandError::Arity {
                        command: "IMP",
                        line_no,
                        line,
                    });
                }
                let mut keys = set.iter();
                if let Some(first) = keys.next() {
                    write!(output, "{first}")?;
                    for key in keys {
                        write!(output, " {key}")?;
                    }
                }
                writeln!(output)?;
            }

            unknown => {
                eprintln!("Undefined command {unknown}");
                eprintln!("line {line_no}: {line}");
            }
        }
    }

    output.flush()?;
    Ok(())
}

/// Extract the single integer argument of `command`, or fail with the line
/// context.
fn single_value(
    command: &'static str,
    tokens: &[&str],
    line_no: usize,
    line: &str,
) -> Result<i64, CommandError> {
    if tokens.len() != 2 {
        return Err(CommandError::Arity {
            command,
            line_no,
            line: line.to_owned(),
        });
    }
    tokens[1].parse().map_err(|_| CommandError::BadInteger {
        token: tokens[1].to_owned(),
        line_no,
        line: line.to_owned(),
    })
}
