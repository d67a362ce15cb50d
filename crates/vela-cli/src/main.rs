use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use vela::{EvalConfig, ParseSummary};

#[derive(Parser, Debug)]
#[command(name = "vela", version, about = "The Vela interpreter")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a program and print its result
    Run {
        /// Source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Deepest allowed nesting of function calls
        #[arg(long, default_value_t = EvalConfig::DEFAULT_MAX_CALL_DEPTH)]
        max_call_depth: usize,
    },
    /// Print the token stream
    Tokens {
        /// Source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the parsed program in canonical form
    Parse {
        /// Source file (use '-' to read from stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error(transparent)]
    Eval(#[from] vela::EvalError),
    #[error("cannot encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("build failed with {0} error(s)")]
    BuildFailed(usize),
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = dispatch(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (e.g. `RUST_LOG=vela_eval=trace`).
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .with(EnvFilter::from_default_env())
        .init();
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Run {
            file,
            max_call_depth,
        } => handle_run(&file, EvalConfig { max_call_depth }, cli.json),
        Commands::Tokens { file } => handle_tokens(&file, cli.json),
        Commands::Parse { file } => handle_parse(&file, cli.json),
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    let read_err = |source| CliError::Read {
        path: path.display().to_string(),
        source,
    };
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(read_err)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).map_err(read_err)
    }
}

fn handle_run(path: &Path, config: EvalConfig, json: bool) -> Result<(), CliError> {
    let source = read_source(path)?;
    debug!(path = %path.display(), ?config, "run");
    let out = vela::run_with_config(&source, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", out.display());
        for message in &out.diagnostics {
            eprintln!("{message}");
        }
    }

    if out.build_failed() {
        return Err(CliError::BuildFailed(out.diagnostics.len()));
    }
    Ok(())
}

fn handle_tokens(path: &Path, json: bool) -> Result<(), CliError> {
    let tokens = vela::tokenize(&read_source(path)?);
    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{:<8} {}", token.span.to_string(), token);
        }
    }
    Ok(())
}

fn handle_parse(path: &Path, json: bool) -> Result<(), CliError> {
    let result = vela::parse(&read_source(path)?);
    let errors = result.diagnostics.len();

    if json {
        println!("{}", serde_json::to_string_pretty(&ParseSummary::from(result))?);
    } else {
        for stmt in &result.program.statements {
            println!("{stmt}");
        }
        for diagnostic in &result.diagnostics {
            eprintln!("{diagnostic}");
        }
    }

    if errors > 0 {
        return Err(CliError::BuildFailed(errors));
    }
    Ok(())
}
