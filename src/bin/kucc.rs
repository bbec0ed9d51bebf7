use clap::{ArgEnum, Parser};
use kucc::parser_diagnostics::render;
use kucc::sexp_ast::display_sexp;
use kucc::stack_machine::{evaluate, lower, EvalError};
use kucc::{parse, parse_complete, tokenize, ParseError};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CommandError {
    #[error("I/O error: {0}")]
    Io(
        #[from]
        #[source]
        std::io::Error,
    ),
    #[error("give exactly one of an expression or --file")]
    InputSelection,
    #[error("{error}")]
    Parse { error: ParseError, input: Vec<u8> },
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("cannot serialize the tree: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    fn render(&self) -> String {
        match self {
            CommandError::Parse { error, input } => error.render(input),
            _ => render(self),
        }
    }
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        tracing::debug!(error = ?e, "compilation failed");
        eprint!("{}", e.render());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CommandError> {
    let source = match (&cli.source, &cli.file) {
        (Some(source), None) => source.as_bytes().to_owned(),
        (None, Some(file)) => std::fs::read(file)?,
        _ => return Err(CommandError::InputSelection),
    };
    if cli.format == Format::Tokens {
        let tokens = tokenize(&source).map_err(|error| parse_error(error, &source))?;
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }
    let result = if cli.deny_trailing {
        parse_complete(&source)
    } else {
        parse(&source)
    };
    let node = result.map_err(|error| parse_error(error, &source))?;
    tracing::debug!(format = ?cli.format, "parsed");
    match cli.format {
        Format::Sexp => println!("{}", display_sexp(&node)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&node)?),
        Format::Ops => {
            for op in lower(&node) {
                println!("{}", op);
            }
        }
        Format::Eval => println!("{}", evaluate(&node)?),
        Format::Tokens => {}
    }
    Ok(())
}

fn parse_error(error: ParseError, source: &[u8]) -> CommandError {
    CommandError::Parse {
        error,
        input: source.to_owned(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
enum Format {
    /// S-expression dump of the tree
    Sexp,
    /// The tree as JSON
    Json,
    /// Stack operations in evaluation order
    Ops,
    /// The value of the expression
    Eval,
    /// The token stream as JSON, without parsing
    Tokens,
}

/// Parses an arithmetic/comparison expression and prints its syntax tree.
#[derive(Debug, Parser)]
#[clap(name = "kucc", version)]
struct Cli {
    /// Expression to compile
    source: Option<String>,
    /// Read the expression from a file instead
    #[clap(short, long)]
    file: Option<PathBuf>,
    #[clap(long, arg_enum, default_value = "sexp")]
    format: Format,
    /// Reject tokens left over after the expression
    #[clap(long)]
    deny_trailing: bool,
}
