mod config;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lc_compat::compatify;
use lc_format::{format_source, CallParens};
use lc_syntax::{PassOutput, SyntaxError, SyntaxTreeDump, UnchangedReason};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "lc", about = "luacube: Luau formatter and Lua compatibility rewriter")]
struct Cli {
    /// Config file (default: luacube.toml next to the input).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log rewrite passes and other debug output.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a file in place.
    Format {
        input: PathBuf,
        /// Exit non-zero if the file is not already formatted.
        #[arg(long, conflicts_with = "stdout")]
        check: bool,
        /// Print the result instead of writing the file.
        #[arg(long)]
        stdout: bool,
        /// Parenthesize calls with a single string or table argument.
        #[arg(long, value_enum)]
        call_parens: Option<ParensArg>,
    },
    /// Rewrite Luau-only syntax into plain Lua.
    Compat {
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Format the rewritten code.
        #[arg(long)]
        format: bool,
    },
    /// Parse the file and report any syntax errors.
    Check { input: PathBuf },
    /// Parse and dump the syntax tree.
    Parse {
        input: PathBuf,
        /// Dump as JSON instead of an outline.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ParensArg {
    Omit,
    Always,
}

impl From<ParensArg> for CallParens {
    fn from(arg: ParensArg) -> Self {
        match arg {
            ParensArg::Omit => CallParens::Omit,
            ParensArg::Always => CallParens::Always,
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = if verbose { "lc=debug" } else { "lc=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// `file:line:col: message`, with a 1-based line and column.
fn describe(path: &Path, source: &str, error: &SyntaxError) -> String {
    let before = &source[..error.offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    format!("{}:{line}:{column}: {}", path.display(), error.message)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn warn_unchanged(path: &Path, source: &str, reason: UnchangedReason) {
    match reason {
        UnchangedReason::ParseError => {
            let tree = lc_parser::parse(source);
            for error in tree.errors() {
                tracing::warn!("{}", describe(path, source, error));
            }
            tracing::warn!(file = %path.display(), "does not parse; left untouched");
        }
        UnchangedReason::StrayComment => {
            tracing::warn!(file = %path.display(), "comment inside an expression; left untouched");
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Format {
            input,
            check,
            stdout,
            call_parens,
        } => {
            let mut config = Config::resolve(cli.config.as_deref(), &input)?;
            if let Some(parens) = call_parens {
                config.format.call_parens = parens.into();
            }
            let source = read(&input)?;
            let formatted = match format_source(&source, &config.format) {
                PassOutput::Rewritten(text) => text,
                PassOutput::Unchanged { text, reason } => {
                    warn_unchanged(&input, &source, reason);
                    text
                }
            };

            if check {
                if formatted != source {
                    eprintln!("would reformat {}", input.display());
                    return Ok(ExitCode::FAILURE);
                }
            } else if stdout {
                print!("{formatted}");
            } else if formatted != source {
                std::fs::write(&input, &formatted)
                    .with_context(|| format!("failed to write {}", input.display()))?;
                tracing::info!(file = %input.display(), "formatted");
            }
        }
        Commands::Compat {
            input,
            output,
            format,
        } => {
            let config = Config::resolve(cli.config.as_deref(), &input)?;
            let source = read(&input)?;
            let lowered = compatify(&source, &config.compat)
                .with_context(|| format!("failed to rewrite {}", input.display()))?;
            let text = match lowered {
                PassOutput::Rewritten(text) if format => match format_source(&text, &config.format) {
                    PassOutput::Rewritten(formatted) => formatted,
                    PassOutput::Unchanged { text, reason } => {
                        warn_unchanged(&input, &text, reason);
                        text
                    }
                },
                PassOutput::Rewritten(text) => text,
                PassOutput::Unchanged { text, reason } => {
                    warn_unchanged(&input, &source, reason);
                    text
                }
            };

            match &output {
                Some(path) => std::fs::write(path, &text)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{text}"),
            }
        }
        Commands::Check { input } => {
            let source = read(&input)?;
            let tree = lc_parser::parse(&source);
            if tree.has_error() {
                for error in tree.errors() {
                    eprintln!("{}", describe(&input, &source, error));
                }
                return Ok(ExitCode::FAILURE);
            }
            eprintln!("OK: {}", input.display());
        }
        Commands::Parse { input, json } => {
            let source = read(&input)?;
            let tree = lc_parser::parse(&source);
            if json {
                let dump = SyntaxTreeDump::from(&tree);
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                print!("{tree:?}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_positions_are_one_based() {
        let error = SyntaxError::new("expected a name, found `=`", 15);
        assert_eq!(
            describe(Path::new("a.luau"), "print(1)\nlocal = 2", &error),
            "a.luau:2:7: expected a name, found `=`"
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
