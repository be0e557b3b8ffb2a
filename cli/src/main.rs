//! mqlite CLI — driving adapter for the mqlite matching engine.
//!
//! Subcommands:
//! - `match <pattern>`: match stdin against a pattern and print the result
//! - `check <pattern>`: validate that a pattern compiles
//! - `shell <data>`: load data once and match patterns interactively

mod format;
mod shell;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use mqlite::{CompileOptions, Compiler, Equality};
use serde_json::Value;

use format::{JsonFormatter, Newline};
use shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "mqlite", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match JSON from stdin against a pattern
    Match {
        /// JSON pattern to match against stdin
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Exit with an error message and status 1 when nothing matches
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        compile: CompileArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check that a pattern compiles
    Check {
        /// JSON pattern to validate
        #[arg(value_name = "PATTERN")]
        pattern: String,

        #[command(flatten)]
        compile: CompileArgs,
    },
    /// Load data once, then match patterns read line by line
    Shell {
        /// JSON data file, or `-` for stdin
        #[arg(value_name = "DATA")]
        data: PathBuf,

        #[command(flatten)]
        compile: CompileArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct CompileArgs {
    /// Compile options file (JSON, or YAML for any other extension)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Treat true/false as 1/0 in equality and ordering
    #[arg(long)]
    loose_equality: bool,
}

#[derive(Args, Debug)]
#[command(next_help_heading = "Output format")]
struct OutputArgs {
    /// Escape non-ASCII characters
    #[arg(long)]
    ascii: bool,

    /// Use N spaces of indentation (negative to disable)
    #[arg(long, value_name = "N", default_value_t = 4, allow_negative_numbers = true)]
    indent: i64,

    /// Sort object keys before printing
    #[arg(long)]
    sort_keys: bool,

    /// Newline sequence for indented output
    #[arg(long, value_enum, default_value_t = Newline::System)]
    newline: Newline,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("mqlite: error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("MQLITE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn run(command: Command) -> anyhow::Result<ExitCode> {
    match command {
        Command::Match {
            pattern,
            strict,
            compile,
            output,
        } => cmd_match(&pattern, strict, &compile, &output),
        Command::Check { pattern, compile } => cmd_check(&pattern, &compile),
        Command::Shell {
            data,
            compile,
            output,
        } => cmd_shell(&data, &compile, &output),
    }
}

fn cmd_match(
    pattern: &str,
    strict: bool,
    compile: &CompileArgs,
    output: &OutputArgs,
) -> anyhow::Result<ExitCode> {
    let compiler = build_compiler(compile)?;
    let matcher = compiler.compile(&decode(pattern).context("invalid pattern")?)?;

    let data = decode(&read_stdin()?).context("invalid input data")?;
    tracing::debug!(strict, "matching stdin");

    match matcher.evaluate(&data)? {
        Some(result) => {
            let formatter = build_formatter(output);
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}{}", formatter.dump(&result)?, formatter.newline.as_str())?;
            stdout.flush()?;
            Ok(ExitCode::SUCCESS)
        }
        None if strict => bail!("no match"),
        None => Ok(ExitCode::SUCCESS),
    }
}

fn cmd_check(pattern: &str, compile: &CompileArgs) -> anyhow::Result<ExitCode> {
    let compiler = build_compiler(compile)?;
    let matcher = compiler.compile(&decode(pattern).context("invalid pattern")?)?;
    println!("Pattern valid (depth {})", matcher.depth());
    Ok(ExitCode::SUCCESS)
}

fn cmd_shell(path: &Path, compile: &CompileArgs, output: &OutputArgs) -> anyhow::Result<ExitCode> {
    let text = if path == Path::new("-") {
        read_stdin()?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read \"{}\"", path.display()))?
    };
    let data = decode(&text).context("invalid input data")?;

    let shell = Shell::new(data, build_compiler(compile)?, build_formatter(output));
    shell.run()?;
    Ok(ExitCode::SUCCESS)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Composition
// ═══════════════════════════════════════════════════════════════════════════════

fn build_compiler(args: &CompileArgs) -> anyhow::Result<Compiler> {
    let mut options = match &args.config {
        Some(path) => load_config(path)?,
        None => CompileOptions::default(),
    };
    if args.loose_equality {
        options.equality = Equality::Loose;
    }
    tracing::debug!(?options, "compile options");
    Ok(Compiler::with_options(options))
}

fn build_formatter(args: &OutputArgs) -> JsonFormatter {
    JsonFormatter {
        ascii: args.ascii,
        indent: usize::try_from(args.indent).ok(),
        sort_keys: args.sort_keys,
        newline: args.newline,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Input
// ═══════════════════════════════════════════════════════════════════════════════

fn load_config(path: &Path) -> anyhow::Result<CompileOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read \"{}\"", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).context("JSON parse error")
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).context("YAML parse error")
    }
}

fn read_stdin() -> anyhow::Result<String> {
    let mut bytes = Vec::new();
    io::stdin()
        .read_to_end(&mut bytes)
        .context("failed to read stdin")?;
    String::from_utf8(bytes).context("stdin is not valid UTF-8")
}

/// Decode JSON text, keeping object key order and ignoring a leading BOM.
fn decode(text: &str) -> serde_json::Result<Value> {
    serde_json::from_str(text.strip_prefix('\u{feff}').unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_match_defaults() {
        let cli = Cli::try_parse_from(["mqlite", "match", "[{\"a\": null}]"]).unwrap();
        match cli.command {
            Command::Match {
                pattern,
                strict,
                compile,
                output,
            } => {
                assert_eq!(pattern, "[{\"a\": null}]");
                assert!(!strict);
                assert!(compile.config.is_none());
                assert!(!compile.loose_equality);
                assert_eq!(output.indent, 4);
                assert_eq!(output.newline, Newline::System);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn parse_negative_indent_and_options() {
        let cli = Cli::try_parse_from([
            "mqlite",
            "match",
            "null",
            "--indent",
            "-1",
            "--newline",
            "dos",
            "--ascii",
            "--sort-keys",
            "--strict",
            "--loose-equality",
        ])
        .unwrap();
        let Command::Match {
            strict,
            compile,
            output,
            ..
        } = cli.command
        else {
            panic!("expected match");
        };
        assert!(strict);
        assert!(compile.loose_equality);
        let formatter = build_formatter(&output);
        assert_eq!(formatter.indent, None);
        assert_eq!(formatter.newline, Newline::Dos);
        assert!(formatter.ascii);
        assert!(formatter.sort_keys);
    }

    #[test]
    fn parse_rejects_unknown_newline() {
        assert!(Cli::try_parse_from(["mqlite", "match", "null", "--newline", "vms"]).is_err());
    }

    #[test]
    fn decode_strips_bom() {
        assert_eq!(decode("\u{feff}[1]").unwrap(), json!([1]));
        assert!(decode("[1").is_err());
    }

    #[test]
    fn load_config_by_extension() {
        let dir = std::env::temp_dir().join(format!("mqlite-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let json_path = dir.join("options.json");
        std::fs::write(&json_path, r#"{ "equality": "loose", "max_depth": 5 }"#).unwrap();
        let options = load_config(&json_path).unwrap();
        assert_eq!(options.equality, Equality::Loose);
        assert_eq!(options.max_depth, 5);

        let yaml_path = dir.join("options.yml");
        std::fs::write(&yaml_path, "max_regex_length: 10\n").unwrap();
        let options = load_config(&yaml_path).unwrap();
        assert_eq!(options.equality, Equality::Strict);
        assert_eq!(options.max_regex_length, 10);

        let bad_path = dir.join("bad.json");
        std::fs::write(&bad_path, r#"{ "unknown": 1 }"#).unwrap();
        assert!(load_config(&bad_path).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn loose_flag_overrides_config() {
        let args = CompileArgs {
            config: None,
            loose_equality: true,
        };
        let compiler = build_compiler(&args).unwrap();
        assert_eq!(compiler.options().equality, Equality::Loose);
    }
}
