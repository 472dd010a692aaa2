use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use schemars::schema_for;
use tracing::{debug, info};

use diffsuggest_core::{
    render_markdown, render_rdjson, render_rdjsonl, render_sarif_json, render_text, DiffParser,
};
use diffsuggest_types::{
    Diagnostic, DiagnosticResult, RunnerConfig, Source, DEFAULT_SOURCE_NAME,
    DIAGNOSTIC_RESULT_SCHEMA_NAME, DIAGNOSTIC_SCHEMA_NAME, RUNNER_CONFIG_SCHEMA_NAME,
};

mod config_loader;

use config_loader::{find_default_config, load_runner_config};

/// Exit code when `--fail-on-diff` is set and suggestions were produced.
const EXIT_HAS_SUGGESTIONS: i32 = 2;

#[derive(Parser)]
#[command(name = "diffsuggest")]
#[command(about = "Turn unified diffs into suggested-change diagnostics", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a unified diff into diagnostics.
    Parse(ParseArgs),

    /// Print the runners defined in a reviewdog config file.
    Runners(RunnersArgs),

    /// Print or write the JSON schemas of the output records.
    Schema(SchemaArgs),
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Diff to read. `-` or omitted reads stdin.
    #[arg(long, value_name = "PATH")]
    diff_file: Option<PathBuf>,

    /// Leading path components to strip, like `patch -pN`.
    #[arg(long, default_value_t = 1)]
    strip: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Rdjsonl)]
    format: OutputFormat,

    /// Source name reported in rdjson, SARIF and markdown output.
    #[arg(long, default_value = DEFAULT_SOURCE_NAME)]
    name: String,

    /// Write output to a file instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Exit with code 2 if any diagnostic was produced.
    #[arg(long)]
    fail_on_diff: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Rdjsonl,
    Rdjson,
    Text,
    Sarif,
    Markdown,
}

#[derive(Parser, Debug)]
struct RunnersArgs {
    /// Path to a config file. If omitted, uses ./.reviewdog.yml or ./reviewdog.yml.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = RunnersFormat::Yaml)]
    format: RunnersFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RunnersFormat {
    Json,
    Yaml,
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    /// Which schema to print when `--out-dir` is not given.
    #[arg(long, value_enum, default_value_t = SchemaKind::Diagnostic)]
    kind: SchemaKind,

    /// Write every schema into this directory.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SchemaKind {
    Diagnostic,
    DiagnosticResult,
    RunnerConfig,
}

impl SchemaKind {
    const ALL: [SchemaKind; 3] = [
        SchemaKind::Diagnostic,
        SchemaKind::DiagnosticResult,
        SchemaKind::RunnerConfig,
    ];

    fn file_name(self) -> String {
        let name = match self {
            SchemaKind::Diagnostic => DIAGNOSTIC_SCHEMA_NAME,
            SchemaKind::DiagnosticResult => DIAGNOSTIC_RESULT_SCHEMA_NAME,
            SchemaKind::RunnerConfig => RUNNER_CONFIG_SCHEMA_NAME,
        };
        format!("{name}.schema.json")
    }

    fn render(self) -> Result<String> {
        let schema = match self {
            SchemaKind::Diagnostic => schema_for!(Diagnostic),
            SchemaKind::DiagnosticResult => schema_for!(DiagnosticResult),
            SchemaKind::RunnerConfig => schema_for!(RunnerConfig),
        };
        let mut text = serde_json::to_string_pretty(&schema).context("serialize schema")?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Parse(args) => cmd_parse(args),
        Commands::Runners(args) => {
            cmd_runners(args)?;
            Ok(0)
        }
        Commands::Schema(args) => {
            cmd_schema(args)?;
            Ok(0)
        }
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_parse(args: ParseArgs) -> Result<i32> {
    let parser = DiffParser::new(args.strip);

    let diagnostics = match args.diff_file.as_deref() {
        Some(path) if path != Path::new("-") => {
            info!("Reading diff from {}", path.display());
            let file = std::fs::File::open(path)
                .with_context(|| format!("open diff {}", path.display()))?;
            parser
                .parse_reader(file)
                .with_context(|| format!("parse diff {}", path.display()))?
        }
        _ => {
            info!("Reading diff from stdin");
            parser
                .parse_reader(io::stdin().lock())
                .context("parse diff from stdin")?
        }
    };

    info!("Produced {} diagnostic(s)", diagnostics.len());
    let has_suggestions = !diagnostics.is_empty();

    let result = DiagnosticResult {
        source: Source {
            name: args.name,
            url: None,
        },
        diagnostics,
    };

    let rendered = match args.format {
        OutputFormat::Rdjsonl => render_rdjsonl(&result.diagnostics).context("render rdjsonl")?,
        OutputFormat::Rdjson => render_rdjson(&result).context("render rdjson")?,
        OutputFormat::Text => render_text(&result.diagnostics),
        OutputFormat::Sarif => {
            let mut s = render_sarif_json(&result).context("render SARIF")?;
            s.push('\n');
            s
        }
        OutputFormat::Markdown => render_markdown(&result),
    };

    emit(args.out.as_deref(), &rendered)?;

    if args.fail_on_diff && has_suggestions {
        return Ok(EXIT_HAS_SUGGESTIONS);
    }
    Ok(0)
}

fn cmd_runners(args: RunnersArgs) -> Result<()> {
    let path = match args.config {
        Some(path) => path,
        None => match find_default_config(Path::new(".")) {
            Some(path) => path,
            None => bail!("No configuration file found. Specify --config or create .reviewdog.yml"),
        },
    };

    let cfg = load_runner_config(&path)?;

    let s = match args.format {
        RunnersFormat::Json => {
            let mut s = serde_json::to_string_pretty(&cfg).context("render json")?;
            s.push('\n');
            s
        }
        RunnersFormat::Yaml => serde_yaml::to_string(&cfg).context("render yaml")?,
    };
    print!("{s}");

    Ok(())
}

fn cmd_schema(args: SchemaArgs) -> Result<()> {
    match args.out_dir {
        Some(dir) => {
            for kind in SchemaKind::ALL {
                let path = dir.join(kind.file_name());
                write_text(&path, &kind.render()?)?;
                info!("Wrote {}", path.display());
            }
        }
        None => print!("{}", args.kind.render()?),
    }
    Ok(())
}

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => write_text(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("write stdout")?;
            stdout.flush().context("flush stdout")
        }
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }

    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
