//! fanout CLI - apply a registered handler to every element of a JSON array.
//!
//! ```text
//! fanout run --handler upper --policy chunkwise --chunk-size 50 < items.json
//! fanout handlers
//! ```
//!
//! Results go to stdout as a JSON array; diagnostics and failure reports go to
//! stderr through `tracing` (`FANOUT_LOG`, then `RUST_LOG`, then the config
//! file's `[logging] filter`).

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use fanout_config::{FanoutConfig, RunSettings};
use fanout_core::{
    ChunkSize, ExtraArgs, HandlerRegistry, RunPolicy, RunRequest, Runner, json_kind,
};

const LOG_ENV: &str = "FANOUT_LOG";

#[derive(Parser)]
#[command(name = "fanout")]
#[command(about = "Apply a handler to every element of a JSON array with bounded concurrency")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a handler over a JSON array read from a file or stdin
    Run(RunArgs),
    /// List the built-in handlers
    Handlers,
}

#[derive(Args)]
struct RunArgs {
    /// Concurrency policy: elementwise, chunkwise or concurrent
    #[arg(long)]
    policy: Option<RunPolicy>,
    /// Partition size; 0 or a negative value disables partitioning
    #[arg(long, allow_negative_numbers = true)]
    chunk_size: Option<i64>,
    /// Registered handler name
    #[arg(long)]
    handler: Option<String>,
    /// Extra argument passed to every call (JSON, or a bare string)
    #[arg(long = "arg", value_name = "JSON")]
    args: Vec<String>,
    /// JSON file holding the collection (defaults to stdin)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,
}

fn init_tracing(config_filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(config_filter.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

/// Bare words are accepted as strings so `--arg '#'` needs no quoting.
fn parse_extra_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn read_collection(input: Option<&PathBuf>) -> Result<Vec<Value>> {
    let raw = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("failed to read stdin")?,
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(&raw).context("input is not valid JSON")? {
        Value::Array(items) => Ok(items),
        // An absent collection behaves like an empty one.
        Value::Null => Ok(Vec::new()),
        other => bail!("input must be a JSON array, got {}", json_kind(&other)),
    }
}

async fn run(registry: &HandlerRegistry, config: Option<&FanoutConfig>, args: RunArgs) -> Result<()> {
    let defaults = RunSettings::resolve(config);
    let policy = args.policy.unwrap_or(defaults.policy);
    let chunk_size = args.chunk_size.map_or(defaults.chunk_size, ChunkSize::new);
    let extra: ExtraArgs = args
        .args
        .iter()
        .map(String::as_str)
        .map(parse_extra_arg)
        .collect();

    let mut request = RunRequest::new(policy).chunk_size(chunk_size).extra(extra);
    if let Some(name) = args.handler {
        request = request.handler(name);
    }

    let collection = read_collection(args.input.as_ref())?;
    let results = Runner::new()
        .run(registry, &request, &collection)
        .await
        .context("run aborted before dispatch")?;

    let output = match results {
        Some(values) => Value::Array(values),
        None => Value::Null,
    };
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

fn list_handlers(registry: &HandlerRegistry) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for name in registry.names() {
        writeln!(stdout, "{name}")?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_error) = match FanoutConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (None, Some(err)),
    };
    init_tracing(config.as_ref().and_then(FanoutConfig::log_filter));
    if let Some(err) = config_error {
        tracing::warn!(path = %err.path().display(), "Ignoring config: {err}");
    }

    let registry = HandlerRegistry::with_builtins()?;

    match cli.command {
        Commands::Run(args) => run(&registry, config.as_ref(), args).await,
        Commands::Handlers => list_handlers(&registry),
    }
}
