//! truelist: email validation from your terminal
//!
//! Usage:
//!   truelist validate user@example.com          Validate a single address
//!   truelist validate --file emails.csv         Validate a CSV column, write <name>_validated.csv
//!   cat emails.txt | truelist validate          Validate one address per stdin line
//!   truelist whoami                             Show account details
//!   truelist config set api-key <key>           Persist the API key

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use futures::{future, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use truelist::batch::{
    default_output_path, read_lines, BatchRunner, BatchStrategy, CsvBatch, ItemOutcome,
};
use truelist::client::DEFAULT_BASE_URL;
use truelist::config::ConfigStore;
use truelist::output::Printer;
use truelist::{TruelistClient, TruelistClientBuilder};

#[derive(Parser)]
#[command(
    name = "truelist",
    version,
    about = "Truelist CLI: email validation from your terminal",
    long_about = "Truelist CLI is the command-line tool for Truelist.io email validation.\n\n\
                  Validate single emails, bulk CSV files, or pipe from stdin.\n\
                  Get started by setting your API key:\n\n  \
                  truelist config set api-key YOUR_API_KEY"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// API base URL
    #[arg(long, env = "TRUELIST_API_URL", default_value = DEFAULT_BASE_URL, global = true, hide = true)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate one or more email addresses
    #[command(long_about = "Validate email addresses using the Truelist API.\n\n\
                            Single email:\n  truelist validate user@example.com\n\n\
                            CSV file:\n  truelist validate --file emails.csv\n\n\
                            Stdin (pipe):\n  cat emails.txt | truelist validate")]
    Validate(ValidateArgs),
    /// Display current account information
    Whoami,
    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print the CLI version
    Version,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Set a configuration value (supported keys: api-key)
    Set { key: String, value: String },
}

#[derive(Args)]
struct ValidateArgs {
    /// Email address to validate
    email: Option<String>,

    /// CSV file of emails to validate
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output file path (default: <input>_validated.csv)
    #[arg(short, long, requires = "file")]
    output: Option<PathBuf>,

    /// Name of the email column in the CSV
    #[arg(short, long, requires = "file")]
    column: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Output only the state (valid/invalid/risky/unknown)
    #[arg(short, long)]
    quiet: bool,

    /// Number of addresses validated at once in batch modes
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    match run(cli, &cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = Printer::for_stderr().error(&mut io::stderr(), format_args!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `TRUELIST_LOG` wins over `RUST_LOG`, both win over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = std::env::var("TRUELIST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli, cancel: &CancellationToken) -> anyhow::Result<()> {
    let Cli {
        api_url, command, ..
    } = cli;

    match command {
        Command::Validate(args) => validate(&api_url, args, cancel).await,
        Command::Whoami => {
            let client = build_client(&api_url)?;
            let info = client.whoami(cancel).await?;
            Printer::for_stdout().account_info(&mut io::stdout().lock(), &info)?;
            Ok(())
        }
        Command::Config(ConfigCommand::Set { key, value }) => {
            let store = ConfigStore::default_location()?;
            let mut cfg = store.load()?;
            cfg.set(&key, &value)?;
            store.save(&cfg)?;
            println!("API key saved to {}", store.path().display());
            Ok(())
        }
        Command::Version => {
            println!("truelist {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_client(api_url: &str) -> anyhow::Result<TruelistClient> {
    let api_key = ConfigStore::default_location()?.api_key()?;
    Ok(TruelistClientBuilder::new(api_key)
        .base_url(api_url)
        .build()?)
}

async fn validate(
    api_url: &str,
    args: ValidateArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    if args.file.is_some() {
        if args.json {
            bail!("--json flag is not supported with --file mode (CSV output is always used)");
        }
        if args.quiet {
            bail!("--quiet flag is not supported with --file mode (CSV output is always used)");
        }
    }

    let client = build_client(api_url)?;
    match (&args.file, &args.email) {
        (Some(file), _) => validate_file(client, file, &args, cancel).await,
        (None, Some(email)) => validate_single(&client, email, &args, cancel).await,
        (None, None) => validate_stdin(client, &args, cancel).await,
    }
}

async fn validate_single(
    client: &TruelistClient,
    email: &str,
    args: &ValidateArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let result = client.validate(cancel, email).await?;

    let printer = Printer::for_stdout();
    let mut out = io::stdout().lock();
    if args.json {
        printer.json(&mut out, &result)?;
    } else if args.quiet {
        printer.validation_quiet(&mut out, &result)?;
    } else {
        printer.validation_result(&mut out, &result)?;
    }
    Ok(())
}

async fn validate_stdin(
    client: TruelistClient,
    args: &ValidateArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    if io::stdin().is_terminal() {
        bail!("no email provided: pass an email as an argument, use --file, or pipe from stdin");
    }

    let runner =
        BatchRunner::new(client).with_strategy(BatchStrategy::from_concurrency(args.concurrency));
    tracing::debug!(strategy = ?runner.strategy(), "validating stdin");

    // A read error ends the input; what was read so far is still reported.
    let read_error = RefCell::new(None);
    let input = read_lines(BufReader::new(tokio::io::stdin())).scan(&read_error, |slot, line| {
        future::ready(match line {
            Ok(line) => Some(Ok::<_, io::Error>(line)),
            Err(e) => {
                *slot.borrow_mut() = Some(e);
                None
            }
        })
    });

    let printer = Printer::for_stdout();
    let warnings = Printer::for_stderr();
    let mut stdout = io::stdout();
    let mut collected = Vec::new();

    let report = runner
        .run_stream(input, cancel, |_, outcome| {
            match outcome {
                ItemOutcome::Validated(result) if args.json => collected.push(result.clone()),
                ItemOutcome::Validated(result) if args.quiet => {
                    printer.validation_quiet(&mut stdout, result)?
                }
                ItemOutcome::Validated(result) => {
                    printer.validation_result(&mut stdout, result)?;
                    writeln!(stdout)?;
                }
                ItemOutcome::Failed { email, error } => warnings.warning(
                    &mut io::stderr(),
                    format_args!("failed to validate {}: {}", email, error),
                )?,
                ItemOutcome::Skipped => {}
            }
            Ok(())
        })
        .await?;

    if args.json {
        printer.json(&mut stdout, &collected)?;
    } else if !args.quiet {
        printer.summary(&mut stdout, &report.outcome)?;
    }
    stdout.flush()?;

    if let Some(e) = read_error.into_inner() {
        return Err(anyhow::Error::new(e).context("error reading stdin"));
    }
    if report.cancelled {
        bail!("validation interrupted");
    }
    Ok(())
}

async fn validate_file(
    client: TruelistClient,
    file: &Path,
    args: &ValidateArgs,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let input =
        File::open(file).with_context(|| format!("could not open file {}", file.display()))?;
    let batch = CsvBatch::read(input, args.column.as_deref())?;

    let out_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(file));
    let out_file = File::create(&out_path)
        .with_context(|| format!("could not create output file {}", out_path.display()))?;

    let runner =
        BatchRunner::new(client).with_strategy(BatchStrategy::from_concurrency(args.concurrency));
    tracing::debug!(strategy = ?runner.strategy(), rows = batch.len(), "validating CSV file");
    let bar = ProgressBar::new(batch.len() as u64).with_style(ProgressStyle::with_template(
        "Validating [{bar:40}] {pos}/{len} ({eta})",
    )?);
    let warnings = Printer::for_stderr();

    let report = batch
        .process(&runner, BufWriter::new(out_file), cancel, |_, outcome| {
            if let ItemOutcome::Failed { email, error } = outcome {
                bar.suspend(|| {
                    let _ = warnings.warning(
                        &mut io::stderr(),
                        format_args!("failed to validate {}: {}", email, error),
                    );
                });
            }
            bar.inc(1);
        })
        .await
        .with_context(|| format!("failed to write CSV output {}", out_path.display()))?;
    bar.finish_and_clear();

    eprintln!("\nResults written to {}", out_path.display());
    warnings.summary(&mut io::stderr(), &report.outcome)?;

    if report.cancelled {
        bail!("validation interrupted; {} contains only the rows processed so far", out_path.display());
    }
    Ok(())
}
