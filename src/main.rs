use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::info;

use descval::app::{App, RatingSession};
use descval::config::Config;
use descval::dataset::Variant;
use descval::headless::{self, HeadlessResultKind};
use descval::sink::CsvFileSink;
use descval::{init, logging};

#[derive(Parser, Debug)]
#[command(name = "descval")]
#[command(about = "TUI for rating generated descriptions against real ones")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// CSV dataset to load on startup
    input: Option<PathBuf>,

    /// Rating workflow
    #[arg(short, long, value_enum, default_value = "absolute")]
    mode: Variant,

    /// Result CSV path (default: output dir from config + per-mode file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// RNG seed for reproducible presentation order
    #[arg(long)]
    seed: Option<u64>,

    /// Read choices from stdin line by line and print a JSON summary (requires INPUT)
    #[arg(long, default_value = "false", requires = "input")]
    headless: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, default_value = "false")]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(Command::Init { force }) = args.command {
        return init::run_init(force);
    }

    let config = Config::load()?;
    logging::init();

    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path(args.mode));
    info!(mode = args.mode.cli_name(), seed, output = %output.display(), "starting session");

    let session: RatingSession = RatingSession::new(
        args.mode,
        ChaCha8Rng::seed_from_u64(seed),
        CsvFileSink::new(output),
    );

    if args.headless {
        return run_headless(session, &args, &config);
    }

    let mut app = App::new(session, config);
    if let Some(path) = &args.input {
        app.upload_path(path);
    }
    app.run()
}

fn run_headless(mut session: RatingSession, args: &Args, config: &Config) -> Result<()> {
    let input = args
        .input
        .as_deref()
        .context("--headless requires an input CSV")?;
    session.upload_file(input)?;

    let stdin = std::io::stdin();
    let mut stderr = std::io::stderr();
    let output = headless::run_headless(
        &mut session,
        stdin.lock(),
        &mut stderr,
        &config.keybindings,
    )?;
    headless::write_json_stdout(&output)?;

    if output.result == HeadlessResultKind::Incomplete {
        std::process::exit(1);
    }
    Ok(())
}
