mod config;
mod logging;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use config::{Config, ExtractionSetting};

#[derive(Parser)]
#[command(
    name = "docfence",
    version,
    about = "Check that labeled fenced blocks in Markdown documents still parse"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log extraction and validation events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check documents (files or directories of .md files)
    Check(CheckArgs),

    /// Print the blocks that would be checked in a document
    Blocks(BlocksArgs),
}

#[derive(clap::Args)]
struct Selection {
    /// Fence label to check [default: yaml]
    #[arg(short, long)]
    label: Option<String>,

    /// Locate blocks with CommonMark fence rules instead of the literal scan
    #[arg(long)]
    commonmark: bool,

    /// Config file [default: ./docfence.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Documents or directories; falls back to `documents` from the config
    paths: Vec<PathBuf>,

    #[command(flatten)]
    selection: Selection,
}

#[derive(clap::Args)]
struct BlocksArgs {
    /// Markdown document to inspect
    file: PathBuf,

    #[command(flatten)]
    selection: Selection,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose) {
        eprintln!("warning: cannot initialize logging: {}", e);
    }

    let exit_code = match cli.command {
        Command::Check(args) => do_check(args, cli.no_color),
        Command::Blocks(args) => do_blocks(args),
    };
    process::exit(exit_code);
}

/// Load the config file, then let command-line flags override it.
fn resolve_config(selection: &Selection) -> Config {
    let mut config = match Config::discover(selection.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    if let Some(label) = &selection.label {
        config.label = label.clone();
    }
    if selection.commonmark {
        config.extraction = ExtractionSetting::CommonMark;
    }
    tracing::debug!(?config, "resolved configuration");
    config
}

fn do_check(args: CheckArgs, no_color: bool) -> i32 {
    let config = resolve_config(&args.selection);
    let targets = if args.paths.is_empty() {
        config.documents.clone()
    } else {
        args.paths
    };
    if targets.is_empty() {
        eprintln!("error: no documents given and none configured");
        return 1;
    }
    runner::run_checks(&config.checker(), &targets, &config.exclude, no_color)
}

fn do_blocks(args: BlocksArgs) -> i32 {
    let config = resolve_config(&args.selection);
    runner::print_blocks(&config.checker(), &args.file)
}
