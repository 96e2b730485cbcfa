use clap::{ArgAction, Parser};
use rsbackup::backup::backup_config::{config_base_dir, BackupConfig, DEFAULT_CONFIG_PATH};
use rsbackup::backup::options::RunOptions;
use rsbackup::backup::result_error::result::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::exit;
use tracing::error;

/// Backup tool: runs the rsync jobs listed in a YAML config
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Location of config file
    #[arg(default_value = DEFAULT_CONFIG_PATH)]
    config_path: PathBuf,
    /// Transfer files instead of doing a dry run
    #[arg(long)]
    force: bool,
    /// Increases log verbosity for each occurrence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args, options: &RunOptions) -> Result<()> {
    let config = BackupConfig::load(&args.config_path)?;
    let base_dir = config_base_dir(&args.config_path)?;
    config.run(base_dir, options, &mut std::io::stdout().lock())
}

fn main() {
    let args = Args::parse();
    let options = RunOptions::builder()
        .force(args.force)
        .verbosity(args.verbose)
        .build();

    tracing_subscriber::fmt()
        .with_max_level(options.log_level())
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    if let Err(e) = run(&args, &options) {
        error!("{e}");
        exit(1);
    }
}
