use anyhow::Result;
use clap::{Parser, Subcommand};

use hisab::cli::{
    handle_backup_command, handle_drive_command, handle_entry_command, handle_head_command,
    BackupCommands, DriveCommands, EntryCommands, HeadCommands,
};
use hisab::config::{paths::HisabPaths, Settings};
use hisab::storage::Storage;

#[derive(Parser)]
#[command(
    name = "hisab",
    version,
    about = "Command-line personal accounts diary",
    long_about = "hisab is a personal accounts diary for the terminal. It keeps a \
                  local ledger of income and expense entries under your own main/sub \
                  heads, exports CSV backups, and can push snapshots to a Google \
                  Drive folder."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Entry management commands
    #[command(subcommand, alias = "e")]
    Entry(EntryCommands),

    /// Category head registry commands
    #[command(subcommand, alias = "head")]
    Heads(HeadCommands),

    /// CSV export/import commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Google Drive sync commands
    #[command(subcommand)]
    Drive(DriveCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = HisabPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let mut storage = Storage::new(paths)?;
    storage.load_all()?;

    match cli.command {
        Commands::Entry(cmd) => handle_entry_command(&storage, cmd)?,
        Commands::Heads(cmd) => handle_head_command(&storage, cmd)?,
        Commands::Backup(cmd) => handle_backup_command(&storage, cmd)?,
        Commands::Drive(cmd) => handle_drive_command(&storage, &settings, cmd)?,
        Commands::Config => {
            println!("Base directory: {}", storage.paths().base_dir().display());
            println!("Data directory: {}", storage.paths().data_dir().display());
            println!(
                "Export directory: {}",
                storage.paths().export_dir().display()
            );
            println!("Backup file name: {}", settings.backup_file_name);
        }
    }

    Ok(())
}
