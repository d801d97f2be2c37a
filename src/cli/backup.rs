//! CSV export/import CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{HisabError, HisabResult};
use crate::export::{export_entries_csv, import_entries_csv, timestamped_export_name};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Export entries to a CSV file
    Export {
        /// Output file (defaults to a timestamped name in the export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Include soft-deleted entries
        #[arg(long)]
        include_deleted: bool,
    },
    /// Import entries from a CSV file
    Import {
        /// Input CSV file
        file: PathBuf,
        /// Confirm importing into a non-empty store (matching ids are overwritten)
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(storage: &Storage, cmd: BackupCommands) -> HisabResult<()> {
    match cmd {
        BackupCommands::Export {
            output,
            include_deleted,
        } => {
            let path = output
                .unwrap_or_else(|| storage.paths().export_dir().join(timestamped_export_name()));

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| HisabError::Export(e.to_string()))?;
            }
            let file = File::create(&path).map_err(|e| HisabError::Export(e.to_string()))?;
            let mut writer = BufWriter::new(file);

            let count = export_entries_csv(storage, &mut writer, include_deleted)?;
            println!("Exported {} entr(y/ies) to {}", count, path.display());
        }

        BackupCommands::Import { file, force } => {
            let existing = storage.entries.count()?;
            if existing > 0 && !force {
                println!(
                    "Store already holds {} entr(y/ies); rows with matching ids will be overwritten.",
                    existing
                );
                println!("Use --force to confirm the import");
                return Ok(());
            }

            let reader = File::open(&file).map_err(|e| {
                HisabError::Import(format!("Failed to open {}: {}", file.display(), e))
            })?;

            let summary = import_entries_csv(storage, reader)?;
            storage.entries.save()?;
            println!(
                "Imported {} entr(y/ies), skipped {} row(s)",
                summary.imported, summary.skipped
            );
        }
    }

    Ok(())
}
