//! Google Drive sync CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::error::HisabResult;
use crate::export::entries_csv_string;
use crate::models::EntryId;
use crate::services::SyncService;
use crate::storage::Storage;
use crate::sync::DriveClient;

/// Drive subcommands
#[derive(Subcommand)]
pub enum DriveCommands {
    /// Store Drive credentials (client id, client secret, folder id)
    Configure {
        /// OAuth client id
        client_id: String,
        /// OAuth client secret
        client_secret: String,
        /// Target Drive folder id
        folder_id: String,
    },
    /// Run the interactive consent flow and cache an access token
    Connect,
    /// Upload a CSV snapshot of the ledger to the configured folder
    Push,
    /// Show sync configuration state and last-backup details
    Status,
}

/// Handle a drive command
pub fn handle_drive_command(
    storage: &Storage,
    settings: &Settings,
    cmd: DriveCommands,
) -> HisabResult<()> {
    let client = DriveClient::new(storage);

    match cmd {
        DriveCommands::Configure {
            client_id,
            client_secret,
            folder_id,
        } => {
            client.configure(&client_id, &client_secret, &folder_id)?;
            println!("Drive configuration saved ({})", client.state()?);
            println!("Run `hisab drive connect` to authorize.");
        }

        DriveCommands::Connect => {
            let session = client.begin_connect()?;
            println!("Open this URL in your browser to authorize hisab:");
            println!();
            println!("  {}", session.auth_url);
            println!();
            println!("Waiting for the consent redirect (2 minute limit)...");

            client.finish_connect(session)?;
            println!("Connected. Access token cached ({})", client.state()?);
        }

        DriveCommands::Push => {
            let (csv_text, count) = entries_csv_string(storage)?;
            let file_name = settings.backup_file_name.as_str();

            let outcome = client.push(file_name, &csv_text)?;
            if outcome.success {
                println!("{}", outcome.message);

                // Local bookkeeping only after the remote acknowledged
                let sync_service = SyncService::new(storage);
                let pending: Vec<EntryId> = sync_service
                    .pending()?
                    .into_iter()
                    .map(|entry| entry.id)
                    .collect();
                let report = sync_service.mark_synced(&pending)?;
                sync_service.record_backup(file_name, count)?;
                storage.entries.save()?;
                storage.sync_meta.save()?;

                println!(
                    "Marked {} entr(y/ies) synced ({} already synced)",
                    report.updated.len(),
                    report.already_synced.len()
                );
            } else {
                // Failed push leaves local state untouched
                eprintln!("Push failed: {}", outcome.message);
            }
        }

        DriveCommands::Status => {
            println!("Drive state: {}", client.state()?);

            let meta = SyncService::new(storage).meta()?;
            match meta.last_backup_at {
                Some(at) => {
                    println!(
                        "Last backup: {} ({} entries, {})",
                        at.format("%Y-%m-%d %H:%M:%S UTC"),
                        meta.last_backup_entries,
                        meta.last_backup_file.as_deref().unwrap_or("unknown file")
                    );
                }
                None => println!("Last backup: never"),
            }

            let pending = SyncService::new(storage).pending()?;
            println!("Pending sync: {} entr(y/ies)", pending.len());
        }
    }

    Ok(())
}
