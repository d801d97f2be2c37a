//! Head registry CLI commands

use clap::Subcommand;

use crate::error::HisabResult;
use crate::services::{HeadKind, HeadService};
use crate::storage::Storage;

/// Head registry subcommands
#[derive(Subcommand)]
pub enum HeadCommands {
    /// Add a main head
    AddMain {
        /// Head label
        label: String,
    },
    /// Add a sub head
    AddSub {
        /// Head label
        label: String,
    },
    /// List registered heads
    List,
}

/// Handle a head command
pub fn handle_head_command(storage: &Storage, cmd: HeadCommands) -> HisabResult<()> {
    let service = HeadService::new(storage);

    match cmd {
        HeadCommands::AddMain { label } => {
            let added = service.add(HeadKind::Main, &label)?;
            storage.heads.save()?;
            println!("Added main head: {}", added);
        }

        HeadCommands::AddSub { label } => {
            let added = service.add(HeadKind::Sub, &label)?;
            storage.heads.save()?;
            println!("Added sub head: {}", added);
        }

        HeadCommands::List => {
            let main_heads = service.list(HeadKind::Main)?;
            let sub_heads = service.list(HeadKind::Sub)?;

            println!("Main heads:");
            if main_heads.is_empty() {
                println!("  (none)");
            }
            for head in main_heads {
                println!("  {}", head);
            }

            println!("Sub heads:");
            if sub_heads.is_empty() {
                println!("  (none)");
            }
            for head in sub_heads {
                println!("  {}", head);
            }
        }
    }

    Ok(())
}
