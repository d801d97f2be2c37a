//! Entry CLI commands
//!
//! Implements CLI commands for diary entry management.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::display::{format_entry_details, format_entry_register, format_stats};
use crate::error::{HisabError, HisabResult};
use crate::models::{EntryId, Money, SyncRemark, DATE_FORMAT};
use crate::services::{
    CreateEntryInput, EntryFilter, EntryKind, EntryService, UpdateEntryInput,
};
use crate::storage::Storage;

/// Entry subcommands
#[derive(Subcommand)]
pub enum EntryCommands {
    /// Add a new entry
    Add {
        /// Amount (e.g. "-50.00" for expense, "50000" for income)
        amount: String,
        /// Main head
        #[arg(short, long)]
        main: String,
        /// Sub head
        #[arg(short, long)]
        sub: Option<String>,
        /// Entry date (DD-MM-YYYY), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },
    /// List entries
    List {
        /// Filter by main head
        #[arg(short, long)]
        main: Option<String>,
        /// Filter by sub head
        #[arg(short, long)]
        sub: Option<String>,
        /// Filter by kind (income, expense)
        #[arg(short, long)]
        kind: Option<String>,
        /// Start date (DD-MM-YYYY)
        #[arg(long)]
        from: Option<String>,
        /// End date (DD-MM-YYYY)
        #[arg(long)]
        to: Option<String>,
        /// Filter by sync remark (new, edited, synced, deleted)
        #[arg(long)]
        remark: Option<String>,
        /// Include soft-deleted entries
        #[arg(long)]
        include_deleted: bool,
    },
    /// Show entry details
    Show {
        /// Entry id
        id: String,
    },
    /// Edit an entry
    Edit {
        /// Entry id
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New main head
        #[arg(short, long)]
        main: Option<String>,
        /// New sub head
        #[arg(short, long)]
        sub: Option<String>,
        /// New date (DD-MM-YYYY)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },
    /// Soft-delete an entry (kept in storage until purged)
    Delete {
        /// Entry id
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Permanently remove entries
    Purge {
        /// Entry ids
        ids: Vec<String>,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Show ledger statistics
    Stats,
    /// Wipe every entry from storage
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a DD-MM-YYYY date argument
pub fn parse_date(s: &str) -> HisabResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| {
        HisabError::Validation(format!("Invalid date format: '{}'. Use DD-MM-YYYY", s))
    })
}

/// Parse an amount argument
pub fn parse_amount(s: &str) -> HisabResult<Money> {
    Money::parse(s).map_err(|e| HisabError::Validation(e.to_string()))
}

fn parse_remark(s: &str) -> HisabResult<SyncRemark> {
    match s.to_lowercase().as_str() {
        "new" => Ok(SyncRemark::New),
        "edited" => Ok(SyncRemark::Edited),
        "synced" => Ok(SyncRemark::Synced),
        "deleted" => Ok(SyncRemark::Deleted),
        other => Err(HisabError::Validation(format!(
            "Unknown remark: '{}'. Use new, edited, synced or deleted",
            other
        ))),
    }
}

/// Handle an entry command
pub fn handle_entry_command(storage: &Storage, cmd: EntryCommands) -> HisabResult<()> {
    let service = EntryService::new(storage);

    match cmd {
        EntryCommands::Add {
            amount,
            main,
            sub,
            date,
            description,
        } => {
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(s) => parse_date(&s)?,
                None => chrono::Local::now().date_naive(),
            };

            let entry = service.create(CreateEntryInput {
                date,
                description,
                amount,
                main_head: main,
                sub_head: sub,
            })?;
            storage.entries.save()?;

            println!("Added entry: {}", entry.id);
            println!("  Date:   {}", entry.date_display());
            println!("  Head:   {} / {}", entry.main_head, entry.sub_head);
            println!("  Amount: {}", entry.amount);
        }

        EntryCommands::List {
            main,
            sub,
            kind,
            from,
            to,
            remark,
            include_deleted,
        } => {
            let mut filter = EntryFilter::new();
            if let Some(main) = main {
                filter = filter.main_head(main);
            }
            if let Some(sub) = sub {
                filter = filter.sub_head(sub);
            }
            if let Some(kind) = kind {
                filter = filter.kind(kind.parse::<EntryKind>()?);
            }
            if let Some(from) = from {
                filter.from = Some(parse_date(&from)?);
            }
            if let Some(to) = to {
                filter.to = Some(parse_date(&to)?);
            }
            if let Some(remark) = remark {
                filter = filter.remark(parse_remark(&remark)?);
            }
            if include_deleted {
                filter = filter.include_deleted();
            }

            let entries = service.filter(&filter)?;
            print!("{}", format_entry_register(&entries));
        }

        EntryCommands::Show { id } => {
            let entry = service
                .find(&id)?
                .ok_or_else(|| HisabError::entry_not_found(&id))?;
            print!("{}", format_entry_details(&entry));
        }

        EntryCommands::Edit {
            id,
            amount,
            main,
            sub,
            date,
            description,
        } => {
            let entry = service
                .find(&id)?
                .ok_or_else(|| HisabError::entry_not_found(&id))?;

            let changes = UpdateEntryInput {
                date: date.as_deref().map(parse_date).transpose()?,
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                main_head: main,
                sub_head: sub,
            };

            let updated = service.update(&entry.id, changes)?;
            storage.entries.save()?;

            println!("Updated entry: {}", updated.id);
            println!("  Date:   {}", updated.date_display());
            println!("  Head:   {} / {}", updated.main_head, updated.sub_head);
            println!("  Amount: {}", updated.amount);
        }

        EntryCommands::Delete { id, force } => {
            let entry = service
                .find(&id)?
                .ok_or_else(|| HisabError::entry_not_found(&id))?;

            if !force {
                println!("About to soft-delete entry:");
                println!("  Date:   {}", entry.date_display());
                println!("  Head:   {} / {}", entry.main_head, entry.sub_head);
                println!("  Amount: {}", entry.amount);
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.soft_delete(&entry.id)?;
            storage.entries.save()?;
            println!(
                "Deleted entry {} (still stored; purge to remove permanently)",
                deleted.id
            );
        }

        EntryCommands::Purge { ids, force } => {
            if ids.is_empty() {
                return Err(HisabError::Validation("No entry ids given".into()));
            }

            if !force {
                println!("About to permanently remove {} entr(y/ies).", ids.len());
                println!("This cannot be undone. Use --force to confirm.");
                return Ok(());
            }

            let ids: Vec<EntryId> = ids.iter().map(|id| EntryId::from(id.as_str())).collect();
            let results = service.purge_many(&ids)?;
            storage.entries.save()?;

            for result in &results {
                if result.removed {
                    println!("Purged {}", result.id);
                } else {
                    println!("Not found: {}", result.id);
                }
            }
        }

        EntryCommands::Stats => {
            let stats = service.stats()?;
            print!("{}", format_stats(&stats));
        }

        EntryCommands::Clear { force } => {
            let total = storage.entries.count()?;
            if !force {
                println!("About to wipe {} stored entr(y/ies).", total);
                println!("This cannot be undone. Use --force to confirm.");
                return Ok(());
            }

            service.clear_all()?;
            storage.entries.save()?;
            println!("Cleared {} entr(y/ies)", total);
        }
    }

    Ok(())
}
