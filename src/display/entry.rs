//! Entry display formatting
//!
//! Formats entries for terminal output: a register view and a detail view,
//! with sync-status glyphs.

use crate::models::{Entry, SyncRemark};

/// Format a single entry for display (register row)
pub fn format_entry_row(entry: &Entry) -> String {
    let remark_icon = match entry.remark {
        SyncRemark::New => "+",
        SyncRemark::Edited => "~",
        SyncRemark::Synced => "✓",
        SyncRemark::Deleted => "x",
    };

    let heads = if entry.sub_head.is_empty() {
        entry.main_head.clone()
    } else {
        format!("{}/{}", entry.main_head, entry.sub_head)
    };

    format!(
        "{} {} {:24} {:>12}  {}",
        remark_icon,
        entry.date_display(),
        truncate(&heads, 24),
        entry.amount.to_string(),
        truncate(&entry.description, 28)
    )
}

/// Format a list of entries as a register
pub fn format_entry_register(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "No entries found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:1} {:10} {:24} {:>12}  {}\n",
        "S", "Date", "Head", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(64));
    output.push('\n');

    for entry in entries {
        output.push_str(&format_entry_row(entry));
        output.push('\n');
    }

    output
}

/// Format full details of one entry
pub fn format_entry_details(entry: &Entry) -> String {
    let mut output = String::new();
    output.push_str(&format!("Id:          {}\n", entry.id));
    output.push_str(&format!("Date:        {}\n", entry.date_display()));
    output.push_str(&format!("Main head:   {}\n", entry.main_head));
    if !entry.sub_head.is_empty() {
        output.push_str(&format!("Sub head:    {}\n", entry.sub_head));
    }
    output.push_str(&format!("Amount:      {}\n", entry.amount));
    if !entry.description.is_empty() {
        output.push_str(&format!("Description: {}\n", entry.description));
    }
    output.push_str(&format!(
        "Sync:        {} (pushed at least once: {})\n",
        entry.remark,
        if entry.synced { "yes" } else { "no" }
    ));
    output.push_str(&format!(
        "Created:     {}\n",
        entry.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!(
        "Updated:     {}\n",
        entry.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output
}

/// Truncate a string with an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn test_entry() -> Entry {
        Entry::new(
            0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            "Salary",
            Money::from_units(50000),
            "Income",
            "Job",
        )
    }

    #[test]
    fn test_row_contains_fields() {
        let row = format_entry_row(&test_entry());
        assert!(row.starts_with("+ 01-01-2025"));
        assert!(row.contains("Income/Job"));
        assert!(row.contains("50000.00"));
        assert!(row.contains("Salary"));
    }

    #[test]
    fn test_register_empty() {
        assert_eq!(format_entry_register(&[]), "No entries found.\n");
    }

    #[test]
    fn test_details() {
        let mut entry = test_entry();
        entry.mark_synced();
        let details = format_entry_details(&entry);
        assert!(details.contains("Main head:   Income"));
        assert!(details.contains("synced (pushed at least once: yes)"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
