//! Ledger statistics display formatting

use crate::services::LedgerStats;

/// Format the stats summary for the terminal
pub fn format_stats(stats: &LedgerStats) -> String {
    let mut output = String::new();
    output.push_str("Ledger summary\n");
    output.push_str(&"-".repeat(32));
    output.push('\n');
    output.push_str(&format!("Entries:       {}\n", stats.total_entries));
    output.push_str(&format!("  active:      {}\n", stats.active_entries));
    output.push_str(&format!("  deleted:     {}\n", stats.deleted_entries));
    output.push_str(&format!("Pending sync:  {}\n", stats.pending_sync));
    output.push_str(&format!("Total income:  {}\n", stats.total_income));
    output.push_str(&format!("Total expense: {}\n", stats.total_expense));

    if !stats.by_main_head.is_empty() {
        output.push_str("\nBy main head:\n");
        let mut heads: Vec<_> = stats.by_main_head.iter().collect();
        heads.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (head, count) in heads {
            output.push_str(&format!("  {:20} {}\n", head, count));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_format_stats() {
        let mut stats = LedgerStats {
            total_entries: 3,
            active_entries: 2,
            deleted_entries: 1,
            pending_sync: 2,
            total_income: Money::from_units(50000),
            total_expense: Money::from_cents(5000),
            ..Default::default()
        };
        stats.by_main_head.insert("Income".to_string(), 1);
        stats.by_main_head.insert("Food".to_string(), 1);

        let text = format_stats(&stats);
        assert!(text.contains("Total income:  50000.00"));
        assert!(text.contains("Total expense: 50.00"));
        assert!(text.contains("Pending sync:  2"));
        assert!(text.contains("Food"));
    }
}
