//! CSV bridge
//!
//! Serializes the entry collection to CSV and parses CSV back into entries.
//! Fields are quoted per RFC 4180 on export, so descriptions containing
//! commas survive a round-trip. Import is tolerant: the header row is
//! skipped, rows with an empty main category are counted and dropped, and
//! missing ids are regenerated.

use std::io::{Read, Write};

use chrono::NaiveDate;

use crate::error::{HisabError, HisabResult};
use crate::models::{Entry, EntryId, Money, SyncRemark, DATE_FORMAT};
use crate::services::{EntryFilter, EntryService};
use crate::storage::Storage;

/// CSV column header, fixed order
pub const CSV_HEADER: &str = "id,mainCategory,subCategory,date,description,amount";

/// Summary of a CSV import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows stored as entries
    pub imported: usize,
    /// Rows dropped (empty main category or unparseable fields)
    pub skipped: usize,
}

/// Export entries to CSV
///
/// Soft-deleted entries are excluded unless `include_deleted` is set.
pub fn export_entries_csv<W: Write>(
    storage: &Storage,
    writer: &mut W,
    include_deleted: bool,
) -> HisabResult<usize> {
    let service = EntryService::new(storage);
    let mut filter = EntryFilter::new();
    if include_deleted {
        filter = filter.include_deleted();
    }
    let entries = service.filter(&filter)?;

    writeln!(writer, "{}", CSV_HEADER)
        .map_err(|e| HisabError::Export(e.to_string()))?;

    for entry in &entries {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            escape_csv(entry.id.as_str()),
            escape_csv(&entry.main_head),
            escape_csv(&entry.sub_head),
            entry.date.format(DATE_FORMAT),
            escape_csv(&entry.description),
            entry.amount
        )
        .map_err(|e| HisabError::Export(e.to_string()))?;
    }

    Ok(entries.len())
}

/// Export the active entry collection to a CSV string
pub fn entries_csv_string(storage: &Storage) -> HisabResult<(String, usize)> {
    let mut buffer = Vec::new();
    let count = export_entries_csv(storage, &mut buffer, false)?;
    let text = String::from_utf8(buffer)
        .map_err(|e| HisabError::Export(format!("Invalid UTF-8 in export: {}", e)))?;
    Ok((text, count))
}

/// Import entries from CSV
///
/// Imported entries are stored with `synced = false` and remark `new`.
pub fn import_entries_csv<R: Read>(storage: &Storage, reader: R) -> HisabResult<ImportSummary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let mut summary = ImportSummary::default();
    let mut index = storage.entries.count()? as u32;

    for record in csv_reader.records() {
        let record = record.map_err(|e| HisabError::Import(format!("Bad CSV row: {}", e)))?;

        let main_head = record.get(1).unwrap_or("").trim();
        if main_head.is_empty() {
            summary.skipped += 1;
            continue;
        }

        let date = match record
            .get(3)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
        {
            Some(date) => date,
            None => {
                summary.skipped += 1;
                continue;
            }
        };

        let amount = match record.get(5).and_then(|s| Money::parse(s).ok()) {
            Some(amount) => amount,
            None => {
                summary.skipped += 1;
                continue;
            }
        };

        let mut entry = Entry::new(
            index,
            date,
            record.get(4).unwrap_or("").trim(),
            amount,
            main_head,
            record.get(2).unwrap_or("").trim(),
        );

        // Keep the original id when the row carries one
        let id_field = record.get(0).unwrap_or("").trim();
        if !id_field.is_empty() {
            entry.id = EntryId::from_string(id_field);
        }
        entry.synced = false;
        entry.remark = SyncRemark::New;

        storage.entries.put(entry)?;
        summary.imported += 1;
        index += 1;
    }

    Ok(summary)
}

/// Escape a string for CSV format (RFC 4180)
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Timestamped export file name, e.g. `hisab_export_20250101_093000.csv`
pub fn timestamped_export_name() -> String {
    format!(
        "hisab_export_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HisabPaths;
    use crate::services::CreateEntryInput;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HisabPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_entry(storage: &Storage, description: &str, cents: i64, main: &str, sub: &str) -> Entry {
        EntryService::new(storage)
            .create(CreateEntryInput {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                description: Some(description.to_string()),
                amount: Money::from_cents(cents),
                main_head: main.to_string(),
                sub_head: Some(sub.to_string()),
            })
            .unwrap()
    }

    #[test]
    fn test_export_header_and_rows() {
        let (_temp, storage) = create_test_storage();
        add_entry(&storage, "Salary", 5_000_000, "Income", "Job");

        let mut output = Vec::new();
        let count = export_entries_csv(&storage, &mut output, false).unwrap();
        assert_eq!(count, 1);

        let text = String::from_utf8(output).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), CSV_HEADER);
        let row = lines.next().unwrap();
        assert!(row.contains("Income,Job,01-01-2025,Salary,50000.00"));
    }

    #[test]
    fn test_export_excludes_deleted_by_default() {
        let (_temp, storage) = create_test_storage();
        let entry = add_entry(&storage, "gone", -100, "Food", "");
        EntryService::new(&storage).soft_delete(&entry.id).unwrap();

        let (text, count) = entries_csv_string(&storage).unwrap();
        assert_eq!(count, 0);
        assert!(!text.contains("gone"));

        let mut output = Vec::new();
        let count = export_entries_csv(&storage, &mut output, true).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let (_temp, storage) = create_test_storage();
        let a = add_entry(&storage, "Salary", 5_000_000, "Income", "Job");
        let b = add_entry(&storage, "Veg", -4550, "Food", "Groceries");

        let (text, _) = entries_csv_string(&storage).unwrap();

        let (_temp2, fresh) = create_test_storage();
        let summary = import_entries_csv(&fresh, text.as_bytes()).unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 0);

        for original in [a, b] {
            let imported = fresh.entries.get(&original.id).unwrap().unwrap();
            assert_eq!(imported.id, original.id);
            assert_eq!(imported.main_head, original.main_head);
            assert_eq!(imported.sub_head, original.sub_head);
            assert_eq!(imported.date, original.date);
            assert_eq!(imported.amount, original.amount);
            assert_eq!(imported.description, original.description);
            // Imported entries always start unsynced
            assert!(!imported.synced);
            assert_eq!(imported.remark, SyncRemark::New);
        }
    }

    #[test]
    fn test_roundtrip_with_commas_in_description() {
        let (_temp, storage) = create_test_storage();
        let entry = add_entry(&storage, "rice, dal, and oil", -2000, "Food", "Groceries");

        let (text, _) = entries_csv_string(&storage).unwrap();
        assert!(text.contains("\"rice, dal, and oil\""));

        let (_temp2, fresh) = create_test_storage();
        import_entries_csv(&fresh, text.as_bytes()).unwrap();
        let imported = fresh.entries.get(&entry.id).unwrap().unwrap();
        assert_eq!(imported.description, "rice, dal, and oil");
    }

    #[test]
    fn test_import_skips_rows_without_main_category() {
        let (_temp, storage) = create_test_storage();
        let csv_text = format!(
            "{}\nid-1,Income,Job,01-01-2025,Salary,50000.00\nid-2,,Job,01-01-2025,Orphan,10.00\n",
            CSV_HEADER
        );

        let summary = import_entries_csv(&storage, csv_text.as_bytes()).unwrap();
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.skipped, 1);
        assert!(storage.entries.get(&EntryId::from("id-2")).unwrap().is_none());
    }

    #[test]
    fn test_import_regenerates_missing_id() {
        let (_temp, storage) = create_test_storage();
        let csv_text = format!("{}\n,Income,Job,01-01-2025,Salary,50000.00\n", CSV_HEADER);

        let summary = import_entries_csv(&storage, csv_text.as_bytes()).unwrap();
        assert_eq!(summary.imported, 1);

        let entries = storage.entries.get_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].id.as_str().is_empty());
    }

    #[test]
    fn test_import_skips_bad_amount_and_date() {
        let (_temp, storage) = create_test_storage();
        let csv_text = format!(
            "{}\nid-1,Income,Job,2025-01-01,wrong date order,50.00\nid-2,Income,Job,01-01-2025,bad amount,abc\n",
            CSV_HEADER
        );

        let summary = import_entries_csv(&storage, csv_text.as_bytes()).unwrap();
        assert_eq!(summary.imported, 0);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
