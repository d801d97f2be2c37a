//! CSV export/import for the entry collection

pub mod csv;

pub use csv::{
    entries_csv_string, export_entries_csv, import_entries_csv, timestamped_export_name,
    ImportSummary, CSV_HEADER,
};
