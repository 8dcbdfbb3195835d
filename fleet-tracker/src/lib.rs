//! Freight trip spreadsheet ingestion.
//!
//! Fetches the operations team's trip workbook, reads its first sheet and
//! normalizes each row into a [`model::Vehicle`] with a derived status.
//! Rows that cannot be used are skipped with a diagnostic; the batch never
//! aborts on a single row.

pub mod cli;
pub mod config;
pub mod ingest;
pub mod model;
pub mod output;
pub mod reference;
pub mod source;
