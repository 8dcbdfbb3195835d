//! Workbook decoding

mod reader;

pub use reader::{DecodedSheet, WorkbookError, decode_workbook};
