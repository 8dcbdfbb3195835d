//! Spreadsheet ingestion pipeline
//!
//! Raw rows flow through the row processor, which normalizes cells, checks
//! carriers against the reference tables, and derives each trip's status.

pub mod excel;
mod cell;
mod normalize;
mod processor;
mod row;
mod status;

pub use cell::*;
pub use normalize::*;
pub use processor::*;
pub use row::*;
pub use status::*;
