//! Domain records emitted by the pipeline

mod dashboard;
mod vehicle;

pub use dashboard::*;
pub use vehicle::*;
