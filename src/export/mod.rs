//! Serialization and delivery of transaction history exports.

mod csv;
mod driver;
mod sink;
mod structured;

pub use csv::to_delimited_text;
pub use driver::{
    ALL_TRANSACTIONS_LABEL, ExportDriver, ExportError, ExportFormat, ExportTarget, TargetState,
};
pub use sink::{DirectorySink, FileSink};
pub use structured::to_structured_text;
