pub mod file;
pub mod kv;
pub mod reports;
pub mod types;

pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use reports::{ReportStore, MAX_REPORTS, REPORTS_KEY};
pub use types::{StoredReport, Trend};
