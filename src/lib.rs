pub mod auth;
pub mod config;
pub mod output;
pub mod profile;
pub mod scoring;
pub mod store;

pub use profile::{DemoPreset, Profile, ProfileInput};
pub use scoring::{compute_risk, RiskLevel, RiskResult};
pub use store::{KeyValueStore, ReportStore, StoredReport};
