use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::kv::KeyValueStore;
use super::types::{StoredReport, Trend};
use crate::profile::Profile;
use crate::scoring::RiskResult;

/// Key holding the report list.
pub const REPORTS_KEY: &str = "pcos_reports";

/// Maximum number of reports kept. Older ones are evicted on write.
pub const MAX_REPORTS: usize = 10;

/// Report history on top of a key-value store.
///
/// The list is stored newest first and rewritten as a whole on every change.
pub struct ReportStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ReportStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Save a result with a fresh id and the current time.
    pub fn append(&self, profile: Profile, result: RiskResult) -> Result<StoredReport> {
        let report = StoredReport {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            profile,
            result,
        };

        let mut reports = self.list()?;
        reports.insert(0, report.clone());
        if reports.len() > MAX_REPORTS {
            let evicted = reports.len() - MAX_REPORTS;
            reports.truncate(MAX_REPORTS);
            debug!(evicted, "dropped oldest reports");
        }
        self.write(&reports)?;

        info!(id = %report.id, level = %report.result.risk_level, "report saved");
        Ok(report)
    }

    /// Reports newest first, at most [`MAX_REPORTS`].
    pub fn list(&self) -> Result<Vec<StoredReport>> {
        match self.store.get(REPORTS_KEY)? {
            Some(json) => {
                let mut reports: Vec<StoredReport> =
                    serde_json::from_str(&json).context("Failed to parse stored reports")?;
                reports.truncate(MAX_REPORTS);
                Ok(reports)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Look up a report by full id or by id prefix.
    /// An ambiguous prefix matches nothing.
    pub fn get(&self, id: &str) -> Result<Option<StoredReport>> {
        let reports = self.list()?;
        if let Some(report) = reports.iter().find(|r| r.id == id) {
            return Ok(Some(report.clone()));
        }
        let mut matches = reports.into_iter().filter(|r| r.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(report), None) if !id.is_empty() => Ok(Some(report)),
            _ => Ok(None),
        }
    }

    /// Remove a report by exact id.
    /// Returns true if a report was removed, false otherwise.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut reports = self.list()?;
        let before = reports.len();
        reports.retain(|r| r.id != id);
        if reports.len() == before {
            return Ok(false);
        }
        self.write(&reports)?;
        info!(id, "report deleted");
        Ok(true)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.delete(REPORTS_KEY)
    }

    pub fn trend(&self) -> Result<Option<Trend>> {
        Ok(Trend::from_reports(&self.list()?))
    }

    fn write(&self, reports: &[StoredReport]) -> Result<()> {
        let json = serde_json::to_string(reports).context("Failed to serialize reports")?;
        self.store.set(REPORTS_KEY, &json)
    }
}
