pub mod confidence;
pub mod engine;
pub mod factors;
pub mod hormones;

pub use confidence::{ConfidenceSource, EntropyConfidence, FixedConfidence, SeededConfidence};
pub use engine::{compute_risk, RiskFactor, RiskLevel, RiskResult};
pub use factors::{FactorKind, FactorStatus};
pub use hormones::{HormoneAnalysis, HormoneReading, HormoneStatus};
