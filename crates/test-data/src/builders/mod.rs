//! Builders for complete fixture scenarios.

mod legacy;
mod scenario;

pub use legacy::LegacyFixture;
pub use scenario::{ScenarioBuilder, ScenarioMetrics, ScenarioResult};
