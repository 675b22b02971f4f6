//! Run reports for scenarios and campaigns

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Terminal outcome of a scenario run.
///
/// A step failure makes the run `Failed` immediately but never skips the
/// teardown phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Failed,
}

/// Which phase of the scenario a step ran in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    Setup,
    Main,
    Teardown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Passed,
    Failed,
    /// Not executed: an earlier setup or main step already failed.
    Skipped,
}

/// Result of one step, with the context item identifier used for
/// traceability across the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub context_item: String,
    pub title: String,
    pub phase: StepPhase,
    pub outcome: StepOutcome,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub title: String,
    pub context_id: String,
    pub status: ScenarioStatus,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }

    /// First recorded error text, if any
    pub fn first_error(&self) -> Option<&str> {
        self.steps.iter().find_map(|s| s.error.as_deref())
    }
}

/// Aggregated result of running a set of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub scenarios: Vec<ScenarioReport>,
}

impl CampaignReport {
    pub fn from_scenarios(scenarios: Vec<ScenarioReport>) -> Self {
        let total = scenarios.len();
        let passed = scenarios.iter().filter(|s| s.passed()).count();
        let duration_ms = scenarios.iter().map(|s| s.duration_ms).sum();
        Self {
            total,
            passed,
            failed: total - passed,
            duration_ms,
            scenarios,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Write the report to `<dir>/campaign-report.json`
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join("campaign-report.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Report written to: {}", path.display());
        Ok(path)
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scenario(status: ScenarioStatus, error: Option<&str>) -> ScenarioReport {
        ScenarioReport {
            title: "BO - Customers : Filter by name".to_string(),
            context_id: "functional_BO_customers_filter".to_string(),
            status,
            started_at: Utc::now(),
            duration_ms: 1200,
            steps: vec![StepReport {
                context_item: "functional_BO_customers_filter_loginBO".to_string(),
                title: "should login in BO".to_string(),
                phase: StepPhase::Main,
                outcome: if error.is_some() {
                    StepOutcome::Failed
                } else {
                    StepOutcome::Passed
                },
                duration_ms: 1200,
                error: error.map(String::from),
            }],
        }
    }

    #[test]
    fn test_campaign_counts() {
        let report = CampaignReport::from_scenarios(vec![
            sample_scenario(ScenarioStatus::Passed, None),
            sample_scenario(ScenarioStatus::Failed, Some("Assertion failed")),
        ]);
        assert_eq!(report.total, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_first_error() {
        let report = sample_scenario(ScenarioStatus::Failed, Some("Action failed: timeout"));
        assert_eq!(report.first_error(), Some("Action failed: timeout"));
    }

    #[test]
    fn test_write_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let report = CampaignReport::from_scenarios(vec![sample_scenario(ScenarioStatus::Passed, None)]);

        let path = report.write_json(dir.path()).unwrap();
        let json = std::fs::read_to_string(path).unwrap();
        let parsed: CampaignReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total, 1);
        assert_eq!(parsed.scenarios[0].steps[0].outcome, StepOutcome::Passed);
    }
}
