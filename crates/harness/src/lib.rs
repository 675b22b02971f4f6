//! ShopTest Scenario Harness
//!
//! This crate provides the orchestration core for browser-driven functional
//! tests: ordered steps over a per-scenario state object, paired
//! setup/teardown fixtures with a guaranteed cleanup phase, and serializable
//! run reports.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Scenario<S>                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  setup phase     fixtures' setup steps, in attachment order │
//! │  main phase      steps, in declaration order, fail-fast     │
//! │  teardown phase  fixtures' teardown steps, reverse order,   │
//! │                  always executed                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioCx<S>                                              │
//! │    ├── context identifier (diagnostics)                     │
//! │    └── state: S  (browser session, mail listener, captures) │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioReport                                             │
//! │    └── per-step phase / outcome / duration / error          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A step body is an async closure over `&mut ScenarioCx<S>`; values produced
//! by one step are handed to later steps through fields of `S`, never through
//! module-level globals.

pub mod error;
pub mod fixture;
pub mod report;
pub mod scenario;

pub use error::{expect_contains, expect_eq, expect_true, StepError, StepResult};
pub use fixture::Fixture;
pub use report::{CampaignReport, ScenarioReport, ScenarioStatus, StepOutcome, StepPhase, StepReport};
pub use scenario::{Scenario, ScenarioBuilder, ScenarioCx, StepFn, StepFuture};
