//! Scenario definition and execution

use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::BoxFuture;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::error::{StepError, StepResult};
use crate::fixture::Fixture;
use crate::report::{ScenarioReport, ScenarioStatus, StepOutcome, StepPhase, StepReport};

/// Per-scenario execution context handed to every step.
///
/// `S` is the scenario's own state: the browser session, mail listener and
/// any values captured by earlier steps for later ones. There is exactly one
/// `ScenarioCx` per run and steps receive it by `&mut`, so cross-step state
/// is always explicit.
pub struct ScenarioCx<S> {
    context_id: String,
    pub state: S,
}

impl<S> ScenarioCx<S> {
    /// Context identifier attached to every step report
    pub fn context_id(&self) -> &str {
        &self.context_id
    }
}

/// Future returned by a step body, borrowing the context for its duration
pub type StepFuture<'a> = BoxFuture<'a, StepResult<()>>;

/// Boxed step body
pub type StepFn<S> = Box<dyn for<'a> FnMut(&'a mut ScenarioCx<S>) -> StepFuture<'a> + Send>;

/// A named unit of work: one logical UI action plus its assertions
pub struct Step<S> {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) body: StepFn<S>,
}

impl<S> Step<S> {
    pub(crate) fn new<F>(id: &str, title: &str, body: F) -> Self
    where
        F: for<'a> FnMut(&'a mut ScenarioCx<S>) -> StepFuture<'a> + Send + 'static,
    {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            body: Box::new(body),
        }
    }
}

/// An ordered test case: setup fixtures, main steps, guaranteed teardown.
///
/// Built once via [`Scenario::builder`], immutable afterwards, executed once.
/// The first failing setup or main step fails the scenario and skips the
/// rest of the main body, but every attached fixture teardown still runs.
pub struct Scenario<S> {
    title: String,
    context_id: String,
    fixtures: Vec<Fixture<S>>,
    steps: Vec<Step<S>>,
    step_timeout: Duration,
}

impl<S> Scenario<S> {
    pub fn builder(title: &str, context_id: &str) -> ScenarioBuilder<S> {
        ScenarioBuilder {
            title: title.to_string(),
            context_id: context_id.to_string(),
            fixtures: Vec::new(),
            steps: Vec::new(),
            step_timeout: Duration::from_secs(30),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Number of main-body steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Execute the scenario against `state`.
    ///
    /// Returns the report together with the final state so callers can
    /// inspect captured values after the run. The state is returned on every
    /// outcome; teardown steps have already run against it.
    pub async fn run(self, state: S) -> (ScenarioReport, S) {
        let Scenario {
            title,
            context_id,
            fixtures,
            steps,
            step_timeout,
        } = self;

        let started_at = Utc::now();
        let start = Instant::now();
        info!(scenario = %title, context = %context_id, "scenario running");

        let mut cx = ScenarioCx {
            context_id: context_id.clone(),
            state,
        };
        let mut reports: Vec<StepReport> = Vec::new();
        let mut teardowns: Vec<(String, Step<S>)> = Vec::new();
        let mut halted = false;

        // Setup phase. Teardowns are registered before their setup runs so
        // that a half-applied fixture is still retired.
        for fixture in fixtures {
            let Fixture {
                name,
                mut setup,
                teardown,
            } = fixture;

            if let Some(td) = teardown {
                teardowns.push((name.clone(), td));
            }

            if halted {
                reports.push(skipped_report(&context_id, &setup, StepPhase::Setup));
                continue;
            }

            let mut report = run_step(&mut cx, &mut setup, StepPhase::Setup, step_timeout).await;
            if report.outcome == StepOutcome::Failed {
                // Unmet pre-condition: the dependent main body must not run.
                halted = true;
                report.error = report.error.map(|reason| {
                    StepError::Fixture {
                        name: name.clone(),
                        reason,
                    }
                    .to_string()
                });
            }
            reports.push(report);
        }

        // Main phase, strictly in declaration order, fail-fast.
        for mut step in steps {
            if halted {
                reports.push(skipped_report(&context_id, &step, StepPhase::Main));
                continue;
            }

            let report = run_step(&mut cx, &mut step, StepPhase::Main, step_timeout).await;
            if report.outcome == StepOutcome::Failed {
                halted = true;
            }
            reports.push(report);
        }

        // Teardown phase: unconditional, reverse attachment order.
        for (name, mut td) in teardowns.into_iter().rev() {
            let mut report = run_step(&mut cx, &mut td, StepPhase::Teardown, step_timeout).await;
            if report.outcome == StepOutcome::Failed {
                report.error = report.error.map(|reason| {
                    StepError::Fixture {
                        name: name.clone(),
                        reason,
                    }
                    .to_string()
                });
            }
            reports.push(report);
        }

        let any_failed = reports.iter().any(|r| r.outcome == StepOutcome::Failed);
        let status = if any_failed {
            ScenarioStatus::Failed
        } else {
            ScenarioStatus::Passed
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        if any_failed {
            error!(scenario = %title, "scenario failed ({} ms)", duration_ms);
        } else {
            info!(scenario = %title, "scenario passed ({} ms)", duration_ms);
        }

        let report = ScenarioReport {
            title,
            context_id,
            status,
            started_at,
            duration_ms,
            steps: reports,
        };
        (report, cx.state)
    }
}

async fn run_step<S>(
    cx: &mut ScenarioCx<S>,
    step: &mut Step<S>,
    phase: StepPhase,
    step_timeout: Duration,
) -> StepReport {
    debug!(step = %step.title, "step starting");
    let start = Instant::now();

    let result = match timeout(step_timeout, (step.body)(cx)).await {
        Ok(result) => result,
        Err(_) => Err(StepError::Timeout {
            ms: step_timeout.as_millis() as u64,
        }),
    };
    let duration_ms = start.elapsed().as_millis() as u64;

    let context_item = format!("{}_{}", cx.context_id, step.id);
    match result {
        Ok(()) => {
            info!("✓ {} ({} ms)", step.title, duration_ms);
            StepReport {
                context_item,
                title: step.title.clone(),
                phase,
                outcome: StepOutcome::Passed,
                duration_ms,
                error: None,
            }
        }
        Err(e) => {
            error!("✗ {} - {}", step.title, e);
            StepReport {
                context_item,
                title: step.title.clone(),
                phase,
                outcome: StepOutcome::Failed,
                duration_ms,
                error: Some(e.to_string()),
            }
        }
    }
}

fn skipped_report<S>(context_id: &str, step: &Step<S>, phase: StepPhase) -> StepReport {
    StepReport {
        context_item: format!("{}_{}", context_id, step.id),
        title: step.title.clone(),
        phase,
        outcome: StepOutcome::Skipped,
        duration_ms: 0,
        error: None,
    }
}

/// Builder for [`Scenario`]
pub struct ScenarioBuilder<S> {
    title: String,
    context_id: String,
    fixtures: Vec<Fixture<S>>,
    steps: Vec<Step<S>>,
    step_timeout: Duration,
}

impl<S> ScenarioBuilder<S> {
    /// Attach a fixture. Its setup is queued before the main body, its
    /// teardown after it; teardowns run in reverse attachment order.
    pub fn fixture(mut self, fixture: Fixture<S>) -> Self {
        self.fixtures.push(fixture);
        self
    }

    /// Append a main-body step. `id` becomes part of the report's context
    /// item identifier; `title` is the human-readable description.
    pub fn step<F>(mut self, id: &str, title: &str, body: F) -> Self
    where
        F: for<'a> FnMut(&'a mut ScenarioCx<S>) -> StepFuture<'a> + Send + 'static,
    {
        self.steps.push(Step::new(id, title, body));
        self
    }

    /// Bound on each step's blocking action. Exceeding it fails the step
    /// with a timeout error; teardown still runs.
    pub fn step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }

    pub fn build(self) -> Scenario<S> {
        Scenario {
            title: self.title,
            context_id: self.context_id,
            fixtures: self.fixtures,
            steps: self.steps,
            step_timeout: self.step_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TraceState {
        log: Vec<&'static str>,
    }

    type Cx = ScenarioCx<TraceState>;

    fn trace_fixture(
        name: &str,
        setup_label: &'static str,
        teardown_label: &'static str,
    ) -> Fixture<TraceState> {
        Fixture::new(name, setup_label, setup_label, move |cx: &mut Cx| {
            Box::pin(async move {
                cx.state.log.push(setup_label);
                Ok(())
            })
        })
        .with_teardown(teardown_label, teardown_label, move |cx: &mut Cx| {
            Box::pin(async move {
                cx.state.log.push(teardown_label);
                Ok(())
            })
        })
    }

    #[tokio::test]
    async fn test_steps_run_in_declaration_order() {
        let scenario = Scenario::builder("ordering", "test_ordering")
            .step("first", "first step", |cx: &mut Cx| {
                Box::pin(async move {
                    cx.state.log.push("first");
                    Ok(())
                })
            })
            .step("second", "second step", |cx: &mut Cx| {
                Box::pin(async move {
                    cx.state.log.push("second");
                    Ok(())
                })
            })
            .step("third", "third step", |cx: &mut Cx| {
                Box::pin(async move {
                    cx.state.log.push("third");
                    Ok(())
                })
            })
            .build();

        let (report, state) = scenario.run(TraceState::default()).await;
        assert_eq!(state.log, vec!["first", "second", "third"]);
        assert_eq!(report.status, ScenarioStatus::Passed);
        assert_eq!(report.steps[0].context_item, "test_ordering_first");
    }

    #[tokio::test]
    async fn test_failed_step_skips_rest_of_main_body() {
        let scenario = Scenario::builder("fail fast", "test_fail_fast")
            .step("ok", "passing step", |cx: &mut Cx| {
                Box::pin(async move {
                    cx.state.log.push("ok");
                    Ok(())
                })
            })
            .step("boom", "failing step", |_cx: &mut Cx| {
                Box::pin(async move {
                    Err(StepError::Action("element not found: #missing".to_string()))
                })
            })
            .step("after", "never reached", |cx: &mut Cx| {
                Box::pin(async move {
                    cx.state.log.push("after");
                    Ok(())
                })
            })
            .build();

        let (report, state) = scenario.run(TraceState::default()).await;
        assert_eq!(state.log, vec!["ok"]);
        assert_eq!(report.status, ScenarioStatus::Failed);
        assert_eq!(report.steps[1].outcome, StepOutcome::Failed);
        assert_eq!(report.steps[2].outcome, StepOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_teardown_runs_after_main_body_failure() {
        let scenario = Scenario::builder("cleanup", "test_cleanup")
            .fixture(trace_fixture("record", "create", "delete"))
            .step("boom", "failing step", |_cx: &mut Cx| {
                Box::pin(async move { Err(StepError::Action("timeout".to_string())) })
            })
            .build();

        let (report, state) = scenario.run(TraceState::default()).await;
        assert_eq!(state.log, vec!["create", "delete"]);
        assert_eq!(report.status, ScenarioStatus::Failed);

        let teardown = report
            .steps
            .iter()
            .find(|s| s.phase == StepPhase::Teardown)
            .unwrap();
        assert_eq!(teardown.outcome, StepOutcome::Passed);
    }

    #[tokio::test]
    async fn test_teardowns_run_in_reverse_attachment_order() {
        let scenario = Scenario::builder("pairs", "test_pairs")
            .fixture(trace_fixture("smtp", "setup_smtp", "reset_smtp"))
            .fixture(trace_fixture("customer", "create_customer", "delete_customer"))
            .step("noop", "main body", |cx: &mut Cx| {
                Box::pin(async move {
                    cx.state.log.push("main");
                    Ok(())
                })
            })
            .build();

        let (_, state) = scenario.run(TraceState::default()).await;
        assert_eq!(
            state.log,
            vec![
                "setup_smtp",
                "create_customer",
                "main",
                "delete_customer",
                "reset_smtp",
            ]
        );
    }

    #[tokio::test]
    async fn test_setup_failure_aborts_main_body_but_not_teardown() {
        let failing = Fixture::new("smtp", "setup_smtp", "setup smtp", |_cx: &mut Cx| {
            Box::pin(async move { Err(StepError::Action("connection refused".to_string())) })
        })
        .with_teardown("reset_smtp", "reset smtp", |cx: &mut Cx| {
            Box::pin(async move {
                cx.state.log.push("reset_smtp");
                Ok(())
            })
        });

        let scenario = Scenario::builder("precondition", "test_precondition")
            .fixture(failing)
            .fixture(trace_fixture("customer", "create_customer", "delete_customer"))
            .step("main", "main body", |cx: &mut Cx| {
                Box::pin(async move {
                    cx.state.log.push("main");
                    Ok(())
                })
            })
            .build();

        let (report, state) = scenario.run(TraceState::default()).await;

        // Main body and the second fixture's setup never ran; both teardowns did.
        assert_eq!(state.log, vec!["delete_customer", "reset_smtp"]);
        assert_eq!(report.status, ScenarioStatus::Failed);

        let setup_error = report.steps[0].error.as_deref().unwrap();
        assert!(setup_error.contains("Fixture 'smtp' failed"));
        assert!(report
            .steps
            .iter()
            .filter(|s| s.phase == StepPhase::Main)
            .all(|s| s.outcome == StepOutcome::Skipped));
    }

    #[tokio::test]
    async fn test_step_timeout_fails_scenario() {
        let scenario = Scenario::builder("slow", "test_slow")
            .step_timeout(Duration::from_millis(20))
            .step("hang", "step that hangs", |_cx: &mut Cx| {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(())
                })
            })
            .build();

        let (report, _) = scenario.run(TraceState::default()).await;
        assert_eq!(report.status, ScenarioStatus::Failed);
        assert!(report.steps[0].error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_captured_state_flows_between_steps() {
        #[derive(Default)]
        struct Captured {
            token: Option<String>,
        }

        let scenario = Scenario::builder("capture", "test_capture")
            .step("produce", "capture a value", |cx: &mut ScenarioCx<Captured>| {
                Box::pin(async move {
                    cx.state.token = Some("reset-link".to_string());
                    Ok(())
                })
            })
            .step("consume", "read it back", |cx: &mut ScenarioCx<Captured>| {
                Box::pin(async move {
                    crate::expect_eq(cx.state.token.as_deref(), Some("reset-link"))
                })
            })
            .build();

        let (report, _) = scenario.run(Captured::default()).await;
        assert_eq!(report.status, ScenarioStatus::Passed);
    }
}
