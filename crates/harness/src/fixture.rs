//! Pre/post-condition fixtures
//!
//! A fixture is an explicit setup/teardown pair built by its constructor and
//! composed onto a scenario by the caller. Every fixture that mutates shared
//! external state (a created record, a toggled configuration flag) should
//! carry the symmetric teardown, otherwise that state leaks across runs.
//! Teardowns must tolerate partially-applied setup: they run even when the
//! setup or the main body failed.

use crate::scenario::{ScenarioCx, Step, StepFuture};

/// A reusable scenario fragment producing or retiring one unit of external
/// state
pub struct Fixture<S> {
    pub(crate) name: String,
    pub(crate) setup: Step<S>,
    pub(crate) teardown: Option<Step<S>>,
}

impl<S> Fixture<S> {
    /// Create a fixture from its setup step.
    ///
    /// `setup_id` feeds the report's context item identifier, `setup_title`
    /// is the human-readable description.
    pub fn new<F>(name: &str, setup_id: &str, setup_title: &str, body: F) -> Self
    where
        F: for<'a> FnMut(&'a mut ScenarioCx<S>) -> StepFuture<'a> + Send + 'static,
    {
        Self {
            name: name.to_string(),
            setup: Step::new(setup_id, setup_title, body),
            teardown: None,
        }
    }

    /// Attach the symmetric teardown step
    pub fn with_teardown<F>(mut self, id: &str, title: &str, body: F) -> Self
    where
        F: for<'a> FnMut(&'a mut ScenarioCx<S>) -> StepFuture<'a> + Send + 'static,
    {
        self.teardown = Some(Step::new(id, title, body));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a teardown is registered
    pub fn has_teardown(&self) -> bool {
        self.teardown.is_some()
    }
}
