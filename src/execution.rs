//! Per-run state shared by the recipes of a pipeline.
//!
//! An [`ExecutionContext`] is the traversal parameter of every recipe
//! visitor. It carries the run configuration, collects recipe failures, and
//! holds scratch messages that recipes can pass to one another within a run.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;
use tugrewrite_core::{RewriteError, RunConfig};

/// Mutable state for one run over one source file.
///
/// # Example
///
/// ```ignore
/// let mut ctx = ExecutionContext::new(RunConfig::default());
/// let result = pipeline.run(&cu, &mut ctx);
/// assert!(result.errors.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ExecutionContext {
    config: RunConfig,
    current_recipe: Option<String>,
    errors: Vec<RewriteError>,
    messages: HashMap<String, Value>,
}

impl ExecutionContext {
    pub fn new(config: RunConfig) -> Self {
        ExecutionContext {
            config,
            ..ExecutionContext::default()
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Name of the recipe currently running, if any.
    pub fn current_recipe(&self) -> Option<&str> {
        self.current_recipe.as_deref()
    }

    pub(crate) fn enter_recipe(&mut self, name: &str) {
        self.current_recipe = Some(name.to_string());
    }

    pub(crate) fn exit_recipe(&mut self) {
        self.current_recipe = None;
    }

    /// Report a recipe failure. The run continues; the error is logged and
    /// kept for the caller.
    pub fn on_error(&mut self, error: RewriteError) {
        warn!(
            recipe = self.current_recipe.as_deref().unwrap_or("<none>"),
            error = %error,
            "recipe reported an error"
        );
        self.errors.push(error);
    }

    /// Report a failure of the running recipe from a plain message.
    pub fn fail(&mut self, message: impl Into<String>) {
        let recipe = self.current_recipe.clone().unwrap_or_default();
        self.on_error(RewriteError::recipe(recipe, message));
    }

    pub fn errors(&self) -> &[RewriteError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Remove and return every collected error.
    pub fn take_errors(&mut self) -> Vec<RewriteError> {
        std::mem::take(&mut self.errors)
    }

    // ------------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------------

    pub fn put_message(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.messages.insert(key.into(), value.into());
    }

    pub fn get_message(&self, key: &str) -> Option<&Value> {
        self.messages.get(key)
    }

    /// The message under `key`, inserting `default()` first if absent.
    pub fn compute_message_if_absent<F>(&mut self, key: &str, default: F) -> &mut Value
    where
        F: FnOnce() -> Value,
    {
        self.messages.entry(key.to_string()).or_insert_with(default)
    }

    pub fn poll_message(&mut self, key: &str) -> Option<Value> {
        self.messages.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn errors_are_collected_and_attributed() {
        let mut ctx = ExecutionContext::new(RunConfig::default());
        ctx.enter_recipe("bump-version");
        ctx.fail("no version found");
        ctx.exit_recipe();
        ctx.on_error(RewriteError::config("bad"));

        assert!(ctx.has_errors());
        let errors = ctx.take_errors();
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], RewriteError::Recipe { recipe, .. } if recipe == "bump-version"));
        assert!(!ctx.has_errors());
    }

    #[test]
    fn messages_round_trip() {
        let mut ctx = ExecutionContext::default();
        ctx.put_message("seen", 1);
        assert_eq!(ctx.get_message("seen"), Some(&json!(1)));

        *ctx.compute_message_if_absent("count", || json!(0)) = json!(5);
        assert_eq!(ctx.get_message("count"), Some(&json!(5)));
        assert_eq!(ctx.poll_message("count"), Some(json!(5)));
        assert_eq!(ctx.get_message("count"), None);
    }
}
