//! Recipe pipelines.
//!
//! A [`Pipeline`] runs its recipes in order over one compilation unit, each
//! recipe receiving the previous one's output. The sequence repeats while a
//! pass changes the unit, up to [`RunConfig::max_cycles`] passes.
//! [`Pipeline::run_all`] runs the pipeline over many units independently,
//! on the rayon pool when [`RunConfig::parallel`] is set.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use tugrewrite_core::{RecipesThatMadeChanges, RewriteError, RunConfig};
use tugrewrite_lst::{CompilationUnit, Tree};

use crate::execution::ExecutionContext;
use crate::recipe::{apply_recipe, Recipe};

/// An ordered list of recipes with its run configuration.
#[derive(Clone, Default)]
pub struct Pipeline {
    recipes: Vec<Arc<dyn Recipe>>,
    config: RunConfig,
}

impl Pipeline {
    pub fn new(config: RunConfig) -> Self {
        Pipeline {
            recipes: Vec::new(),
            config,
        }
    }

    /// Append `recipe` to the end of the pipeline.
    pub fn with_recipe(mut self, recipe: impl Recipe + 'static) -> Self {
        self.recipes.push(Arc::new(recipe));
        self
    }

    /// Append a recipe that is already shared.
    pub fn with_shared_recipe(mut self, recipe: Arc<dyn Recipe>) -> Self {
        self.recipes.push(recipe);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Recipe names in run order.
    pub fn recipe_names(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.name()).collect()
    }

    /// Run every recipe over `unit`.
    ///
    /// Errors the recipes report through `ctx` move into the result.
    pub fn run(&self, unit: &Arc<CompilationUnit>, ctx: &mut ExecutionContext) -> RunResult {
        let mut current = Arc::clone(unit);
        let mut changed_by: Vec<String> = Vec::new();
        let mut cycles = 0;

        while cycles < self.config.max_cycles.max(1) {
            cycles += 1;
            let cycle_start = Arc::clone(&current);

            for recipe in &self.recipes {
                let span = info_span!("recipe", name = recipe.name());
                let _enter = span.enter();

                let next = apply_recipe(recipe.as_ref(), &current, ctx);
                if Arc::ptr_eq(&next, &current) {
                    continue;
                }
                info!(
                    path = %current.source_path().display(),
                    cycle = cycles,
                    "recipe changed source file"
                );
                if !changed_by.iter().any(|name| name == recipe.name()) {
                    changed_by.push(recipe.name().to_string());
                }
                current = next;
            }

            if Arc::ptr_eq(&cycle_start, &current) {
                break;
            }
        }

        if self.config.mark_provenance && !changed_by.is_empty() {
            let markers = changed_by
                .iter()
                .fold(current.markers().clone(), |markers, name| {
                    RecipesThatMadeChanges::record(&markers, name)
                });
            current = current.with_markers(markers);
        }

        RunResult {
            before: Arc::clone(unit),
            after: current,
            recipes_that_made_changes: changed_by,
            cycles,
            errors: ctx.take_errors(),
        }
    }

    /// Run the pipeline over each unit with its own execution context.
    ///
    /// Results are in input order.
    pub fn run_all(&self, units: &[Arc<CompilationUnit>]) -> Vec<RunResult> {
        debug!(
            files = units.len(),
            recipes = self.recipes.len(),
            parallel = self.config.parallel,
            "running pipeline"
        );
        if self.config.parallel {
            units.par_iter().map(|unit| self.run_fresh(unit)).collect()
        } else {
            units.iter().map(|unit| self.run_fresh(unit)).collect()
        }
    }

    fn run_fresh(&self, unit: &Arc<CompilationUnit>) -> RunResult {
        let mut ctx = ExecutionContext::new(self.config.clone());
        self.run(unit, &mut ctx)
    }
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of a pipeline run over one compilation unit.
#[derive(Debug)]
pub struct RunResult {
    pub before: Arc<CompilationUnit>,
    pub after: Arc<CompilationUnit>,
    /// Recipes that changed the unit, in the order they first did.
    pub recipes_that_made_changes: Vec<String>,
    /// Passes made over the recipe list.
    pub cycles: usize,
    pub errors: Vec<RewriteError>,
}

impl RunResult {
    /// Returns true if any recipe changed the unit.
    pub fn is_changed(&self) -> bool {
        !Arc::ptr_eq(&self.before, &self.after)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            path: self.after.source_path().display().to_string(),
            changed: self.is_changed(),
            recipes: self.recipes_that_made_changes.clone(),
            cycles: self.cycles,
            errors: self.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Serializable digest of a [`RunResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub path: String,
    pub changed: bool,
    pub recipes: Vec<String>,
    pub cycles: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
