//! The recipe contract and single-recipe application.
//!
//! A recipe pairs an optional [`Precondition`] with a main visitor. When the
//! precondition is present, the visitor runs gated: it only descends into
//! subtrees holding a match, and every other subtree comes back as the same
//! reference.

use std::sync::Arc;

use tracing::debug;
use tugrewrite_lst::visitor::{run, run_gated, TreeVisitor};
use tugrewrite_lst::{CompilationUnit, J};

use crate::execution::ExecutionContext;
use crate::precondition::Precondition;

/// Boxed main visitor of a recipe.
pub type RecipeVisitor = Box<dyn TreeVisitor<ExecutionContext> + Send>;

/// A named unit of search and rewrite logic.
///
/// # Example
///
/// ```ignore
/// struct RenameKey {
///     precondition: Precondition,
/// }
///
/// impl Recipe for RenameKey {
///     fn name(&self) -> &str {
///         "rename-key"
///     }
///
///     fn precondition(&self) -> Option<&Precondition> {
///         Some(&self.precondition)
///     }
///
///     fn visitor(&self) -> RecipeVisitor {
///         Box::new(RenameKeyVisitor)
///     }
/// }
/// ```
pub trait Recipe: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Gate for the main visitor. A recipe holding the same precondition as
    /// another shares its memoized evaluation.
    fn precondition(&self) -> Option<&Precondition> {
        None
    }

    /// A fresh main visitor for one pass.
    fn visitor(&self) -> RecipeVisitor;
}

/// Apply `recipe` to `unit`, returning the same `Arc` when nothing changed.
///
/// A visitor that replaces the unit with some other node kind is reported
/// through [`ExecutionContext::on_error`] and its result is discarded.
pub fn apply_recipe(
    recipe: &dyn Recipe,
    unit: &Arc<CompilationUnit>,
    ctx: &mut ExecutionContext,
) -> Arc<CompilationUnit> {
    let tree = J::CompilationUnit(Arc::clone(unit));
    let mut visitor = recipe.visitor();

    ctx.enter_recipe(recipe.name());
    let result = match recipe.precondition() {
        None => run(&mut *visitor, &tree, ctx),
        Some(precondition) => {
            let gate = precondition.evaluate(unit);
            if gate.is_empty() {
                debug!(
                    recipe = recipe.name(),
                    precondition = precondition.name(),
                    "precondition matched nothing; skipping"
                );
                ctx.exit_recipe();
                return Arc::clone(unit);
            }
            run_gated(&mut *visitor, &tree, ctx, gate)
        }
    };

    let next = match result {
        J::CompilationUnit(next) => next,
        other => {
            ctx.fail(format!(
                "visitor replaced the compilation unit with a {}",
                other.kind()
            ));
            Arc::clone(unit)
        }
    };
    ctx.exit_recipe();
    next
}
