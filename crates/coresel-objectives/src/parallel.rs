//! Parallel evaluation of many candidate subsets
//!
//! Datasets are immutable and objectives are stateless, so each selection
//! is scored independently on the rayon thread pool.

use coresel_core::{CoreData, Result, Selection};
use log::debug;
use rayon::prelude::*;

use crate::{evaluate, Evaluation, Objective};

/// Evaluate one objective on every selection in parallel.
///
/// Results come back in the order of `selections`. The first error
/// encountered in that order is returned.
pub fn evaluate_all<S: Selection>(
    objective: &dyn Objective,
    data: &CoreData,
    selections: &[S],
) -> Result<Vec<Evaluation>> {
    debug!(
        "Evaluating {} on {} selections",
        objective.name(),
        selections.len()
    );

    let results: Vec<Result<Evaluation>> = selections
        .par_iter()
        .map(|selection| evaluate(objective, selection, data))
        .collect();

    results.into_iter().collect()
}
