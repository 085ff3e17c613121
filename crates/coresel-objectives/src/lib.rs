//! coresel-objectives: diversity measures for candidate core subsets.
//!
//! ## Module Organization
//! - `average`: average genotype of a selection
//! - `allelic`: Shannon, coverage, heterozygosity and effective alleles
//! - `distance`: average and nearest-entry distances
//! - `parallel`: rayon batch evaluation
//!
//! Every objective reads a [`CoreData`] and a [`Selection`] and never
//! mutates either, so objectives can be shared freely across threads.

pub mod allelic;
pub mod average;
pub mod distance;
pub mod parallel;

use coresel_core::{CoreData, Result, Selection};

pub use allelic::{
    Coverage, EffectiveAlleles, Heterozygosity, ProportionNonInformativeAlleles, Shannon,
};
pub use average::average_genotype;
pub use distance::{AccessionToNearestEntryDistance, AverageDistance, EntryToNearestEntryDistance};
pub use parallel::evaluate_all;

/// A diversity measure of a subset of items.
pub trait Objective: Send + Sync {
    /// Human readable name, used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Whether lower values are better.
    fn is_minimizing(&self) -> bool;

    /// Score `selection` against `data`.
    ///
    /// Fails with a domain error when `data` lacks the modality this
    /// objective needs, and with a validation error for out-of-range items.
    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64>;
}

/// Score of one selection together with its optimisation direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub value: f64,
    pub minimizing: bool,
}

impl Evaluation {
    /// Whether this evaluation is strictly better than `other`.
    pub fn is_better_than(&self, other: &Evaluation) -> bool {
        if self.minimizing {
            self.value < other.value
        } else {
            self.value > other.value
        }
    }
}

/// Position of the best evaluation; ties keep the earliest.
pub fn best_index(evaluations: &[Evaluation]) -> Option<usize> {
    let mut best: Option<(usize, &Evaluation)> = None;
    for (i, e) in evaluations.iter().enumerate() {
        match best {
            Some((_, b)) if !e.is_better_than(b) => {}
            _ => best = Some((i, e)),
        }
    }
    best.map(|(i, _)| i)
}

/// Evaluate `objective` and tag the value with its direction.
pub fn evaluate(
    objective: &dyn Objective,
    selection: &dyn Selection,
    data: &CoreData,
) -> Result<Evaluation> {
    Ok(Evaluation {
        value: objective.evaluate(selection, data)?,
        minimizing: objective.is_minimizing(),
    })
}
