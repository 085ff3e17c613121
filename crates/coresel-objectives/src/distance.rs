//! Distance based measures over a precomputed distance matrix.

use coresel_core::{CoreData, CoreselError, DistanceMatrixData, NamedDataset, Result, Selection};

use crate::average::selected_items;
use crate::Objective;

/// Mean distance between all unordered pairs of selected items.
///
/// Selections with fewer than two items score 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct AverageDistance;

impl Objective for AverageDistance {
    fn name(&self) -> &'static str {
        "average distance"
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64> {
        let dist = data.require_distances(self.name())?;
        let items = selected_items(selection, dist.size())?;
        let k = items.len();
        if k < 2 {
            return Ok(0.0);
        }
        let mut sum = 0.0;
        for (a, &i) in items.iter().enumerate() {
            for &j in &items[a + 1..] {
                sum += dist.distance(i, j);
            }
        }
        let pairs = (k * (k - 1) / 2) as f64;
        Ok(sum / pairs)
    }
}

fn nearest(dist: &DistanceMatrixData, from: usize, to: &[usize], skip_self: bool) -> f64 {
    to.iter()
        .filter(|&&j| !(skip_self && j == from))
        .map(|&j| dist.distance(from, j))
        .fold(f64::INFINITY, f64::min)
}

/// Mean distance from each selected entry to its nearest other entry.
///
/// Selections with fewer than two items score 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntryToNearestEntryDistance;

impl Objective for EntryToNearestEntryDistance {
    fn name(&self) -> &'static str {
        "entry to nearest entry distance"
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64> {
        let dist = data.require_distances(self.name())?;
        let items = selected_items(selection, dist.size())?;
        if items.len() < 2 {
            return Ok(0.0);
        }
        let sum: f64 = items.iter().map(|&i| nearest(dist, i, &items, true)).sum();
        Ok(sum / items.len() as f64)
    }
}

/// Mean distance from every accession in the collection to the nearest
/// selected entry. Selected accessions contribute 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessionToNearestEntryDistance;

impl Objective for AccessionToNearestEntryDistance {
    fn name(&self) -> &'static str {
        "accession to nearest entry distance"
    }

    fn is_minimizing(&self) -> bool {
        true
    }

    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64> {
        let dist = data.require_distances(self.name())?;
        let n = dist.size();
        let items = selected_items(selection, n)?;
        if items.is_empty() {
            return Err(CoreselError::validation(format!(
                "{} is undefined for an empty selection",
                self.name()
            )));
        }
        let sum: f64 = (0..n).map(|i| nearest(dist, i, &items, false)).sum();
        Ok(sum / n as f64)
    }
}
