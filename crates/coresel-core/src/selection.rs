//! Candidate subsets as seen by objectives: membership and iteration only.

use std::collections::{BTreeSet, HashSet};

/// A candidate subset of item indices.
///
/// Objectives never look at how a subset is stored; they only ask whether
/// an index is selected and iterate over the selected indices.
pub trait Selection: Sync {
    fn contains(&self, index: usize) -> bool;

    fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_>;
}

impl Selection for [usize] {
    fn contains(&self, index: usize) -> bool {
        self.iter().any(|&i| i == index)
    }

    fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.iter().copied())
    }
}

impl Selection for Vec<usize> {
    fn contains(&self, index: usize) -> bool {
        self.as_slice().contains(&index)
    }

    fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.iter().copied())
    }
}

impl Selection for BTreeSet<usize> {
    fn contains(&self, index: usize) -> bool {
        BTreeSet::contains(self, &index)
    }

    fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.iter().copied())
    }
}

impl<S: std::hash::BuildHasher + Sync> Selection for HashSet<usize, S> {
    fn contains(&self, index: usize) -> bool {
        HashSet::contains(self, &index)
    }

    fn indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.iter().copied())
    }
}

/// Selected indices in ascending order without duplicates.
pub fn sorted_indices(selection: &dyn Selection) -> Vec<usize> {
    let set: BTreeSet<usize> = selection.indices().collect();
    set.into_iter().collect()
}
