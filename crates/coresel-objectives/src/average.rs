//! Average genotype of a selection, shared by all allelic diversity measures.

use coresel_core::{sorted_indices, CoreselError, GenotypeData, NamedDataset, Result, Selection};

/// Selected indices in ascending order, checked against the dataset size.
pub(crate) fn selected_items(selection: &dyn Selection, size: usize) -> Result<Vec<usize>> {
    let items = sorted_indices(selection);
    if let Some(&bad) = items.last().filter(|&&i| i >= size) {
        return Err(CoreselError::validation(format!(
            "selected item {} is out of range for a dataset of {} items",
            bad, size
        )));
    }
    Ok(items)
}

/// Mean allele frequencies of the selected items, per marker.
///
/// Only items observed at a marker contribute to that marker's average,
/// in both numerator and denominator. A marker without any observed
/// selected item has no average (`None`).
pub fn average_genotype<G>(geno: &G, selection: &dyn Selection) -> Result<Vec<Option<Vec<f64>>>>
where
    G: GenotypeData + ?Sized,
{
    let items = selected_items(selection, geno.size())?;
    let averages = (0..geno.number_of_markers())
        .map(|m| {
            let n_alleles = geno.number_of_alleles(m);
            let mut sums = vec![0.0; n_alleles];
            let mut observed = 0usize;
            for &i in items.iter().filter(|&&i| geno.is_observed(i, m)) {
                for (a, s) in sums.iter_mut().enumerate() {
                    *s += geno.allele_frequency(i, m, a).unwrap_or(0.0);
                }
                observed += 1;
            }
            (observed > 0).then(|| {
                let count = observed as f64;
                sums.into_iter().map(|s| s / count).collect()
            })
        })
        .collect();
    Ok(averages)
}
