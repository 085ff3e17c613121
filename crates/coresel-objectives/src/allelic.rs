//! Allelic diversity measures computed from the average genotype of a selection.

use coresel_core::{CoreData, GenotypeData, Result, Selection};

use crate::average::average_genotype;
use crate::Objective;

/// Shannon's diversity index over all alleles of all markers.
///
/// Average allele frequencies are scaled by the total number of markers
/// before taking `-Σ p ln p`, so markers contribute equally regardless of
/// their allele count. Markers without observations add nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Shannon;

impl Objective for Shannon {
    fn name(&self) -> &'static str {
        "Shannon's index"
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64> {
        let geno = data.require_genotypes(self.name())?;
        let avg = average_genotype(geno, selection)?;
        let n_markers = geno.number_of_markers() as f64;
        let sum: f64 = avg
            .iter()
            .flatten()
            .flat_map(|freqs| freqs.iter())
            .filter(|&&f| f > 0.0)
            .map(|&f| {
                let p = f / n_markers;
                p * p.ln()
            })
            .sum();
        Ok(-sum)
    }
}

/// Share of alleles absent from the selection: their average frequency is
/// zero, or no selected item is observed at their marker.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProportionNonInformativeAlleles;

impl ProportionNonInformativeAlleles {
    fn proportion(geno: &dyn GenotypeData, selection: &dyn Selection) -> Result<f64> {
        let avg = average_genotype(geno, selection)?;
        let absent: usize = avg
            .iter()
            .enumerate()
            .map(|(m, freqs)| match freqs {
                Some(freqs) => freqs.iter().filter(|&&f| f == 0.0).count(),
                None => geno.number_of_alleles(m),
            })
            .sum();
        Ok(absent as f64 / geno.total_number_of_alleles() as f64)
    }
}

impl Objective for ProportionNonInformativeAlleles {
    fn name(&self) -> &'static str {
        "proportion of non-informative alleles"
    }

    fn is_minimizing(&self) -> bool {
        true
    }

    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64> {
        let geno = data.require_genotypes(self.name())?;
        Self::proportion(geno, selection)
    }
}

/// Allele coverage: the share of all alleles present in the selection.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coverage;

impl Objective for Coverage {
    fn name(&self) -> &'static str {
        "allele coverage"
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64> {
        let geno = data.require_genotypes(self.name())?;
        Ok(1.0 - ProportionNonInformativeAlleles::proportion(geno, selection)?)
    }
}

/// Mean of a per-marker statistic of the average frequencies, over the
/// markers observed in the selection. Zero if none is observed.
fn mean_over_markers(avg: &[Option<Vec<f64>>], stat: impl Fn(f64) -> f64) -> f64 {
    let (total, count) = avg
        .iter()
        .flatten()
        .map(|freqs| stat(freqs.iter().map(|f| f * f).sum()))
        .fold((0.0, 0usize), |(t, c), v| (t + v, c + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Expected heterozygosity `1 - Σ f²`, averaged over markers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Heterozygosity;

impl Objective for Heterozygosity {
    fn name(&self) -> &'static str {
        "expected heterozygosity"
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64> {
        let geno = data.require_genotypes(self.name())?;
        let avg = average_genotype(geno, selection)?;
        Ok(mean_over_markers(&avg, |sum_sq| 1.0 - sum_sq))
    }
}

/// Effective number of alleles `1 / Σ f²`, averaged over markers.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectiveAlleles;

impl Objective for EffectiveAlleles {
    fn name(&self) -> &'static str {
        "effective number of alleles"
    }

    fn is_minimizing(&self) -> bool {
        false
    }

    fn evaluate(&self, selection: &dyn Selection, data: &CoreData) -> Result<f64> {
        let geno = data.require_genotypes(self.name())?;
        let avg = average_genotype(geno, selection)?;
        Ok(mean_over_markers(&avg, |sum_sq| 1.0 / sum_sq))
    }
}
