use std::collections::HashSet;

use crate::gene_projection::GeneCall;

/// Restrict gene calls to those with a symbol in the cancer gene list
///
/// Input order and values are preserved.
///
pub fn filter_oncogenic(gene_calls: &[GeneCall], cancer_genes: &HashSet<String>) -> Vec<GeneCall> {
    gene_calls
        .iter()
        .filter(|x| cancer_genes.contains(&x.symbol))
        .cloned()
        .collect()
}

/// Restrict gene calls to those with a non-neutral copy number state
///
pub fn filter_non_diploid(gene_calls: &[GeneCall]) -> Vec<GeneCall> {
    gene_calls
        .iter()
        .filter(|x| x.call.is_non_diploid())
        .cloned()
        .collect()
}
