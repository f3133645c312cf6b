use std::error;

use camino::Utf8Path;
use itertools::Itertools;
use log::{debug, info, warn};

use crate::arm_aggregation::aggregate_arms;
use crate::cli;
use crate::cutoffs::{Cutoffs, compute_cutoffs};
use crate::gene_projection::project_genes;
use crate::genome_altered::get_fraction_genome_altered;
use crate::input_tables::{
    read_cancer_genes, read_centromeres, read_genes, read_purity_file, read_segments,
};
use crate::onco_filter::{filter_non_diploid, filter_oncogenic};
use crate::output_tables::{
    GENE_CNA_FILENAME, ONCOGENIC_CNA_FILENAME, ONCOGENIC_NON_DIPLOID_CNA_FILENAME,
    write_arm_calls_file, write_cutoffs_file, write_cutoffs_table, write_gene_cna_file,
    write_gene_log2_file,
};
use crate::run_stats::{
    ArmStats, CallRunStats, GeneStats, get_state_counts, write_call_run_stats,
};
use crate::segment_index::SegmentIndex;

/// Maximum number of symbols listed in a single log message
const MAX_LOGGED_SYMBOLS: usize = 20;

fn summarize_symbols(symbols: &[String]) -> String {
    let mut summary = symbols.iter().take(MAX_LOGGED_SYMBOLS).join(",");
    if symbols.len() > MAX_LOGGED_SYMBOLS {
        summary += ",...";
    }
    summary
}

fn get_purity(settings: &cli::CallSettings) -> Result<f64, Box<dyn error::Error>> {
    let purity = match (&settings.purity_input.purity, &settings.purity_input.purity_file) {
        (Some(purity), _) => *purity,
        (None, Some(purity_filename)) => read_purity_file(purity_filename)?,
        (None, None) => return Err("No tumor purity specified".into()),
    };
    Ok(purity)
}

fn log_cutoffs(cutoffs: &Cutoffs) {
    info!("Log2 ratio cutoffs for purity {}:", cutoffs.purity);
    for (name, value) in cutoffs.named_values() {
        info!("  {name}: {value:.4}");
    }
}

/// Run the gene and chromosome arm copy number calling pipeline for one sample
///
pub fn run_call(
    shared_settings: &cli::SharedSettings,
    settings: &cli::CallSettings,
) -> Result<(), Box<dyn error::Error>> {
    let output_dir: &Utf8Path = &settings.output_dir;
    cli::write_call_settings(output_dir, settings)?;

    let sample_name = settings.get_sample_name();
    info!("Calling copy number states for sample '{sample_name}'");

    let purity = get_purity(settings)?;
    let cutoffs = compute_cutoffs(purity, &settings.cutoff_args.to_cutoff_settings())?;
    log_cutoffs(&cutoffs);
    write_cutoffs_file(output_dir, &cutoffs)?;

    let segments = read_segments(&settings.segments_filename)?;
    let genes = read_genes(&settings.genes_filename)?;
    let cancer_genes = read_cancer_genes(&settings.cancer_genes_filename)?;
    let centromeres = read_centromeres(&settings.centromeres_filename)?;
    info!(
        "Read {} segments, {} genes, {} cancer gene symbols and {} centromeres",
        segments.len(),
        genes.len(),
        cancer_genes.len(),
        centromeres.len()
    );

    let worker_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(shared_settings.thread_count)
        .build()?;

    let segment_index = SegmentIndex::new(&segments);

    info!("Projecting segment log2 ratios onto genes");
    let gene_result = worker_pool.install(|| project_genes(&segment_index, &genes, &cutoffs));

    if !gene_result.duplicate_symbols.is_empty() {
        warn!(
            "Skipped {} gene records with a previously seen symbol",
            gene_result.duplicate_symbols.len()
        );
        debug!(
            "Duplicate gene symbols: {}",
            summarize_symbols(&gene_result.duplicate_symbols)
        );
    }
    if !gene_result.no_overlap_symbols.is_empty() {
        info!(
            "{} genes have no overlapping segment and are excluded from gene tables",
            gene_result.no_overlap_symbols.len()
        );
        debug!(
            "Genes without segment overlap: {}",
            summarize_symbols(&gene_result.no_overlap_symbols)
        );
    }

    let gene_calls = &gene_result.gene_calls;
    let oncogenic_calls = filter_oncogenic(gene_calls, &cancer_genes);
    let oncogenic_non_diploid_calls = filter_non_diploid(&oncogenic_calls);
    info!(
        "Called {} genes, including {} cancer genes of which {} are non-diploid",
        gene_calls.len(),
        oncogenic_calls.len(),
        oncogenic_non_diploid_calls.len()
    );

    write_gene_log2_file(output_dir, sample_name, gene_calls)?;
    write_gene_cna_file(
        output_dir,
        GENE_CNA_FILENAME,
        "gene copy number calls",
        sample_name,
        gene_calls,
    )?;
    write_gene_cna_file(
        output_dir,
        ONCOGENIC_CNA_FILENAME,
        "cancer gene copy number calls",
        sample_name,
        &oncogenic_calls,
    )?;
    write_gene_cna_file(
        output_dir,
        ONCOGENIC_NON_DIPLOID_CNA_FILENAME,
        "non-diploid cancer gene copy number calls",
        sample_name,
        &oncogenic_non_diploid_calls,
    )?;

    info!("Aggregating segment log2 ratios over chromosome arms");
    let arm_result = worker_pool.install(|| aggregate_arms(&segments, &centromeres, &cutoffs));
    if !arm_result.unknown_chromosome_errors.is_empty() {
        warn!(
            "Skipped {} segments on chromosomes without a centromere position in arm aggregation",
            arm_result.unknown_chromosome_errors.len()
        );
        for err in arm_result.unknown_chromosome_errors.iter() {
            debug!("{err}");
        }
    }
    write_arm_calls_file(output_dir, &arm_result.arm_calls)?;

    let fraction_genome_altered = get_fraction_genome_altered(
        &segments,
        settings.min_altered_log2_magnitude,
        settings.genome_size,
    );
    info!("Fraction genome altered: {fraction_genome_altered:.4}");

    let run_stats = CallRunStats {
        sample_name: sample_name.to_string(),
        cutoffs,
        segment_count: segments.len(),
        fraction_genome_altered,
        gene_stats: GeneStats {
            input_gene_count: genes.len(),
            called_gene_count: gene_calls.len(),
            no_overlap_gene_count: gene_result.no_overlap_symbols.len(),
            duplicate_symbol_count: gene_result.duplicate_symbols.len(),
            state_counts: get_state_counts(gene_calls.iter().map(|x| x.call)),
            oncogenic_gene_count: oncogenic_calls.len(),
            oncogenic_non_diploid_gene_count: oncogenic_non_diploid_calls.len(),
        },
        arm_stats: ArmStats {
            called_arm_count: arm_result.arm_calls.len(),
            state_counts: get_state_counts(arm_result.arm_calls.iter().map(|x| x.call)),
            unknown_chromosome_segment_count: arm_result.unknown_chromosome_errors.len(),
        },
    };
    write_call_run_stats(output_dir, &run_stats)?;

    Ok(())
}

/// Write the log2 ratio cutoff table for one purity value to stdout
///
pub fn run_cutoffs(settings: &cli::CutoffsSettings) -> Result<(), Box<dyn error::Error>> {
    let cutoffs = compute_cutoffs(settings.purity, &settings.cutoff_args.to_cutoff_settings())?;
    write_cutoffs_table(std::io::stdout().lock(), &cutoffs)?;
    Ok(())
}
