use std::num::NonZeroU64;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use const_format::concatcp;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail, try_with};

use super::cutoffs::{CutoffArgs, validate_cutoff_args};
use super::utils::{check_required_filename, resolve_data_path};
use crate::genome_altered::{DEFAULT_GENOME_SIZE, DEFAULT_MIN_ALTERED_LOG2_MAGNITUDE};

pub const SETTINGS_FILENAME: &str = "call.settings.json";

#[derive(Args, Deserialize, Serialize)]
#[group(required = true, multiple = false)]
pub struct PurityInputGroup {
    /// Tumor purity, in the range (0,1]
    #[arg(long)]
    pub purity: Option<f64>,

    /// File containing the tumor purity as a single value, in the range (0,1]
    #[arg(long, value_name = "FILE")]
    pub purity_file: Option<Utf8PathBuf>,
}

#[derive(Args, Deserialize, Serialize)]
pub struct CallSettings {
    /// Directory for all call command output (must not already exist)
    #[arg(long, value_name = "DIR", default_value = concatcp!(env!("CARGO_PKG_NAME"), "_call_output"))]
    pub output_dir: Utf8PathBuf,

    /// Segmented log2 copy ratios for the tumor sample, as a tab-delimited table with header
    ///
    /// Columns are identified by name: chromosome ('chrom'), start ('loc.start' or 'start'),
    /// end ('loc.end' or 'end') and log2 ratio ('seg.mean' or 'log2'). Coordinates are 1-indexed
    /// and fully-closed.
    ///
    #[arg(long = "segments", value_name = "FILE")]
    pub segments_filename: Utf8PathBuf,

    /// Gene coordinates, as a headerless 'chrom start end symbol' bed table.
    ///
    /// Coordinates follow the bed convention: 0-indexed and half-closed.
    ///
    /// Relative paths are resolved against the reference data directory if one is given.
    ///
    #[arg(long = "genes", value_name = "FILE")]
    pub genes_filename: Utf8PathBuf,

    /// Cancer gene symbol list, one symbol per line or in the first column of a table.
    ///
    /// Relative paths are resolved against the reference data directory if one is given.
    ///
    #[arg(long = "cancer-genes", value_name = "FILE")]
    pub cancer_genes_filename: Utf8PathBuf,

    /// Centromere positions, as a headerless 'chrom position' table.
    ///
    /// Relative paths are resolved against the reference data directory if one is given.
    ///
    #[arg(long = "centromeres", value_name = "FILE")]
    pub centromeres_filename: Utf8PathBuf,

    /// Base directory for the gene, cancer gene and centromere reference files
    #[arg(long, value_name = "DIR", env = "CNACALL_DATA_DIR")]
    pub data_dir: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub purity_input: PurityInputGroup,

    /// Sample name used in gene table headers. Defaults to the segment file name up to the first '.'
    #[arg(long)]
    pub sample_name: Option<String>,

    #[command(flatten)]
    pub cutoff_args: CutoffArgs,

    /// Minimum absolute segment log2 ratio counted as altered in the fraction genome altered
    #[arg(long, default_value_t = DEFAULT_MIN_ALTERED_LOG2_MAGNITUDE)]
    pub min_altered_log2_magnitude: f64,

    /// Nominal genome size used as the fraction genome altered denominator
    #[arg(long, default_value_t = DEFAULT_GENOME_SIZE)]
    pub genome_size: NonZeroU64,
}

impl CallSettings {
    /// Sample name for output tables, only valid after settings validation
    pub fn get_sample_name(&self) -> &str {
        self.sample_name.as_deref().unwrap_or_default()
    }
}

fn get_default_sample_name(segments_filename: &Utf8Path) -> String {
    let file_name = segments_filename.file_name().unwrap_or_default();
    let sample_name = file_name.split('.').next().unwrap_or_default();
    if sample_name.is_empty() {
        "SAMPLE".to_string()
    } else {
        sample_name.to_string()
    }
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes that the logger is not setup
///
pub fn validate_and_fix_call_settings(mut settings: CallSettings) -> SimpleResult<CallSettings> {
    if let Some(data_dir) = &settings.data_dir {
        if !data_dir.is_dir() {
            bail!("Reference data directory does not exist or is not a directory: '{data_dir}'");
        }
    }

    let data_dir = settings.data_dir.as_deref();
    settings.genes_filename = resolve_data_path(data_dir, &settings.genes_filename);
    settings.cancer_genes_filename = resolve_data_path(data_dir, &settings.cancer_genes_filename);
    settings.centromeres_filename = resolve_data_path(data_dir, &settings.centromeres_filename);

    check_required_filename(&settings.segments_filename, "segment")?;
    check_required_filename(&settings.genes_filename, "gene coordinate")?;
    check_required_filename(&settings.cancer_genes_filename, "cancer gene list")?;
    check_required_filename(&settings.centromeres_filename, "centromere")?;

    if let Some(purity) = settings.purity_input.purity {
        if !(purity > 0.0 && purity <= 1.0) {
            bail!("--purity argument must be in the range (0,1], observed: {purity}");
        }
    }
    if let Some(purity_filename) = &settings.purity_input.purity_file {
        check_required_filename(purity_filename, "purity")?;
    }

    validate_cutoff_args(&settings.cutoff_args)?;

    if !(settings.min_altered_log2_magnitude >= 0.0) {
        bail!("--min-altered-log2-magnitude argument must be non-negative");
    }

    if settings.sample_name.is_none() {
        settings.sample_name = Some(get_default_sample_name(&settings.segments_filename));
    }

    Ok(settings)
}

/// Write call settings out in json format
pub fn write_call_settings(output_dir: &Utf8Path, settings: &CallSettings) -> SimpleResult<()> {
    use log::info;

    let filename = output_dir.join(SETTINGS_FILENAME);

    info!("Writing call settings to file: '{filename}'");

    let f = try_with!(
        std::fs::File::create(&filename),
        "Unable to create call settings json file: '{filename}'"
    );

    try_with!(
        serde_json::to_writer_pretty(&f, &settings),
        "Unable to write call settings json file: '{filename}'"
    );
    Ok(())
}
