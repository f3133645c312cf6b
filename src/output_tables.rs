//! Writers for the tab-delimited result tables
//!

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use log::info;
use simple_error::{SimpleResult, try_with};

use crate::arm_aggregation::ArmCall;
use crate::cutoffs::Cutoffs;
use crate::gene_projection::GeneCall;

pub const CUTOFFS_FILENAME: &str = "cna_cutoffs.txt";
pub const GENE_LOG2_FILENAME: &str = "data_log2CNA.txt";
pub const GENE_CNA_FILENAME: &str = "data_CNA.txt";
pub const ONCOGENIC_CNA_FILENAME: &str = "data_CNA_oncoKBgenes.txt";
pub const ONCOGENIC_NON_DIPLOID_CNA_FILENAME: &str = "data_CNA_oncoKBgenes_nonDiploid.txt";
pub const ARM_CALLS_FILENAME: &str = "arm_level_calls.txt";

const GENE_SYMBOL_HEADER: &str = "Hugo_Symbol";

fn create_table_file(filename: &Utf8Path, label: &str) -> SimpleResult<BufWriter<File>> {
    info!("Writing {label} to file: '{filename}'");

    let f = try_with!(
        File::create(filename),
        "Unable to create {label} file: '{filename}'"
    );
    Ok(BufWriter::new(f))
}

pub fn write_cutoffs_table<W: Write>(mut f: W, cutoffs: &Cutoffs) -> std::io::Result<()> {
    writeln!(f, "Cutoff\tLog2Ratio")?;
    for (name, value) in cutoffs.named_values() {
        writeln!(f, "{name}\t{value}")?;
    }
    f.flush()
}

fn write_gene_log2_table<W: Write>(mut f: W, sample_name: &str, gene_calls: &[GeneCall]) -> std::io::Result<()> {
    writeln!(f, "{GENE_SYMBOL_HEADER}\t{sample_name}")?;
    for gene_call in gene_calls {
        writeln!(f, "{}\t{:.4}", gene_call.symbol, gene_call.log2_value)?;
    }
    f.flush()
}

fn write_gene_cna_table<W: Write>(mut f: W, sample_name: &str, gene_calls: &[GeneCall]) -> std::io::Result<()> {
    writeln!(f, "{GENE_SYMBOL_HEADER}\t{sample_name}")?;
    for gene_call in gene_calls {
        writeln!(f, "{}\t{}", gene_call.symbol, gene_call.call.code())?;
    }
    f.flush()
}

/// Arm calls are written without a header line
fn write_arm_calls_table<W: Write>(mut f: W, arm_calls: &[ArmCall]) -> std::io::Result<()> {
    for arm_call in arm_calls {
        writeln!(f, "{}\t{}\t{}", arm_call.chrom, arm_call.arm, arm_call.call.code())?;
    }
    f.flush()
}

pub fn write_cutoffs_file(output_dir: &Utf8Path, cutoffs: &Cutoffs) -> SimpleResult<()> {
    let filename = output_dir.join(CUTOFFS_FILENAME);
    let f = create_table_file(&filename, "log2 ratio cutoffs")?;
    try_with!(
        write_cutoffs_table(f, cutoffs),
        "Failed writing log2 ratio cutoffs file: '{filename}'"
    );
    Ok(())
}

pub fn write_gene_log2_file(
    output_dir: &Utf8Path,
    sample_name: &str,
    gene_calls: &[GeneCall],
) -> SimpleResult<()> {
    let filename = output_dir.join(GENE_LOG2_FILENAME);
    let f = create_table_file(&filename, "gene log2 ratios")?;
    try_with!(
        write_gene_log2_table(f, sample_name, gene_calls),
        "Failed writing gene log2 ratio file: '{filename}'"
    );
    Ok(())
}

/// Write integer copy number calls for the given genes
///
/// The same layout is used for the full gene set and each filtered gene subset.
///
pub fn write_gene_cna_file(
    output_dir: &Utf8Path,
    table_filename: &str,
    label: &str,
    sample_name: &str,
    gene_calls: &[GeneCall],
) -> SimpleResult<()> {
    let filename = output_dir.join(table_filename);
    let f = create_table_file(&filename, label)?;
    try_with!(
        write_gene_cna_table(f, sample_name, gene_calls),
        "Failed writing {label} file: '{filename}'"
    );
    Ok(())
}

pub fn write_arm_calls_file(output_dir: &Utf8Path, arm_calls: &[ArmCall]) -> SimpleResult<()> {
    let filename = output_dir.join(ARM_CALLS_FILENAME);
    let f = create_table_file(&filename, "chromosome arm calls")?;
    try_with!(
        write_arm_calls_table(f, arm_calls),
        "Failed writing chromosome arm calls file: '{filename}'"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm_aggregation::ArmLabel;
    use crate::cna_state::CnaState;
    use crate::cutoffs::{CutoffSettings, compute_cutoffs};

    fn gene_calls() -> Vec<GeneCall> {
        vec![
            GeneCall {
                symbol: "ERBB2".to_string(),
                log2_value: 1.23456,
                call: CnaState::Amplification,
            },
            GeneCall {
                symbol: "PTEN".to_string(),
                log2_value: -0.5,
                call: CnaState::ShallowDeletion,
            },
        ]
    }

    #[test]
    fn test_write_gene_tables() {
        let mut buf = Vec::new();
        write_gene_log2_table(&mut buf, "S1", &gene_calls()).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Hugo_Symbol\tS1\nERBB2\t1.2346\nPTEN\t-0.5000\n"
        );

        let mut buf = Vec::new();
        write_gene_cna_table(&mut buf, "S1", &gene_calls()).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Hugo_Symbol\tS1\nERBB2\t2\nPTEN\t-1\n"
        );
    }

    #[test]
    fn test_write_arm_calls_table() {
        let arm_calls = vec![ArmCall {
            chrom: "chr8".to_string(),
            arm: ArmLabel::Q,
            log2_value: 0.4,
            covered_length: 1000,
            call: CnaState::Gain,
        }];
        let mut buf = Vec::new();
        write_arm_calls_table(&mut buf, &arm_calls).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "chr8\tq\t1\n");
    }

    #[test]
    fn test_write_cutoffs_table() {
        let cutoffs = compute_cutoffs(1.0, &CutoffSettings::default()).unwrap();
        let mut buf = Vec::new();
        write_cutoffs_table(&mut buf, &cutoffs).unwrap();
        let content = String::from_utf8(buf).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "LOG_R_HMZD\t-2");
        assert!(lines[3].starts_with("LOG_R_NEUTRAL\t"));
    }

    #[test]
    fn test_write_gene_cna_file() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = Utf8Path::from_path(dir.path()).unwrap();
        write_gene_cna_file(output_dir, GENE_CNA_FILENAME, "gene calls", "S1", &gene_calls()).unwrap();
        let content = std::fs::read_to_string(output_dir.join(GENE_CNA_FILENAME)).unwrap();
        assert_eq!(content.lines().count(), 3);
    }
}
