//! Readers for the tab-delimited sample and reference tables
//!

use std::collections::HashSet;
use std::str::FromStr;

use camino::Utf8Path;
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use simple_error::{SimpleResult, bail, try_with};

use crate::genome_features::{Centromere, Gene, Segment};

const SEGMENT_CHROM_COLUMNS: &[&str] = &["chrom", "chromosome", "chr"];
const SEGMENT_START_COLUMNS: &[&str] = &["loc.start", "start", "start.pos"];
const SEGMENT_END_COLUMNS: &[&str] = &["loc.end", "end", "end.pos"];
const SEGMENT_VALUE_COLUMNS: &[&str] = &["seg.mean", "log2", "log2_ratio", "log2ratio", "mean"];

const CANCER_GENE_HEADER_LABELS: &[&str] = &["hugo_symbol", "hugosymbol"];

fn get_tsv_reader(filename: &Utf8Path, label: &str, has_headers: bool) -> SimpleResult<Reader<std::fs::File>> {
    let reader = try_with!(
        ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(has_headers)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_path(filename),
        "Unable to open {label} file: '{filename}'"
    );
    Ok(reader)
}

fn get_line_number(record: &StringRecord) -> u64 {
    record.position().map(|x| x.line()).unwrap_or_default()
}

/// Parse one field of a table record, with an error message locating the field in the input file
///
fn parse_field<T: FromStr>(
    record: &StringRecord,
    column_index: usize,
    column_label: &str,
    filename: &Utf8Path,
) -> SimpleResult<T> {
    let line = get_line_number(record);
    let Some(field) = record.get(column_index) else {
        bail!("Missing {column_label} column on line {line} of file: '{filename}'");
    };
    match field.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => bail!(
            "Can't parse {column_label} value '{field}' on line {line} of file: '{filename}'"
        ),
    }
}

fn find_column(headers: &StringRecord, names: &[&str], role: &str, filename: &Utf8Path) -> SimpleResult<usize> {
    for (column_index, header) in headers.iter().enumerate() {
        let header = header.to_ascii_lowercase();
        if names.contains(&header.as_str()) {
            return Ok(column_index);
        }
    }
    bail!(
        "Can't find segment {role} column in header of file: '{filename}'. Expected one of: {}",
        names.join(", ")
    );
}

/// Read sample copy number segments
///
/// Input is a tab-delimited table with a header. Columns are identified by name, so that both
/// DNAcopy style (loc.start, loc.end, seg.mean) and simple (chrom, start, end, log2) layouts
/// are accepted. Coordinates are 1-indexed and fully-closed.
///
pub fn read_segments(filename: &Utf8Path) -> SimpleResult<Vec<Segment>> {
    info!("Reading copy number segments from file: '{filename}'");

    let mut reader = get_tsv_reader(filename, "segment", true)?;
    let headers = try_with!(
        reader.headers(),
        "Unable to read header from segment file: '{filename}'"
    )
    .clone();

    let chrom_column = find_column(&headers, SEGMENT_CHROM_COLUMNS, "chromosome", filename)?;
    let start_column = find_column(&headers, SEGMENT_START_COLUMNS, "start", filename)?;
    let end_column = find_column(&headers, SEGMENT_END_COLUMNS, "end", filename)?;
    let value_column = find_column(&headers, SEGMENT_VALUE_COLUMNS, "log2 ratio", filename)?;

    let mut segments = Vec::new();
    for result in reader.records() {
        let record = try_with!(result, "Failed to parse record from segment file: '{filename}'");
        let line = get_line_number(&record);
        let chrom = parse_field::<String>(&record, chrom_column, "chromosome", filename)?;
        let start = parse_field::<i64>(&record, start_column, "start", filename)?;
        let end = parse_field::<i64>(&record, end_column, "end", filename)?;
        let log2_ratio = parse_field::<f64>(&record, value_column, "log2 ratio", filename)?;
        let segment = try_with!(
            Segment::new(&chrom, start, end, log2_ratio),
            "Invalid segment on line {line} of file: '{filename}'"
        );
        segments.push(segment);
    }
    Ok(segments)
}

/// Read gene coordinates from a headerless 'chrom start end symbol' bed table
///
/// Coordinates follow the bed convention: 0-indexed, half-closed.
///
pub fn read_genes(filename: &Utf8Path) -> SimpleResult<Vec<Gene>> {
    info!("Reading gene coordinates from file: '{filename}'");

    let mut reader = get_tsv_reader(filename, "gene coordinate", false)?;
    let mut genes = Vec::new();
    for result in reader.records() {
        let record = try_with!(
            result,
            "Failed to parse record from gene coordinate file: '{filename}'"
        );
        let line = get_line_number(&record);
        let chrom = parse_field::<String>(&record, 0, "chromosome", filename)?;
        let start = parse_field::<i64>(&record, 1, "start", filename)?;
        let end = parse_field::<i64>(&record, 2, "end", filename)?;
        let symbol = parse_field::<String>(&record, 3, "gene symbol", filename)?;
        let gene = try_with!(
            Gene::new(&symbol, &chrom, start, end),
            "Invalid gene on line {line} of file: '{filename}'"
        );
        genes.push(gene);
    }
    Ok(genes)
}

/// Read the cancer gene symbol list
///
/// Symbols are taken from the first column, an optional 'Hugo_Symbol' header is skipped.
///
pub fn read_cancer_genes(filename: &Utf8Path) -> SimpleResult<HashSet<String>> {
    info!("Reading cancer gene list from file: '{filename}'");

    let mut reader = get_tsv_reader(filename, "cancer gene list", false)?;
    let mut cancer_genes = HashSet::new();
    for (record_index, result) in reader.records().enumerate() {
        let record = try_with!(
            result,
            "Failed to parse record from cancer gene list file: '{filename}'"
        );
        let Some(symbol) = record.get(0) else {
            continue;
        };
        if symbol.is_empty() {
            continue;
        }
        if record_index == 0 && CANCER_GENE_HEADER_LABELS.contains(&symbol.to_ascii_lowercase().as_str()) {
            continue;
        }
        cancer_genes.insert(symbol.to_string());
    }

    if cancer_genes.is_empty() {
        warn!("No gene symbols found in cancer gene list file: '{filename}'");
    }
    Ok(cancer_genes)
}

/// Read centromere positions from a headerless 'chrom position' table
///
pub fn read_centromeres(filename: &Utf8Path) -> SimpleResult<Vec<Centromere>> {
    info!("Reading centromere positions from file: '{filename}'");

    let mut reader = get_tsv_reader(filename, "centromere", false)?;
    let mut centromeres = Vec::new();
    let mut chroms = HashSet::new();
    for result in reader.records() {
        let record = try_with!(result, "Failed to parse record from centromere file: '{filename}'");
        let line = get_line_number(&record);
        let chrom = parse_field::<String>(&record, 0, "chromosome", filename)?;
        let position = parse_field::<i64>(&record, 1, "position", filename)?;
        if !chroms.insert(chrom.clone()) {
            bail!("Duplicate chromosome '{chrom}' on line {line} of centromere file: '{filename}'");
        }
        let centromere = try_with!(
            Centromere::new(&chrom, position),
            "Invalid centromere on line {line} of file: '{filename}'"
        );
        centromeres.push(centromere);
    }
    Ok(centromeres)
}

/// Read tumor purity from a file containing a single floating point value
///
pub fn read_purity_file(filename: &Utf8Path) -> SimpleResult<f64> {
    info!("Reading tumor purity from file: '{filename}'");

    let content = try_with!(
        std::fs::read_to_string(filename),
        "Unable to read purity file: '{filename}'"
    );
    let content = content.trim();
    match content.parse::<f64>() {
        Ok(x) => Ok(x),
        Err(_) => bail!("Can't parse purity value '{content}' from file: '{filename}'"),
    }
}
