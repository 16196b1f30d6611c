//! Writing augmented tables: output path convention, rate formatting and CSV emission.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error::Result;
use crate::estimation::{RowOutcome, RowResult};

/// Header row of the output table.
pub const OUTPUT_HEADER: [&str; 4] = ["name", "f", "N", "u"];

/// Suffix appended to the input file stem.
pub const OUTPUT_SUFFIX: &str = "_output_file.csv";

/// Derives the output path: the input file name up to its first `.`, followed
/// by [`OUTPUT_SUFFIX`], in the input's directory.
pub fn output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
}

/// Formats a rate the way a shortest round-trip `repr` does: positional
/// notation for exponents in `-4..16`, scientific with a signed two-digit
/// exponent otherwise.
pub fn format_rate(rate: f64) -> String {
    if rate.is_nan() {
        return "nan".to_string();
    }
    if rate.is_infinite() {
        return if rate > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{rate:e}");
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if rate == 0.0 || (-4..16).contains(&exponent) {
        let positional = rate.to_string();
        if positional.contains('.') {
            positional
        } else {
            format!("{positional}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// Writes the augmented table to `writer`.
///
/// Incomplete rows are written as the single field `missing input`.
pub fn write_results<W: Write>(writer: W, results: &[RowResult]) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);
    writer.write_record(OUTPUT_HEADER)?;
    for result in results {
        match result.outcome {
            RowOutcome::MissingInput => writer.write_record([result.outcome.to_string()])?,
            _ => {
                let u = result.outcome.to_string();
                writer.write_record(result.fields.iter().map(String::as_str).chain([u.as_str()]))?
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes the augmented table to a new file at `path`.
pub fn write_results_to_path(path: &Path, results: &[RowResult]) -> Result<()> {
    let file = File::create(path)?;
    write_results(file, results)
}
