//! Flex-sensor CSV datasets.
//!
//! Glove recordings use the `flex1..flex5,label,sample_id` schema: one row
//! per sample at the capture rate, a single uppercase letter label, and a
//! monotonically increasing recording id shared by all rows of one gesture.
//! This module reads and appends that format; talking to the physical glove
//! is out of scope.

use crate::{
    constants::NUM_FLEX_SENSORS,
    Error, Result,
};
use std::fs::OpenOptions;
use std::path::Path;

/// CSV header row for glove recordings
const HEADER: [&str; 7] = ["flex1", "flex2", "flex3", "flex4", "flex5", "label", "sample_id"];

/// One recorded glove sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Readings in finger order: thumb, index, middle, ring, pinky
    pub flex: [f32; NUM_FLEX_SENSORS],
    /// The letter being recorded
    pub label: char,
    /// Recording id; all rows of one gesture share it
    pub sample_id: u32,
}

/// Load every sample from a recording file
///
/// # Errors
///
/// Returns an error if the file cannot be read or a row is malformed.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<SensorSample>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut samples = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < HEADER.len() {
            return Err(Error::InvalidInput(format!(
                "row {} has {} columns, expected {}",
                row_idx + 1,
                record.len(),
                HEADER.len()
            )));
        }

        let mut flex = [0.0f32; NUM_FLEX_SENSORS];
        for (i, value) in flex.iter_mut().enumerate() {
            *value = record[i]
                .parse()
                .map_err(|_| Error::InvalidInput(format!("bad flex value {:?} in row {}", &record[i], row_idx + 1)))?;
        }

        let label_field = &record[NUM_FLEX_SENSORS];
        let label = parse_label(label_field)
            .ok_or_else(|| Error::InvalidInput(format!("bad label {label_field:?} in row {}", row_idx + 1)))?;

        let sample_id = record[NUM_FLEX_SENSORS + 1]
            .parse()
            .map_err(|_| Error::InvalidInput(format!("bad sample_id in row {}", row_idx + 1)))?;

        samples.push(SensorSample { flex, label, sample_id });
    }

    Ok(samples)
}

/// Next free recording id in a file (0 for a missing or empty file)
///
/// # Errors
///
/// Returns an error if an existing file cannot be parsed.
pub fn next_sample_id<P: AsRef<Path>>(path: P) -> Result<u32> {
    if !path.as_ref().exists() {
        return Ok(0);
    }
    let samples = load_samples(path)?;
    Ok(samples.iter().map(|s| s.sample_id + 1).max().unwrap_or(0))
}

/// Append one recorded gesture to a dataset file.
///
/// Creates the file with its header when missing and continues `sample_id`
/// from the existing maximum. Returns the id assigned to this recording.
///
/// # Errors
///
/// Returns an error if the label is not a letter, the file cannot be
/// written, or an existing file cannot be parsed.
pub fn append_recording<P: AsRef<Path>>(path: P, label: char, frames: &[[f32; NUM_FLEX_SENSORS]]) -> Result<u32> {
    let path = path.as_ref();
    if !label.is_ascii_alphabetic() {
        return Err(Error::InvalidInput(format!("label {label:?} is not a letter")));
    }
    let label = label.to_ascii_uppercase();

    let sample_id = next_sample_id(path)?;
    let is_new = !path.exists();

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if is_new {
        writer.write_record(HEADER)?;
    }

    for frame in frames {
        let mut row: Vec<String> = frame.iter().map(ToString::to_string).collect();
        row.push(label.to_string());
        row.push(sample_id.to_string());
        writer.write_record(&row)?;
    }
    writer.flush()?;

    log::info!("saved recording #{sample_id} ({} rows) for letter {label}", frames.len());
    Ok(sample_id)
}

fn parse_label(field: &str) -> Option<char> {
    let mut chars = field.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}
