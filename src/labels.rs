//! Class-index to letter decoding.
//!
//! Trained models emit class indices; the matching label encoder is exported
//! as a JSON array of letters in index order. When no encoder artifact is
//! available, an index-to-letter fallback maps 0–25 to A–Z. That fallback is
//! only valid for exactly 26 classes in alphabetical order, so any index it
//! cannot place decodes to the sentinel [`UNKNOWN_LABEL`] rather than
//! wrapping.

use crate::{
    constants::{ALPHABET_LEN, UNKNOWN_LABEL},
    Error, Result,
};
use std::fs;
use std::path::Path;

/// Decodes model class indices into letter labels
#[derive(Debug, Clone)]
pub enum LabelCodec {
    /// Explicit encoder: letters in trained index order
    Encoder(Vec<char>),
    /// Positional fallback: index 0–25 maps to A–Z
    IndexToLetter,
}

impl LabelCodec {
    /// Load an explicit encoder from a JSON array of single-letter strings
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, is empty, or
    /// contains an entry that is not a single letter.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::info!("Loading label encoder from {}", path.as_ref().display());
        let content = fs::read_to_string(path)?;
        let entries: Vec<String> = serde_json::from_str(&content)?;
        if entries.is_empty() {
            return Err(Error::ModelValidationError("label encoder is empty".to_string()));
        }

        let mut labels = Vec::with_capacity(entries.len());
        for entry in &entries {
            let mut chars = entry.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => labels.push(c.to_ascii_uppercase()),
                _ => {
                    return Err(Error::ModelValidationError(format!(
                        "label encoder entry {entry:?} is not a single letter"
                    )))
                }
            }
        }
        Ok(Self::Encoder(labels))
    }

    /// Decode a class index into a letter
    ///
    /// Out-of-range indices decode to [`UNKNOWN_LABEL`], never wrap.
    #[must_use]
    pub fn decode(&self, index: usize) -> char {
        match self {
            Self::Encoder(labels) => labels.get(index).copied().unwrap_or(UNKNOWN_LABEL),
            Self::IndexToLetter => {
                if index < ALPHABET_LEN {
                    (b'A' + index as u8) as char
                } else {
                    UNKNOWN_LABEL
                }
            }
        }
    }

    /// Number of classes the codec can decode.
    ///
    /// Checked against the model's own class count when the classifier
    /// adapters are assembled.
    #[must_use]
    pub fn class_count(&self) -> usize {
        match self {
            Self::Encoder(labels) => labels.len(),
            Self::IndexToLetter => ALPHABET_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_decodes_in_order() {
        let codec = LabelCodec::Encoder(vec!['A', 'E', 'M', 'N', 'O', 'S', 'T']);
        assert_eq!(codec.decode(0), 'A');
        assert_eq!(codec.decode(5), 'S');
        assert_eq!(codec.decode(7), UNKNOWN_LABEL);
        assert_eq!(codec.class_count(), 7);
    }

    #[test]
    fn test_index_to_letter_fallback() {
        let codec = LabelCodec::IndexToLetter;
        assert_eq!(codec.decode(0), 'A');
        assert_eq!(codec.decode(25), 'Z');
        // Out-of-range indices must not wrap around
        assert_eq!(codec.decode(26), UNKNOWN_LABEL);
        assert_eq!(codec.decode(1000), UNKNOWN_LABEL);
    }
}
