//! Letter-to-audio lookup for callers that announce predictions.

use std::path::{Path, PathBuf};

/// Resolve the audio file for a letter.
///
/// Pure lookup: letters map to `<directory>/<LETTER>.mp3`, anything else
/// (including the unknown-label sentinel) maps to `None`. No filesystem
/// access happens here; the caller decides what a missing file means.
#[must_use]
pub fn letter_audio_path(directory: &Path, letter: char) -> Option<PathBuf> {
    if !letter.is_ascii_alphabetic() {
        return None;
    }
    Some(directory.join(format!("{}.mp3", letter.to_ascii_uppercase())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::UNKNOWN_LABEL;

    #[test]
    fn test_letters_resolve() {
        let dir = Path::new("assets/audio");
        assert_eq!(letter_audio_path(dir, 'A'), Some(PathBuf::from("assets/audio/A.mp3")));
        assert_eq!(letter_audio_path(dir, 'z'), Some(PathBuf::from("assets/audio/Z.mp3")));
    }

    #[test]
    fn test_non_letters_do_not() {
        let dir = Path::new("assets/audio");
        assert_eq!(letter_audio_path(dir, UNKNOWN_LABEL), None);
        assert_eq!(letter_audio_path(dir, '3'), None);
        assert_eq!(letter_audio_path(dir, ' '), None);
    }
}
