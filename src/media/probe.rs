//! Classify an input path by extension.

use crate::error::PipelineError;
use std::path::Path;

/// Conversion path for an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Video container (.mp4): the audio track must be extracted.
    VideoContainer,
    /// Compressed audio (.ogg, .mp3): decode to PCM.
    CompressedAudio,
    /// Already linear PCM (.wav): pass through.
    LinearPcm,
}

/// Classify `path` by its extension, case-insensitively. No side effects.
/// Unsupported extensions fail with `UnsupportedFormat` before anything else
/// in the pipeline runs.
pub fn probe(path: &Path) -> Result<MediaKind, PipelineError> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "mp4" => Ok(MediaKind::VideoContainer),
        "ogg" | "mp3" => Ok(MediaKind::CompressedAudio),
        "wav" => Ok(MediaKind::LinearPcm),
        _ => Err(PipelineError::UnsupportedFormat {
            extension: if extension.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{}", extension)
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn classifies_supported_extensions() {
        assert_eq!(probe(&PathBuf::from("a.mp4")).unwrap(), MediaKind::VideoContainer);
        assert_eq!(probe(&PathBuf::from("a.ogg")).unwrap(), MediaKind::CompressedAudio);
        assert_eq!(probe(&PathBuf::from("a.mp3")).unwrap(), MediaKind::CompressedAudio);
        assert_eq!(probe(&PathBuf::from("a.wav")).unwrap(), MediaKind::LinearPcm);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(probe(&PathBuf::from("A.MP4")).unwrap(), MediaKind::VideoContainer);
        assert_eq!(probe(&PathBuf::from("a.Wav")).unwrap(), MediaKind::LinearPcm);
    }

    #[test]
    fn rejects_unsupported_extensions() {
        for name in ["a.mkv", "a.flac", "a.txt", "noextension"] {
            assert!(matches!(
                probe(&PathBuf::from(name)),
                Err(PipelineError::UnsupportedFormat { .. })
            ));
        }
    }
}
