//! Convert video/compressed-audio input to a linear-PCM WAV via ffmpeg.

use crate::error::PipelineError;
use crate::media::MediaKind;
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Produce a linear-PCM WAV for `input` at `output`.
///
/// - Video containers get their audio track extracted and rendered to PCM.
/// - Compressed audio is decoded to PCM.
/// - WAV input passes through unchanged: the original path is returned and
///   nothing is written or copied.
///
/// The input file is never deleted. Any ffmpeg failure (missing/corrupt
/// input, unsupported codec, disk full) surfaces as `ConversionFailed` and
/// the caller aborts the run.
pub fn transcode_to_wav(
    input: &Path,
    kind: MediaKind,
    output: &Path,
) -> Result<PathBuf, PipelineError> {
    if kind == MediaKind::LinearPcm {
        return Ok(input.to_path_buf());
    }
    if !input.exists() {
        return Err(PipelineError::ConversionFailed {
            message: format!("input not found: {}", input.display()),
        });
    }

    // -vn drops the video stream for .mp4 input and is harmless for audio-only
    // input, so both conversion paths share one invocation.
    let result = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(input)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg(output)
        .output();

    let output_info = result.map_err(|e| PipelineError::ConversionFailed {
        message: format!("failed to run ffmpeg: {}", e),
    })?;
    debug!(
        "ffmpeg exit={:?} for {} -> {}",
        output_info.status.code(),
        input.display(),
        output.display()
    );
    if !output_info.status.success() {
        let stderr = String::from_utf8_lossy(&output_info.stderr);
        let tail: String = stderr
            .lines()
            .rev()
            .take(3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join(" | ");
        return Err(PipelineError::ConversionFailed {
            message: if tail.is_empty() {
                format!("ffmpeg exited with {:?}", output_info.status.code())
            } else {
                tail
            },
        });
    }
    if !output.exists() {
        return Err(PipelineError::ConversionFailed {
            message: "ffmpeg reported success but produced no output file".to_string(),
        });
    }
    Ok(output.to_path_buf())
}
