//! Split a WAV source into fixed-length, independently decodable segments.

use crate::error::PipelineError;
use crate::pipeline::CancelFlag;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, warn};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// An opened linear-PCM source.
pub struct AudioSource {
    reader: WavReader<BufReader<File>>,
    spec: WavSpec,
    frames: u32,
}

impl AudioSource {
    pub fn open(path: &Path) -> Result<Self, PipelineError> {
        let reader = WavReader::open(path).map_err(|e| PipelineError::SourceOpen {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let spec = reader.spec();
        let frames = reader.duration();
        if spec.sample_rate == 0 {
            return Err(PipelineError::SourceOpen {
                path: path.display().to_string(),
                message: "sample rate is zero".to_string(),
            });
        }
        Ok(Self { reader, spec, frames })
    }

    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    /// Total frame count (samples per channel).
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.spec.sample_rate as f64
    }
}

/// One bounded slice of the source, materialized as its own WAV file.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Position in the sequence, 0-based.
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
    pub path: PathBuf,
}

/// Number of segments a source of `duration_secs` yields at `segment_length`:
/// `ceil(duration / length)`.
pub fn total_segments(duration_secs: f64, segment_length_secs: f64) -> usize {
    if duration_secs <= 0.0 || segment_length_secs <= 0.0 {
        return 0;
    }
    (duration_secs / segment_length_secs).ceil() as usize
}

/// Lazy iterator of segments over an opened source.
///
/// Walks windows `[kL, min((k+1)L, D))` in strictly increasing start order;
/// the final window may be shorter than `L` but is never empty. Each window's
/// frames are written to `segment_{start_ms}_{end_ms}.wav` in `out_dir`,
/// carrying the source's channel count, sample rate and sample width.
///
/// Windows tile the source, so frames are read sequentially; no seeking is
/// needed. Cancellation is polled before each window: once the flag is set,
/// no further segments are produced, and segments already emitted stand.
/// A window whose file cannot be written is logged and skipped; the iterator
/// carries on with the next window.
pub struct SegmentCutter {
    source: AudioSource,
    out_dir: PathBuf,
    segment_length_secs: f64,
    cancel: CancelFlag,
    duration_secs: f64,
    /// Next window index.
    next: usize,
    /// Absolute frame offset the reader currently sits at.
    frame_pos: u32,
}

impl SegmentCutter {
    pub fn new(
        source: AudioSource,
        out_dir: &Path,
        segment_length_secs: f64,
        cancel: CancelFlag,
    ) -> Self {
        let duration_secs = source.duration_secs();
        Self {
            source,
            out_dir: out_dir.to_path_buf(),
            segment_length_secs,
            cancel,
            duration_secs,
            next: 0,
            frame_pos: 0,
        }
    }

    fn frame_at(&self, secs: f64) -> u32 {
        let frame = (secs * self.source.spec.sample_rate as f64).round() as u32;
        frame.min(self.source.frames)
    }

    /// Read one window's samples and write them out. `Ok(None)` means the
    /// window could not be written and should be skipped.
    fn cut_window(&mut self, start_secs: f64, end_secs: f64) -> Result<Option<PathBuf>, hound::Error> {
        let frame_end = self.frame_at(end_secs);
        let frames_to_read = frame_end.saturating_sub(self.frame_pos);
        if frames_to_read == 0 {
            // Rounding residue shorter than one frame; not a segment.
            debug!("Window {:.3}s..{:.3}s holds no frames, dropped", start_secs, end_secs);
            return Ok(None);
        }
        let sample_count = frames_to_read as usize * self.source.spec.channels as usize;
        self.frame_pos = frame_end;

        let path = self.out_dir.join(format!(
            "segment_{}_{}.wav",
            (start_secs * 1000.0).round() as u64,
            (end_secs * 1000.0).round() as u64
        ));

        // Samples must be pulled off the reader even if the writer fails,
        // otherwise the next window would start at the wrong offset.
        match self.source.spec.sample_format {
            SampleFormat::Float => {
                let samples: Vec<f32> = self
                    .source
                    .reader
                    .samples::<f32>()
                    .take(sample_count)
                    .collect::<Result<Vec<_>, _>>()?;
                match write_segment_file(&path, self.source.spec, &samples) {
                    Ok(()) => Ok(Some(path)),
                    Err(e) => {
                        warn!("Skipping segment {}: {}", path.display(), e);
                        Ok(None)
                    }
                }
            }
            SampleFormat::Int => {
                let samples: Vec<i32> = self
                    .source
                    .reader
                    .samples::<i32>()
                    .take(sample_count)
                    .collect::<Result<Vec<_>, _>>()?;
                match write_segment_file(&path, self.source.spec, &samples) {
                    Ok(()) => Ok(Some(path)),
                    Err(e) => {
                        warn!("Skipping segment {}: {}", path.display(), e);
                        Ok(None)
                    }
                }
            }
        }
    }
}

fn write_segment_file<S: hound::Sample + Copy>(
    path: &Path,
    spec: WavSpec,
    samples: &[S],
) -> Result<(), hound::Error> {
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

impl Iterator for SegmentCutter {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        loop {
            if self.cancel.is_cancelled() {
                debug!("Segmentation cancelled before window {}", self.next);
                return None;
            }
            let start_secs = self.next as f64 * self.segment_length_secs;
            if start_secs >= self.duration_secs {
                return None;
            }
            let end_secs = (start_secs + self.segment_length_secs).min(self.duration_secs);
            let index = self.next;
            self.next += 1;

            match self.cut_window(start_secs, end_secs) {
                Ok(Some(path)) => {
                    debug!(
                        "Segment {} written: {:.1}s..{:.1}s -> {}",
                        index,
                        start_secs,
                        end_secs,
                        path.display()
                    );
                    return Some(Segment {
                        index,
                        start_secs,
                        end_secs,
                        path,
                    });
                }
                // Write failed; window skipped, keep going.
                Ok(None) => continue,
                Err(e) => {
                    warn!(
                        "Failed to read source frames for window {} ({:.1}s..{:.1}s): {}",
                        index, start_secs, end_secs, e
                    );
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_segments_rounds_up() {
        assert_eq!(total_segments(130.0, 60.0), 3);
        assert_eq!(total_segments(120.0, 60.0), 2);
        assert_eq!(total_segments(1.0, 60.0), 1);
        assert_eq!(total_segments(0.0, 60.0), 0);
    }

    #[test]
    fn open_rejects_missing_file() {
        let result = AudioSource::open(Path::new("/nonexistent/audio.wav"));
        assert!(matches!(result, Err(PipelineError::SourceOpen { .. })));
    }
}
