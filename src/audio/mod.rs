//! PCM audio sources and fixed-length segmentation.

mod segment;

pub use segment::{total_segments, AudioSource, Segment, SegmentCutter};
