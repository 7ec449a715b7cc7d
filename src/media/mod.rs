//! Input format probing and conversion to linear PCM.

mod probe;
mod transcode;

pub use probe::{probe, MediaKind};
pub use transcode::transcode_to_wav;
