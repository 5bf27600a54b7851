//! Track decoder for raw landmark recordings.
//!
//! A recording is a flat run of little-endian `f32` samples, frame-major,
//! with no header: the frame count is `len / layout.frame_bytes()`. Bytes
//! past the last whole frame are dropped. Decoding copies every sample into
//! the returned [`Track`], so the source buffer can be released right after.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::layout::{FrameLayout, SAMPLE_BYTES};
use crate::track::Track;

#[derive(Debug, Clone, Default)]
pub struct TrackDecoder {
    layout: FrameLayout,
}

impl TrackDecoder {
    pub fn new(layout: FrameLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    /// Decode whole frames from `bytes`. Never fails; a short buffer yields fewer frames.
    pub fn decode(&self, bytes: &[u8]) -> Track {
        let frame_bytes = self.layout.frame_bytes();
        if frame_bytes == 0 {
            debug!(len = bytes.len(), "layout has zero-sized frames; decoding empty track");
            return Track::empty(self.layout.clone());
        }
        let frames = bytes.len() / frame_bytes;
        let used = frames * frame_bytes;
        let trailing = bytes.len() - used;
        if trailing > 0 {
            debug!(trailing, frames, "dropping incomplete trailing frame");
        }
        let samples: Vec<f32> = bytes[..used]
            .chunks_exact(SAMPLE_BYTES)
            .map(|b| {
                let mut tmp = [0u8; SAMPLE_BYTES];
                tmp.copy_from_slice(b);
                f32::from_le_bytes(tmp)
            })
            .collect();
        debug!(frames, "decoded track");
        Track::from_samples(self.layout.clone(), samples)
    }

    /// Read `r` to the end and decode it.
    pub fn decode_reader<R: Read>(&self, mut r: R) -> Result<Track> {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;
        Ok(self.decode(&buf))
    }

    pub fn decode_file(&self, path: impl AsRef<Path>) -> Result<Track> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading track");
        let rdr = BufReader::new(File::open(path)?);
        self.decode_reader(rdr)
    }
}
