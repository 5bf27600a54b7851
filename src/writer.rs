//! Writing tracks in the recording format read by [`crate::decoder`].
use std::io::Write;

use crate::error::{Error, Result};
use crate::layout::{FrameLayout, Group};
use crate::track::{Frame, Track};

/// Streams whole frames to `W` as little-endian `f32`.
pub struct TrackWriter<W: Write> {
    inner: W,
    layout: FrameLayout,
    frames: usize,
}

impl<W: Write> TrackWriter<W> {
    pub fn new(inner: W, layout: FrameLayout) -> Self {
        Self { inner, layout, frames: 0 }
    }

    /// Write one frame's flat samples; the length must match the layout.
    pub fn write_samples(&mut self, samples: &[f32]) -> Result<()> {
        let expected = self.layout.frame_len();
        if samples.len() != expected {
            return Err(Error::FrameLength { expected, actual: samples.len() });
        }
        for v in samples {
            self.inner.write_all(&v.to_le_bytes())?;
        }
        self.frames += 1;
        Ok(())
    }

    pub fn write_frame(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.write_samples(frame.samples())
    }

    pub fn frames_written(&self) -> usize {
        self.frames
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Serialize a whole track to bytes.
pub fn encode_track(track: &Track) -> Vec<u8> {
    track.samples().iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Owned, zero-initialised frame that can be filled joint by joint.
#[derive(Debug, Clone)]
pub struct FrameBuf {
    layout: FrameLayout,
    samples: Vec<f32>,
}

impl FrameBuf {
    pub fn new(layout: FrameLayout) -> Self {
        let samples = vec![0.0; layout.frame_len()];
        Self { layout, samples }
    }

    /// Copy `values` into joint `index` of `group`. Extra values are ignored,
    /// missing ones left untouched. Returns false if the joint does not exist.
    pub fn set_joint(&mut self, group: Group, index: usize, values: &[f32]) -> bool {
        let Some(spec) = self.layout.spec(group) else { return false };
        if index >= spec.joints {
            return false;
        }
        let start = spec.offset + index * spec.components;
        let n = values.len().min(spec.components);
        self.samples[start..start + n].copy_from_slice(&values[..n]);
        true
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::TrackDecoder;

    #[test]
    fn written_frames_decode_back() {
        let layout = FrameLayout::holistic();
        let mut buf = FrameBuf::new(layout.clone());
        let mut w = TrackWriter::new(Vec::new(), layout.clone());

        assert!(buf.set_joint(Group::Pose, 0, &[0.5, 0.25, -0.1, 0.9]));
        w.write_samples(buf.samples()).unwrap();
        buf.clear();
        assert!(buf.set_joint(Group::RightHand, 20, &[0.1, 0.2, 0.3]));
        w.write_samples(buf.samples()).unwrap();
        assert_eq!(w.frames_written(), 2);

        let bytes = w.finish().unwrap();
        assert_eq!(bytes.len(), 2 * layout.frame_bytes());
        let track = TrackDecoder::new(layout).decode(&bytes);
        assert_eq!(track.frame(0).unwrap().pose().joint(0).unwrap(), &[0.5, 0.25, -0.1, 0.9]);
        assert!(track.frame(0).unwrap().right_hand().is_missing());
        assert_eq!(track.frame(1).unwrap().right_hand().joint(20).unwrap(), &[0.1, 0.2, 0.3]);
        assert_eq!(encode_track(&track), bytes);
    }

    #[test]
    fn rejects_wrong_frame_length() {
        let mut w = TrackWriter::new(Vec::new(), FrameLayout::holistic());
        let err = w.write_samples(&[0.0; 10]).unwrap_err();
        assert!(matches!(err, Error::FrameLength { expected: 1662, actual: 10 }));
        assert_eq!(w.frames_written(), 0);
    }

    #[test]
    fn set_joint_out_of_range() {
        let layout = FrameLayout::new([(Group::LeftHand, 2, 3)]).unwrap();
        let mut buf = FrameBuf::new(layout);
        assert!(!buf.set_joint(Group::LeftHand, 2, &[1.0, 1.0, 1.0]));
        assert!(!buf.set_joint(Group::Pose, 0, &[1.0]));
        assert!(buf.set_joint(Group::LeftHand, 1, &[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(buf.samples(), &[0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
    }
}
