//! Seekable playback over a decoded [`Track`].
//!
//! The player holds a shared track and a frame position. Every position
//! change (load or seek) synchronously computes presence for all groups of
//! the new frame and hands pose, left hand and right hand to a single
//! [`FrameSink`]. The face group is decoded and its presence reported, but it
//! is not forwarded to the sink.
//!
//! Out-of-range seeks are rejected with [`Error::SeekOutOfRange`]; the
//! position is left unchanged and the sink is not called.
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::track::{Frame, FramePresence, LandmarkGroup, Track};

/// Receives the groups of the current frame on every frame change.
pub trait FrameSink {
    fn on_frame(
        &mut self,
        pose: LandmarkGroup<'_>,
        left_hand: LandmarkGroup<'_>,
        right_hand: LandmarkGroup<'_>,
    ) -> Result<()>;
}

/// Adapts a closure into a [`FrameSink`]; see [`TrackPlayer::with_callback`].
pub struct FnSink<F>(pub F);

impl<F> FrameSink for FnSink<F>
where
    F: FnMut(LandmarkGroup<'_>, LandmarkGroup<'_>, LandmarkGroup<'_>) -> Result<()>,
{
    fn on_frame(&mut self, pose: LandmarkGroup<'_>, lh: LandmarkGroup<'_>, rh: LandmarkGroup<'_>) -> Result<()> {
        (self.0)(pose, lh, rh)
    }
}

/// Fan out to two sinks in order; stops at the first error.
impl<A: FrameSink, B: FrameSink> FrameSink for (A, B) {
    fn on_frame(&mut self, pose: LandmarkGroup<'_>, lh: LandmarkGroup<'_>, rh: LandmarkGroup<'_>) -> Result<()> {
        self.0.on_frame(pose, lh, rh)?;
        self.1.on_frame(pose, lh, rh)
    }
}

pub struct TrackPlayer<S> {
    track: Arc<Track>,
    index: usize,
    presence: Option<FramePresence>,
    sink: S,
}

impl<F> TrackPlayer<FnSink<F>>
where
    F: FnMut(LandmarkGroup<'_>, LandmarkGroup<'_>, LandmarkGroup<'_>) -> Result<()>,
{
    pub fn with_callback(callback: F) -> Self {
        Self::new(FnSink(callback))
    }
}

impl<S: FrameSink> TrackPlayer<S> {
    /// A player over an empty track; nothing is emitted until [`Self::load_track`].
    pub fn new(sink: S) -> Self {
        Self { track: Arc::new(Track::default()), index: 0, presence: None, sink }
    }

    /// Replace the track and rewind to frame 0, emitting it if the track is non-empty.
    pub fn load_track(&mut self, track: impl Into<Arc<Track>>) -> Result<()> {
        self.track = track.into();
        self.index = 0;
        self.presence = None;
        debug!(frames = self.track.len(), "track loaded");
        self.emit()
    }

    /// Move to `index` and emit it. Rejects `index >= len()`.
    pub fn seek(&mut self, index: usize) -> Result<()> {
        let len = self.track.len();
        if index >= len {
            return Err(Error::SeekOutOfRange { index, len });
        }
        self.index = index;
        debug!(index, "seek");
        self.emit()
    }

    /// Seek to the next frame; rejected at the last frame.
    pub fn advance(&mut self) -> Result<()> {
        self.seek(self.index + 1)
    }

    fn emit(&mut self) -> Result<()> {
        let Some(frame) = self.track.frame(self.index) else { return Ok(()) };
        self.presence = Some(frame.presence());
        self.sink.on_frame(frame.pose(), frame.left_hand(), frame.right_hand())
    }

    /// Current frame position.
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.track.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }

    pub fn track(&self) -> &Arc<Track> {
        &self.track
    }

    pub fn current_frame(&self) -> Option<Frame<'_>> {
        self.track.frame(self.index)
    }

    /// Presence of every group in the current frame; `None` before the first emit.
    pub fn presence(&self) -> Option<FramePresence> {
        self.presence
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
