//! Error types for landmark track playback.

use thiserror::Error;

use crate::layout::Group;

/// Errors surfaced by the layout, player, writer and renderables.
///
/// Short track buffers and undetected joints are not errors: the first is
/// handled by dropping the incomplete frame, the second by the NaN sentinel.
#[derive(Error, Debug)]
pub enum Error {
    #[error("seek to frame {index} out of range (track has {len} frames)")]
    SeekOutOfRange { index: usize, len: usize },

    #[error("expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("frame has {actual} samples, layout expects {expected}")]
    FrameLength { expected: usize, actual: usize },

    #[error("frame layout has no groups")]
    EmptyLayout,

    #[error("group {0:?} declared twice in frame layout")]
    DuplicateGroup(Group),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
