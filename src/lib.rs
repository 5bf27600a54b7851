//! Landmark track decoder, player and debug skeleton geometry.
//!
//! This crate provides the core used by the `player` tool:
//!
//! - `layout`: how pose, face and hand landmarks are packed into one frame
//! - `decoder` / `writer`: the headerless little-endian `f32` track format
//! - `track`: decoded tracks, with borrowed frame and group views
//! - `player`: seekable playback that hands each frame to a [`player::FrameSink`]
//! - `renderable`: fixed-topology skeletons as point and segment buffers
//! - `skeletons` / `rig`: the sinks used by the application (debug skeletons
//!   and the boundary to the external rig solver)
pub mod decoder;
pub mod error;
pub mod layout;
pub mod player;
pub mod renderable;
pub mod rig;
pub mod skeletons;
pub mod track;
pub mod writer;

pub use decoder::TrackDecoder;
pub use error::{Error, Result};
pub use layout::{FrameLayout, Group};
pub use player::{FrameSink, TrackPlayer};
pub use renderable::{LandmarkRenderable, WorldPoint};
pub use track::{Frame, LandmarkGroup, Presence, Track};
