//! On-screen debug skeletons driven by player frames.
use crate::error::{Error, Result};
use crate::player::FrameSink;
use crate::renderable::{LandmarkRenderable, WorldPoint};
use crate::track::LandmarkGroup;

/// Scene placement of the debug skeletons.
pub const DEFAULT_ORIGIN: WorldPoint = WorldPoint::new(-1.0, 1.2, 0.0);

/// A body skeleton and two hand skeletons sharing one scene origin.
///
/// The origin is metadata for the renderer; buffers stay in skeleton-local
/// world space.
#[derive(Debug, Clone)]
pub struct DebugSkeletons {
    pub body: LandmarkRenderable,
    pub left_hand: LandmarkRenderable,
    pub right_hand: LandmarkRenderable,
    pub origin: WorldPoint,
}

impl DebugSkeletons {
    pub fn new() -> Self {
        Self::with_origin(DEFAULT_ORIGIN)
    }

    pub fn with_origin(origin: WorldPoint) -> Self {
        Self {
            body: LandmarkRenderable::body(),
            left_hand: LandmarkRenderable::hand(),
            right_hand: LandmarkRenderable::hand(),
            origin,
        }
    }

    /// Clear every dirty flag, as a renderer does after uploading.
    pub fn mark_clean(&mut self) {
        for r in [&mut self.body, &mut self.left_hand, &mut self.right_hand] {
            r.points_mut().mark_clean();
            r.segments_mut().mark_clean();
        }
    }
}

impl Default for DebugSkeletons {
    fn default() -> Self {
        Self::new()
    }
}

/// Fails on the first group whose joint count does not fit `target`.
fn check_count(target: &LandmarkRenderable, group: LandmarkGroup<'_>) -> Result<()> {
    let expected = target.num_landmarks();
    if group.len() != expected {
        return Err(Error::LandmarkCount { expected, actual: group.len() });
    }
    Ok(())
}

impl FrameSink for DebugSkeletons {
    /// All three groups are checked before any skeleton is written, so a bad
    /// frame leaves every buffer as it was.
    fn on_frame(&mut self, pose: LandmarkGroup<'_>, lh: LandmarkGroup<'_>, rh: LandmarkGroup<'_>) -> Result<()> {
        check_count(&self.body, pose)?;
        check_count(&self.left_hand, lh)?;
        check_count(&self.right_hand, rh)?;
        self.body.update_group(pose)?;
        self.right_hand.update_group(rh)?;
        self.left_hand.update_group(lh)
    }
}
