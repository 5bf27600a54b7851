//! Decoded tracks and borrowed views into their frames.
//!
//! A [`Track`] owns every sample of every frame in one contiguous arena.
//! [`Frame`] and [`LandmarkGroup`] are `Copy` views into that arena, so
//! stepping through a track never allocates.
use serde::{Deserialize, Serialize};

use crate::layout::{FrameLayout, Group};

/// Whether a group carried any tracked data in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Detected,
    Missing,
}

/// Presence of every group of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePresence {
    pub pose: Presence,
    pub face: Presence,
    #[serde(rename = "lh")]
    pub left_hand: Presence,
    #[serde(rename = "rh")]
    pub right_hand: Presence,
}

impl FramePresence {
    pub fn get(&self, group: Group) -> Presence {
        match group {
            Group::Pose => self.pose,
            Group::Face => self.face,
            Group::LeftHand => self.left_hand,
            Group::RightHand => self.right_hand,
        }
    }
}

/// Ordered joints of one group; every joint has the same arity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkGroup<'a> {
    data: &'a [f32],
    joints: usize,
    components: usize,
}

impl<'a> LandmarkGroup<'a> {
    /// View `data` as `data.len() / components` joints.
    pub fn new(data: &'a [f32], components: usize) -> Self {
        let joints = if components == 0 { 0 } else { data.len() / components };
        Self { data: &data[..joints * components], joints, components }
    }

    fn with_joints(data: &'a [f32], joints: usize, components: usize) -> Self {
        Self { data, joints, components }
    }

    /// Number of joints.
    pub fn len(&self) -> usize {
        self.joints
    }

    pub fn is_empty(&self) -> bool {
        self.joints == 0
    }

    /// Components per joint.
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn joint(&self, index: usize) -> Option<&'a [f32]> {
        if index >= self.joints {
            return None;
        }
        let start = index * self.components;
        Some(&self.data[start..start + self.components])
    }

    pub fn iter(self) -> impl ExactSizeIterator<Item = &'a [f32]> + 'a {
        let (data, c) = (self.data, self.components);
        (0..self.joints).map(move |i| &data[i * c..(i + 1) * c])
    }

    /// Flat samples of the whole group.
    pub fn samples(&self) -> &'a [f32] {
        self.data
    }

    /// A group is missing when every joint's first three components are exactly zero.
    pub fn presence(&self) -> Presence {
        let all_zero = self.iter().all(|j| j.iter().take(3).all(|&v| v == 0.0));
        if all_zero { Presence::Missing } else { Presence::Detected }
    }

    pub fn is_missing(&self) -> bool {
        self.presence() == Presence::Missing
    }

    /// Owned copy, one `Vec` per joint.
    pub fn to_vec(&self) -> Vec<Vec<f32>> {
        self.iter().map(<[f32]>::to_vec).collect()
    }
}

/// One time-sample of all landmark groups.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    layout: &'a FrameLayout,
    data: &'a [f32],
    index: usize,
}

impl<'a> Frame<'a> {
    /// Position of this frame within its track.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn samples(&self) -> &'a [f32] {
        self.data
    }

    /// `None` when the layout has no such group.
    pub fn group(&self, group: Group) -> Option<LandmarkGroup<'a>> {
        self.layout
            .spec(group)
            .map(|s| LandmarkGroup::with_joints(&self.data[s.range()], s.joints, s.components))
    }

    fn group_or_empty(&self, group: Group) -> LandmarkGroup<'a> {
        self.group(group).unwrap_or(LandmarkGroup::with_joints(&[], 0, 0))
    }

    pub fn pose(&self) -> LandmarkGroup<'a> {
        self.group_or_empty(Group::Pose)
    }

    pub fn face(&self) -> LandmarkGroup<'a> {
        self.group_or_empty(Group::Face)
    }

    pub fn left_hand(&self) -> LandmarkGroup<'a> {
        self.group_or_empty(Group::LeftHand)
    }

    pub fn right_hand(&self) -> LandmarkGroup<'a> {
        self.group_or_empty(Group::RightHand)
    }

    pub fn presence(&self) -> FramePresence {
        FramePresence {
            pose: self.pose().presence(),
            face: self.face().presence(),
            left_hand: self.left_hand().presence(),
            right_hand: self.right_hand().presence(),
        }
    }
}

/// Immutable, randomly indexable sequence of frames sharing one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    layout: FrameLayout,
    samples: Vec<f32>,
    frames: usize,
}

impl Track {
    /// Wrap owned samples; any trailing partial frame is dropped.
    pub fn from_samples(layout: FrameLayout, mut samples: Vec<f32>) -> Self {
        let frame_len = layout.frame_len();
        let frames = if frame_len == 0 { 0 } else { samples.len() / frame_len };
        samples.truncate(frames * frame_len);
        Self { layout, samples, frames }
    }

    pub fn empty(layout: FrameLayout) -> Self {
        Self { layout, samples: Vec::new(), frames: 0 }
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    pub fn frame(&self, index: usize) -> Option<Frame<'_>> {
        if index >= self.frames {
            return None;
        }
        let n = self.layout.frame_len();
        Some(Frame { layout: &self.layout, data: &self.samples[index * n..(index + 1) * n], index })
    }

    pub fn frames(&self) -> impl ExactSizeIterator<Item = Frame<'_>> + '_ {
        let n = self.layout.frame_len();
        (0..self.frames).map(move |index| Frame {
            layout: &self.layout,
            data: &self.samples[index * n..(index + 1) * n],
            index,
        })
    }

    /// All samples, frame-major.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::empty(FrameLayout::holistic())
    }
}
