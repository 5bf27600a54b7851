//! Frame layout: how the landmark groups of one frame are packed into a flat
//! run of little-endian `f32` samples.
//!
//! Groups are a closed set ([`Group`]) and offsets are resolved once when the
//! layout is built, so lookups on the playback path are plain array indexing.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Size in bytes of one stored sample.
pub const SAMPLE_BYTES: usize = 4;

pub const POSE_JOINTS: usize = 33;
/// Pose joints carry `x, y, z, visibility`.
pub const POSE_COMPONENTS: usize = 4;
pub const FACE_JOINTS: usize = 468;
pub const HAND_JOINTS: usize = 21;
pub const XYZ: usize = 3;

/// Landmark group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    #[serde(rename = "pose")]
    Pose,
    #[serde(rename = "face")]
    Face,
    #[serde(rename = "lh")]
    LeftHand,
    #[serde(rename = "rh")]
    RightHand,
}

impl Group {
    pub const ALL: [Group; 4] = [Group::Pose, Group::Face, Group::LeftHand, Group::RightHand];

    /// Short name used in track tooling and reports.
    pub fn name(self) -> &'static str {
        match self {
            Group::Pose => "pose",
            Group::Face => "face",
            Group::LeftHand => "lh",
            Group::RightHand => "rh",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Resolved placement of one group inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub group: Group,
    pub joints: usize,
    pub components: usize,
    /// Offset in samples from the start of the frame.
    pub offset: usize,
}

impl GroupSpec {
    /// Number of samples the group occupies.
    pub fn len(&self) -> usize {
        self.joints * self.components
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn byte_offset(&self) -> usize {
        self.offset * SAMPLE_BYTES
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len()
    }
}

/// Layout of the recorded holistic tracker output, in storage order.
pub const HOLISTIC: [(Group, usize, usize); 4] = [
    (Group::Pose, POSE_JOINTS, POSE_COMPONENTS),
    (Group::Face, FACE_JOINTS, XYZ),
    (Group::LeftHand, HAND_JOINTS, XYZ),
    (Group::RightHand, HAND_JOINTS, XYZ),
];

/// Immutable description of one frame's packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    specs: Vec<GroupSpec>,
    slots: [Option<usize>; 4],
    frame_len: usize,
}

impl FrameLayout {
    /// Build a layout from `(group, joints, components)` entries in storage order.
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Group, usize, usize)>,
    {
        let entries: Vec<_> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(Error::EmptyLayout);
        }
        let mut seen = [false; 4];
        for &(group, _, _) in &entries {
            if std::mem::replace(&mut seen[group.slot()], true) {
                return Err(Error::DuplicateGroup(group));
            }
        }
        Ok(Self::build(entries))
    }

    /// The fixed layout of recorded tracks: pose 33x4, face 468x3, lh 21x3, rh 21x3.
    pub fn holistic() -> Self {
        Self::build(HOLISTIC)
    }

    fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Group, usize, usize)>,
    {
        let mut specs = Vec::new();
        let mut slots = [None; 4];
        let mut offset = 0usize;
        for (group, joints, components) in entries {
            slots[group.slot()] = Some(specs.len());
            specs.push(GroupSpec { group, joints, components, offset });
            offset += joints * components;
        }
        Self { specs, slots, frame_len: offset }
    }

    /// Groups in storage order.
    pub fn groups(&self) -> &[GroupSpec] {
        &self.specs
    }

    pub fn spec(&self, group: Group) -> Option<&GroupSpec> {
        self.slots[group.slot()].map(|i| &self.specs[i])
    }

    /// Samples per frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Bytes per frame on disk.
    pub fn frame_bytes(&self) -> usize {
        self.frame_len * SAMPLE_BYTES
    }
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self::holistic()
    }
}
