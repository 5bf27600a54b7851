//! Landmark skeletons as renderer-ready geometry.
//!
//! A [`LandmarkRenderable`] owns two flat position buffers: one point per
//! landmark and one two-point segment per connection. Both are allocated at
//! construction and overwritten in place by [`LandmarkRenderable::update`].
//! The renderer reads them on its own cadence and uses the per-buffer dirty
//! flag to decide whether to upload.
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::layout::{HAND_JOINTS, POSE_JOINTS};
use crate::track::LandmarkGroup;

/// Horizontal scale applied to normalized x (16:9 capture).
pub const ASPECT: f32 = 16.0 / 9.0;

/// A point in visualization world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPoint {
    /// Marks a joint with no data.
    pub const NAN: WorldPoint = WorldPoint { x: f32::NAN, y: f32::NAN, z: f32::NAN };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Map a normalized image-space landmark (origin top-left, y down) to
    /// world space centred on the image, y up, depth negated.
    /// Entries with fewer than three components map to [`WorldPoint::NAN`].
    pub fn from_normalized(landmark: &[f32]) -> Self {
        match landmark {
            [x, y, z, ..] => Self { x: (x - 0.5) * ASPECT, y: 0.5 - y, z: -z },
            _ => Self::NAN,
        }
    }

    pub fn is_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

pub const BODY_CONNECTIONS: [(usize, usize); 35] = [
    (0, 1), (1, 2), (2, 3), (3, 7), (0, 4), (4, 5),
    (5, 6), (6, 8), (9, 10), (11, 12), (11, 13),
    (13, 15), (15, 17), (15, 19), (15, 21), (17, 19),
    (12, 14), (14, 16), (16, 18), (16, 20), (16, 22),
    (18, 20), (11, 23), (12, 24), (23, 24), (23, 25),
    (24, 26), (25, 27), (26, 28), (27, 29), (28, 30),
    (29, 31), (30, 32), (27, 31), (28, 32),
];

pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (0, 5), (9, 13), (13, 17), (5, 9), (0, 17),
    (1, 2), (2, 3), (3, 4),
    (5, 6), (6, 7), (7, 8),
    (9, 10), (10, 11), (11, 12),
    (13, 14), (14, 15), (15, 16),
    (17, 18), (18, 19), (19, 20),
];

/// Fixed skeleton: landmark count plus connection pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    landmarks: usize,
    connections: &'static [(usize, usize)],
}

impl Topology {
    pub const BODY: Topology = Topology { landmarks: POSE_JOINTS, connections: &BODY_CONNECTIONS };
    pub const HAND: Topology = Topology { landmarks: HAND_JOINTS, connections: &HAND_CONNECTIONS };

    pub fn landmarks(&self) -> usize {
        self.landmarks
    }

    pub fn connections(&self) -> &'static [(usize, usize)] {
        self.connections
    }
}

/// Flat `f32` positions plus a dirty flag for the renderer.
#[derive(Debug, Clone)]
pub struct PositionBuffer {
    data: Box<[f32]>,
    dirty: bool,
}

impl PositionBuffer {
    fn zeroed(len: usize) -> Self {
        Self { data: vec![0.0; len].into_boxed_slice(), dirty: false }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by the renderer once it has uploaded the contents.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Contents if changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> Option<&[f32]> {
        if !std::mem::replace(&mut self.dirty, false) {
            return None;
        }
        Some(&self.data[..])
    }
}

#[derive(Debug, Clone)]
pub struct LandmarkRenderable {
    topology: Topology,
    landmarks: Vec<Vec<f32>>,
    points: PositionBuffer,
    segments: PositionBuffer,
}

impl LandmarkRenderable {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            landmarks: vec![Vec::new(); topology.landmarks],
            points: PositionBuffer::zeroed(topology.landmarks * 3),
            segments: PositionBuffer::zeroed(topology.connections.len() * 6),
        }
    }

    /// 33-landmark body skeleton.
    pub fn body() -> Self {
        Self::new(Topology::BODY)
    }

    /// 21-landmark hand skeleton.
    pub fn hand() -> Self {
        Self::new(Topology::HAND)
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn num_landmarks(&self) -> usize {
        self.topology.landmarks
    }

    pub fn connections(&self) -> &'static [(usize, usize)] {
        self.topology.connections
    }

    /// Raw input of the last update.
    pub fn landmarks(&self) -> &[Vec<f32>] {
        &self.landmarks
    }

    pub fn points(&self) -> &PositionBuffer {
        &self.points
    }

    pub fn segments(&self) -> &PositionBuffer {
        &self.segments
    }

    pub fn points_mut(&mut self) -> &mut PositionBuffer {
        &mut self.points
    }

    pub fn segments_mut(&mut self) -> &mut PositionBuffer {
        &mut self.segments
    }

    /// World position of landmark `index` as of the last update.
    pub fn point(&self, index: usize) -> Option<WorldPoint> {
        let p = self.points.data.get(index * 3..index * 3 + 3)?;
        Some(WorldPoint::new(p[0], p[1], p[2]))
    }

    /// Rewrite both buffers from normalized landmarks.
    ///
    /// The count must equal [`Self::num_landmarks`]; on mismatch nothing is written.
    pub fn update<L: AsRef<[f32]>>(&mut self, landmarks: &[L]) -> Result<()> {
        self.write(landmarks.iter().map(|l| l.as_ref()))
    }

    pub fn update_group(&mut self, group: LandmarkGroup<'_>) -> Result<()> {
        self.write(group.iter())
    }

    fn write<'a, I>(&mut self, landmarks: I) -> Result<()>
    where
        I: ExactSizeIterator<Item = &'a [f32]>,
    {
        let expected = self.topology.landmarks;
        if landmarks.len() != expected {
            return Err(Error::LandmarkCount { expected, actual: landmarks.len() });
        }

        for (i, lm) in landmarks.enumerate() {
            let raw = &mut self.landmarks[i];
            raw.clear();
            raw.extend_from_slice(lm);
            let p = WorldPoint::from_normalized(lm);
            self.points.data[i * 3..i * 3 + 3].copy_from_slice(&p.to_array());
        }

        let pts = &self.points.data;
        for (i, &(c1, c2)) in self.topology.connections.iter().enumerate() {
            let seg = &mut self.segments.data[i * 6..i * 6 + 6];
            seg[..3].copy_from_slice(&pts[c1 * 3..c1 * 3 + 3]);
            seg[3..].copy_from_slice(&pts[c2 * 3..c2 * 3 + 3]);
        }

        self.points.dirty = true;
        self.segments.dirty = true;
        trace!(landmarks = expected, segments = self.topology.connections.len(), "skeleton updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    fn uniform(n: usize, lm: &[f32]) -> Vec<Vec<f32>> {
        vec![lm.to_vec(); n]
    }

    #[test]
    fn topology_tables_are_in_range() {
        assert_eq!(BODY_CONNECTIONS.len(), 35);
        assert_eq!(HAND_CONNECTIONS.len(), 21);
        for t in [Topology::BODY, Topology::HAND] {
            assert!(t.connections().iter().all(|&(a, b)| a < t.landmarks() && b < t.landmarks()));
        }
    }

    #[test]
    fn buffers_sized_at_construction() {
        let body = LandmarkRenderable::body();
        assert_eq!(body.points().len(), 33 * 3);
        assert_eq!(body.segments().len(), 35 * 6);
        let hand = LandmarkRenderable::hand();
        assert_eq!(hand.points().len(), 21 * 3);
        assert_eq!(hand.segments().len(), 21 * 6);
        assert!(!hand.points().is_dirty());
    }

    #[test]
    fn centre_maps_to_origin() {
        let mut r = LandmarkRenderable::hand();
        r.update(&uniform(21, &[0.5, 0.5, 0.0])).unwrap();
        let p = r.point(4).unwrap();
        assert!(approx(p.x, 0.0) && approx(p.y, 0.0) && approx(p.z, 0.0));
    }

    #[test]
    fn corner_maps_to_top_left() {
        let mut r = LandmarkRenderable::hand();
        r.update(&uniform(21, &[0.0, 0.0, 0.0])).unwrap();
        let p = r.point(0).unwrap();
        assert!(approx(p.x, -8.0 / 9.0));
        assert!(approx(p.y, 0.5));
        assert!(approx(p.z, 0.0));
    }

    #[test]
    fn depth_is_negated_and_visibility_ignored() {
        let p = WorldPoint::from_normalized(&[1.0, 1.0, 0.25, 0.7]);
        assert!(approx(p.x, 8.0 / 9.0));
        assert!(approx(p.y, -0.5));
        assert!(approx(p.z, -0.25));
    }

    #[test]
    fn empty_entry_writes_nan_point_and_half_segment() {
        let mut r = LandmarkRenderable::hand();
        let mut lms = uniform(21, &[0.5, 0.5, 0.0]);
        lms[0].clear();
        r.update(&lms).unwrap();
        assert!(r.point(0).unwrap().is_nan());
        assert!(!r.point(1).unwrap().is_nan());

        // connection 0 is (0, 1): first half NaN, second half defined
        let seg = &r.segments().as_slice()[0..6];
        assert!(seg[..3].iter().all(|v| v.is_nan()));
        assert!(seg[3..].iter().all(|v| !v.is_nan()));
        // connection 2 is (9, 13): untouched by the missing joint
        assert!(r.segments().as_slice()[12..18].iter().all(|v| !v.is_nan()));
        assert!(r.landmarks()[0].is_empty());
    }

    #[test]
    fn two_component_entry_is_nan() {
        assert!(WorldPoint::from_normalized(&[0.5, 0.5]).is_nan());
        assert!(WorldPoint::from_normalized(&[0.5]).is_nan());

        let mut r = LandmarkRenderable::hand();
        let mut lms = uniform(21, &[0.5, 0.5, 0.0]);
        lms[1] = vec![0.5, 0.5];
        r.update(&lms).unwrap();
        assert!(r.point(1).unwrap().is_nan());
        assert!(!r.point(0).unwrap().is_nan());
        // connection 0 is (0, 1): only the second half references joint 1
        let seg = &r.segments().as_slice()[0..6];
        assert!(seg[..3].iter().all(|v| !v.is_nan()));
        assert!(seg[3..].iter().all(|v| v.is_nan()));
        assert_eq!(r.landmarks()[1], vec![0.5, 0.5]);
    }

    #[test]
    fn segments_mirror_points() {
        let mut r = LandmarkRenderable::body();
        let lms: Vec<Vec<f32>> = (0..33)
            .map(|i| vec![i as f32 / 33.0, 1.0 - i as f32 / 40.0, i as f32 * 0.01, 1.0])
            .collect();
        r.update(&lms).unwrap();
        let pts = r.points().as_slice();
        let segs = r.segments().as_slice();
        for (i, &(a, b)) in r.connections().iter().enumerate() {
            assert_eq!(&segs[i * 6..i * 6 + 3], &pts[a * 3..a * 3 + 3]);
            assert_eq!(&segs[i * 6 + 3..i * 6 + 6], &pts[b * 3..b * 3 + 3]);
        }
        assert_eq!(r.landmarks()[32], vec![32.0 / 33.0, 1.0 - 32.0 / 40.0, 32.0 * 0.01, 1.0]);
    }

    #[test]
    fn count_mismatch_is_rejected_without_writing() {
        let mut r = LandmarkRenderable::body();
        r.update(&uniform(33, &[0.5, 0.5, 0.0])).unwrap();
        r.points_mut().mark_clean();
        r.segments_mut().mark_clean();
        let before = r.points().as_slice().to_vec();

        let err = r.update(&uniform(21, &[0.0, 0.0, 0.0])).unwrap_err();
        assert!(matches!(err, Error::LandmarkCount { expected: 33, actual: 21 }));
        assert_eq!(r.points().as_slice(), before.as_slice());
        assert!(!r.points().is_dirty());
        assert!(!r.segments().is_dirty());
    }

    #[test]
    fn dirty_flags_follow_updates() {
        let mut r = LandmarkRenderable::hand();
        r.update(&uniform(21, &[0.2, 0.3, 0.1])).unwrap();
        assert!(r.points().is_dirty() && r.segments().is_dirty());
        assert_eq!(r.points_mut().take_dirty().map(<[f32]>::len), Some(63));
        assert!(r.points_mut().take_dirty().is_none());
        assert!(r.segments().is_dirty());
    }

    #[test]
    fn update_group_uses_first_three_components() {
        let data: Vec<f32> = (0..33).flat_map(|_| [0.5, 0.5, 0.0, 0.9]).collect();
        let mut r = LandmarkRenderable::body();
        r.update_group(LandmarkGroup::new(&data, 4)).unwrap();
        assert!(approx(r.point(10).unwrap().x, 0.0));
        assert_eq!(r.landmarks()[10].len(), 4);
    }
}
