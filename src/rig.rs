//! Boundary to the external humanoid rig solver.
//!
//! The solver itself lives outside this crate. It receives pose, left hand
//! and right hand landmarks in rig space, which differs from the debug
//! skeleton space: coordinates are not centred, and depth is scaled like x.
use crate::error::Result;
use crate::player::FrameSink;
use crate::renderable::{ASPECT, WorldPoint};
use crate::track::LandmarkGroup;

/// Per-axis scale applied by [`rig_point`].
pub const RIG_SCALE: [f32; 3] = [ASPECT, 1.0, ASPECT];

/// `(x * 16/9, 1 - y, -z * 16/9)`; entries with fewer than three components are NaN.
pub fn rig_point(landmark: &[f32]) -> WorldPoint {
    match landmark {
        [x, y, z, ..] => WorldPoint::new(x * RIG_SCALE[0], (1.0 - y) * RIG_SCALE[1], -z * RIG_SCALE[2]),
        _ => WorldPoint::NAN,
    }
}

/// Convert a whole group, reusing `out`.
pub fn to_rig_space(group: LandmarkGroup<'_>, out: &mut Vec<WorldPoint>) {
    out.clear();
    out.extend(group.iter().map(rig_point));
}

/// Input contract of the rig solver.
pub trait RigSolver {
    fn solve(&mut self, pose: &[WorldPoint], left_hand: &[WorldPoint], right_hand: &[WorldPoint]);
}

/// Feeds player frames to a [`RigSolver`] after converting them to rig space.
pub struct RigDriver<R> {
    solver: R,
    pose: Vec<WorldPoint>,
    left_hand: Vec<WorldPoint>,
    right_hand: Vec<WorldPoint>,
}

impl<R: RigSolver> RigDriver<R> {
    pub fn new(solver: R) -> Self {
        Self { solver, pose: Vec::new(), left_hand: Vec::new(), right_hand: Vec::new() }
    }

    pub fn solver(&self) -> &R {
        &self.solver
    }

    pub fn into_solver(self) -> R {
        self.solver
    }
}

impl<R: RigSolver> FrameSink for RigDriver<R> {
    fn on_frame(&mut self, pose: LandmarkGroup<'_>, lh: LandmarkGroup<'_>, rh: LandmarkGroup<'_>) -> Result<()> {
        to_rig_space(pose, &mut self.pose);
        to_rig_space(lh, &mut self.left_hand);
        to_rig_space(rh, &mut self.right_hand);
        self.solver.solve(&self.pose, &self.left_hand, &self.right_hand);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Capture(Vec<(usize, usize, usize, WorldPoint)>);

    impl RigSolver for Capture {
        fn solve(&mut self, pose: &[WorldPoint], lh: &[WorldPoint], rh: &[WorldPoint]) {
            self.0.push((pose.len(), lh.len(), rh.len(), pose[0]));
        }
    }

    #[test]
    fn rig_point_scaling() {
        let p = rig_point(&[0.5, 0.25, 0.1, 0.9]);
        assert!((p.x - 0.5 * 16.0 / 9.0).abs() < 1e-6);
        assert!((p.y - 0.75).abs() < 1e-6);
        assert!((p.z + 0.1 * 16.0 / 9.0).abs() < 1e-6);
        assert!(rig_point(&[]).is_nan());
    }

    #[test]
    fn driver_converts_all_three_groups() {
        let pose: Vec<f32> = (0..33).flat_map(|_| [0.0, 0.0, 0.0, 1.0]).collect();
        let hand = vec![0.0f32; 63];
        let mut d = RigDriver::new(Capture::default());
        d.on_frame(LandmarkGroup::new(&pose, 4), LandmarkGroup::new(&hand, 3), LandmarkGroup::new(&hand, 3))
            .unwrap();
        let (np, nl, nr, p0) = d.solver().0[0];
        assert_eq!((np, nl, nr), (33, 21, 21));
        assert_eq!(p0, WorldPoint::new(0.0, 1.0, -0.0));
    }
}
