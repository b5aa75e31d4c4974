use super::errors::{Result, SmplError};
use crate::smpl::SPACE_DIM;
use ndarray as nd;

/// Axis-angle rotation of every joint plus a global translation
#[derive(Clone, Debug, PartialEq)]
pub struct Pose {
    /// `J x 3`, row 0 is the global orientation
    pub joint_poses: nd::Array2<f64>,
    pub global_trans: nd::Array1<f64>,
}
impl Pose {
    pub fn new(joint_poses: nd::Array2<f64>, global_trans: nd::Array1<f64>) -> Self {
        Self { joint_poses, global_trans }
    }
    pub fn new_empty(num_joints: usize) -> Self {
        let joint_poses = nd::Array2::<f64>::zeros((num_joints, SPACE_DIM));
        let global_trans = nd::Array1::<f64>::zeros(SPACE_DIM);
        Self { joint_poses, global_trans }
    }
    /// Builds a pose from the flat `[j0x, j0y, j0z, j1x, ...]` layout used by
    /// the optimizer
    /// # Errors
    /// ``ParamLengthMismatch`` if the length is not a multiple of 3
    pub fn from_flat(pose: &[f64], global_trans: [f64; 3]) -> Result<Self> {
        let length_error = || SmplError::ParamLengthMismatch {
            name: "flat pose",
            expected: pose.len().next_multiple_of(SPACE_DIM),
            actual: pose.len(),
        };
        if pose.len() % SPACE_DIM != 0 {
            return Err(length_error());
        }
        let joint_poses =
            nd::Array2::from_shape_vec((pose.len() / SPACE_DIM, SPACE_DIM), pose.to_vec()).map_err(|_| length_error())?;
        Ok(Self::new(joint_poses, nd::Array1::from_vec(global_trans.to_vec())))
    }
    pub fn num_active_joints(&self) -> usize {
        self.joint_poses.nrows()
    }
    /// Joint rotations in the flat layout, row by row
    pub fn to_flat(&self) -> Vec<f64> {
        self.joint_poses.iter().copied().collect()
    }
}
