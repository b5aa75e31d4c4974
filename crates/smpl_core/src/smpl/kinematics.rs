//! Forward kinematics over the joint tree.
//!
//! The output of a pass is the stack of per joint point transforms, `4J x 3`,
//! where block `i` is `(G_i * T(-j_i))^T` without its homogeneous column:
//! `G_i` is the global transform of joint `i` and `j_i` its rest location.
//! Multiplying a row `[x y z 1]` of a rest pose point with block `i` moves the
//! point rigidly with joint `i`, which is what the skinning operator consumes.

use super::{rotation::RotationDifferentiator, HOMO_SIZE, ROOT_PARENT, SPACE_DIM};
use crate::common::errors::{Result, SmplError};
use log::trace;
use nalgebra as na;
use ndarray as nd;
use smpl_utils::{
    array::{assign_block4x3, row_to_vec3},
    numerical::{point_transform_block, rigid_mat, rotation_derivative_mat},
};

/// Derivatives of the global joint transforms, one optional 4x4 matrix per
/// (joint, pose parameter) pair. A missing entry means the parameter does not
/// move the joint. Created empty for every pass.
pub struct JacobianCache {
    num_params: usize,
    entries: Vec<Option<na::Matrix4<f64>>>,
}
impl JacobianCache {
    pub fn new(num_joints: usize, num_params: usize) -> Self {
        Self {
            num_params,
            entries: vec![None; num_joints * num_params],
        }
    }
    pub fn get(&self, joint: usize, param: usize) -> Option<&na::Matrix4<f64>> {
        self.entries[joint * self.num_params + param].as_ref()
    }
    pub fn set(&mut self, joint: usize, param: usize, jac: na::Matrix4<f64>) {
        self.entries[joint * self.num_params + param] = Some(jac);
    }
    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = None);
    }
    /// Number of (joint, parameter) pairs with a derivative
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of a forward kinematics pass
pub struct JointTransforms {
    /// Global transform of every joint
    pub globals: Vec<na::Matrix4<f64>>,
    /// Stacked point transforms, `4J x 3`
    pub point_transforms: nd::Array2<f64>,
}
impl JointTransforms {
    /// Location of every joint after posing, `J x 3`
    pub fn posed_joints(&self) -> nd::Array2<f64> {
        let mut joints = nd::Array2::<f64>::zeros((self.globals.len(), SPACE_DIM));
        for (mut row, global) in joints.axis_iter_mut(nd::Axis(0)).zip(&self.globals) {
            for d in 0..SPACE_DIM {
                row[d] = global[(d, 3)];
            }
        }
        joints
    }
}

pub struct ForwardKinematics<'a> {
    parent_idx_per_joint: &'a [u32],
    rotation: &'a dyn RotationDifferentiator,
}
impl<'a> ForwardKinematics<'a> {
    /// `parent_idx_per_joint` has to list parents before their children,
    /// otherwise every pass fails with ``HierarchyMismatch``
    pub fn new(parent_idx_per_joint: &'a [u32], rotation: &'a dyn RotationDifferentiator) -> Self {
        Self {
            parent_idx_per_joint,
            rotation,
        }
    }

    pub fn num_joints(&self) -> usize {
        self.parent_idx_per_joint.len()
    }

    fn check_parents_first(&self) -> Result<()> {
        for joint in 0..self.num_joints() {
            match self.parent(joint) {
                None if joint > 0 => return Err(SmplError::HierarchyMismatch(format!("joint {joint} is a second root"))),
                Some(p) if p >= joint => {
                    return Err(SmplError::HierarchyMismatch(format!(
                        "joint {joint} has parent {p}, parents have to come before their children"
                    )))
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn parent(&self, joint: usize) -> Option<usize> {
        let parent = self.parent_idx_per_joint[joint];
        (parent != ROOT_PARENT).then_some(parent as usize)
    }

    /// Global transforms for `pose` (flat axis-angle per joint) around the rest
    /// `joint_locations`. When `jacobians` is given it is resized to one
    /// zeroed `4J x 3` matrix per pose parameter and filled with the
    /// derivative of the stacked point transforms.
    /// # Errors
    /// ``UnsupportedDimension`` for non 3D joint locations and
    /// ``ParamLengthMismatch`` for a wrongly sized pose or joint array and
    /// ``HierarchyMismatch`` if a joint is listed before its parent
    pub fn global_transforms(
        &self,
        pose: &[f64],
        joint_locations: &nd::Array2<f64>,
        jacobians: Option<&mut Vec<nd::Array2<f64>>>,
    ) -> Result<JointTransforms> {
        let num_joints = self.num_joints();
        let num_params = num_joints * SPACE_DIM;
        if joint_locations.ncols() != SPACE_DIM {
            return Err(SmplError::UnsupportedDimension(joint_locations.ncols()));
        }
        if joint_locations.nrows() != num_joints {
            return Err(SmplError::ParamLengthMismatch {
                name: "joint locations",
                expected: num_joints,
                actual: joint_locations.nrows(),
            });
        }
        if pose.len() != num_params {
            return Err(SmplError::ParamLengthMismatch {
                name: "pose",
                expected: num_params,
                actual: pose.len(),
            });
        }
        self.check_parents_first()?;

        let stacked_shape = (HOMO_SIZE * num_joints, SPACE_DIM);
        let mut point_transforms = nd::Array2::<f64>::zeros(stacked_shape);
        let mut globals: Vec<na::Matrix4<f64>> = Vec::with_capacity(num_joints);

        let mut jac_out = jacobians.map(|jacs| {
            jacs.clear();
            jacs.resize(num_params, nd::Array2::<f64>::zeros(stacked_shape));
            (jacs, JacobianCache::new(num_joints, num_params))
        });

        let joints_view = joint_locations.view();
        for joint in 0..num_joints {
            let parent = self.parent(joint);
            let location = row_to_vec3(&joints_view, joint);
            let offset = match parent {
                Some(p) => location - row_to_vec3(&joints_view, p),
                None => location,
            };
            let axis_angle = na::Vector3::new(
                pose[joint * SPACE_DIM],
                pose[joint * SPACE_DIM + 1],
                pose[joint * SPACE_DIM + 2],
            );

            let global = if let Some((jacs, cache)) = jac_out.as_mut() {
                let (rot, rot_jac) = self.rotation.rotation_with_jacobian(&axis_angle);
                let local = rigid_mat(&rot, &offset);

                //w.r.t. the joint's own rotation
                for (d, drot) in rot_jac.iter().enumerate() {
                    let param = joint * SPACE_DIM + d;
                    let local_jac = rotation_derivative_mat(drot);
                    let global_jac = match parent {
                        Some(p) => globals[p] * local_jac,
                        None => local_jac,
                    };
                    assign_block4x3(&mut jacs[param], joint, &point_transform_block(&global_jac, &location));
                    cache.set(joint, param, global_jac);
                }

                //w.r.t. the rotations of the ancestors, which all have a smaller
                // index than the parent's own parameters
                if let Some(p) = parent {
                    for param in 0..(p + 1) * SPACE_DIM {
                        let Some(parent_jac) = cache.get(p, param) else {
                            continue;
                        };
                        let global_jac = parent_jac * local;
                        assign_block4x3(&mut jacs[param], joint, &point_transform_block(&global_jac, &location));
                        cache.set(joint, param, global_jac);
                    }
                }

                match parent {
                    Some(p) => globals[p] * local,
                    None => local,
                }
            } else {
                let local = rigid_mat(&self.rotation.rotation(&axis_angle), &offset);
                match parent {
                    Some(p) => globals[p] * local,
                    None => local,
                }
            };

            assign_block4x3(&mut point_transforms, joint, &point_transform_block(&global, &location));
            globals.push(global);
        }

        if let Some((_, cache)) = jac_out {
            trace!("Forward kinematics filled {} joint jacobians", cache.len());
        }

        Ok(JointTransforms { globals, point_transforms })
    }
}
