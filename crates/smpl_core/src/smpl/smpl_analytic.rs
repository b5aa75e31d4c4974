use super::{
    kinematics::{ForwardKinematics, JointTransforms},
    rotation::RotationDifferentiator,
    shape::ShapeDeformer,
    skinning::LbsOperator,
    SPACE_DIM,
};
use crate::common::{
    assets::SmplAssets,
    betas::Betas,
    errors::{Result, SmplError},
    keypoints::{KeyIndex, KeyPoint, KeyPoints},
    metadata::smpl_metadata,
    outputs::SmplOutput,
    pose::Pose,
    smpl_model::SmplModel,
    smpl_options::SmplOptions,
    types::{Gender, ModelDims},
};
use log::{debug, info};
use nalgebra as na;
use ndarray as nd;
use smpl_utils::array::{mean_row, row_to_vec3, GatherRows};

/// Smpl model evaluated on the CPU in double precision, with analytic
/// jacobians of the vertices w.r.t. every pose and shape parameter. This is
/// the cost function a least squares fit to a scan is built on.
#[derive(Clone, Debug)]
pub struct SmplAnalytic {
    gender: Gender,
    assets: SmplAssets,
    options: SmplOptions,
    template_mean_point: na::Vector3<f64>,
}
impl SmplAnalytic {
    pub fn new(gender: Gender, assets: SmplAssets, options: SmplOptions) -> Self {
        let template_mean_point = mean_row(&assets.verts_template().view());
        info!(
            "Initialised {gender} model with {} verts and {} joints, rotation backend {}",
            assets.num_verts(),
            assets.num_joints(),
            options.rotation_backend
        );
        Self {
            gender,
            assets,
            options,
            template_mean_point,
        }
    }

    /// Like ``new`` but insists on the sizes and the joint tree of the canonical
    /// SMPL model
    /// # Errors
    /// ``AssetDimensionMismatch`` for the first size that differs and
    /// ``HierarchyMismatch`` for a different parent table
    pub fn new_smpl(gender: Gender, assets: SmplAssets, options: SmplOptions) -> Result<Self> {
        let metadata = smpl_metadata();
        let dims = assets.dims();
        let checks = [
            ("number of vertices", metadata.num_verts, dims.num_verts),
            ("number of joints", metadata.num_joints, dims.num_joints),
            ("shape space", metadata.shape_space_dim, dims.shape_space_dim),
            ("weights per vertex", metadata.weights_by_vertex, dims.weights_by_vertex),
            ("number of faces", metadata.num_faces, assets.faces().nrows()),
        ];
        if let Some(&(asset, expected, actual)) = checks.iter().find(|(_, e, a)| e != a) {
            return Err(SmplError::AssetDimensionMismatch { asset, expected, actual });
        }
        if assets.parent_idx_per_joint() != metadata.joint_parents.as_slice() {
            return Err(SmplError::HierarchyMismatch("parent table differs from the SMPL skeleton".to_string()));
        }
        Ok(Self::new(gender, assets, options))
    }

    pub fn assets(&self) -> &SmplAssets {
        &self.assets
    }

    pub fn options(&self) -> SmplOptions {
        self.options
    }

    fn rotation(&self) -> &'static dyn RotationDifferentiator {
        self.options.rotation_backend.differentiator()
    }

    fn kinematics(&self) -> ForwardKinematics<'_> {
        ForwardKinematics::new(self.assets.parent_idx_per_joint(), self.rotation())
    }

    fn deformer(&self) -> ShapeDeformer<'_> {
        ShapeDeformer::new(self.assets.shape_dirs())
    }

    fn check_pose(&self, pose: &[f64]) -> Result<()> {
        if pose.len() == self.assets.pose_dim() {
            Ok(())
        } else {
            Err(SmplError::ParamLengthMismatch {
                name: "pose",
                expected: self.assets.pose_dim(),
                actual: pose.len(),
            })
        }
    }

    fn check_shape(&self, shape: &[f64]) -> Result<()> {
        if shape.len() == self.assets.shape_space_dim() {
            Ok(())
        } else {
            Err(SmplError::ParamLengthMismatch {
                name: "shape",
                expected: self.assets.shape_space_dim(),
                actual: shape.len(),
            })
        }
    }

    /// Vertices of the model for the given parameters, `V x 3`.
    ///
    /// Without a pose the shaped template is returned, without a shape the
    /// template is used as is. `pose_jac` receives one `V x 3` matrix per pose
    /// parameter and requires a pose. `shape_jac` receives one `V x 3` matrix
    /// per shape parameter: the basis itself when there is no pose, otherwise
    /// every basis field is posed as well, which costs one extra forward
    /// kinematics and skinning pass per shape parameter.
    /// # Errors
    /// ``ParamLengthMismatch`` for wrongly sized parameters, or a pose jacobian
    /// requested without a pose. Nothing is written in that case.
    pub fn evaluate(
        &self,
        pose: Option<&[f64]>,
        shape: Option<&[f64]>,
        pose_jac: Option<&mut Vec<nd::Array2<f64>>>,
        shape_jac: Option<&mut Vec<nd::Array2<f64>>>,
    ) -> Result<nd::Array2<f64>> {
        if let Some(pose) = pose {
            self.check_pose(pose)?;
        } else if pose_jac.is_some() {
            return Err(SmplError::ParamLengthMismatch {
                name: "pose for the pose jacobian",
                expected: self.assets.pose_dim(),
                actual: 0,
            });
        }
        if let Some(shape) = shape {
            self.check_shape(shape)?;
        }
        debug!(
            "Evaluating model: pose {}, shape {}, pose jacobian {}, shape jacobian {}",
            pose.is_some(),
            shape.is_some(),
            pose_jac.is_some(),
            shape_jac.is_some()
        );

        let verts = self.deformer().deform(shape, self.assets.verts_template())?;
        let Some(pose) = pose else {
            if let Some(shape_jac) = shape_jac {
                *shape_jac = self.deformer().jacobian();
            }
            return Ok(verts);
        };

        let (posed, _) = self.pose_verts(pose, verts.view(), pose_jac)?;
        if let Some(shape_jac) = shape_jac {
            *shape_jac = self.posed_shape_jacobian(pose)?;
        }
        Ok(posed)
    }

    /// Skins `verts` (unposed, `V x 3`) with `pose`. Returns the posed vertices
    /// and the joint transforms they were posed with.
    fn pose_verts(
        &self,
        pose: &[f64],
        verts: nd::ArrayView2<f64>,
        pose_jac: Option<&mut Vec<nd::Array2<f64>>>,
    ) -> Result<(nd::Array2<f64>, JointTransforms)> {
        let joint_locations = self.assets.joint_regressor().dot(&verts);
        let mut pose_jac = pose_jac;
        let transforms = self
            .kinematics()
            .global_transforms(pose, &joint_locations, pose_jac.as_deref_mut())?;
        let lbs = LbsOperator::new(self.assets.lbs_weights(), verts)?;
        let posed = lbs.apply(&transforms.point_transforms);
        if let Some(pose_jac) = pose_jac {
            lbs.apply_jacobians(pose_jac);
        }
        Ok((posed, transforms))
    }

    //posed vertices are affine in the betas and the translation of every
    // point transform is linear in the rest joint locations, so posing a basis
    // field with the joints regressed from it gives the exact derivative
    fn posed_shape_jacobian(&self, pose: &[f64]) -> Result<Vec<nd::Array2<f64>>> {
        debug!("Posing {} shape basis fields for the shape jacobian", self.assets.shape_space_dim());
        (0..self.assets.shape_space_dim())
            .map(|idx| self.pose_verts(pose, self.assets.shape_dir(idx), None).map(|(posed, _)| posed))
            .collect()
    }

    /// Rest joint locations of the shaped template, `J x 3`
    /// # Errors
    /// ``ParamLengthMismatch`` for a wrongly sized shape
    pub fn joint_locations(&self, shape: Option<&[f64]>) -> Result<nd::Array2<f64>> {
        let verts = self.deformer().deform(shape, self.assets.verts_template())?;
        Ok(self.assets.joint_regressor().dot(&verts))
    }

    /// Joint locations after posing, `J x 3`. Without a pose these are the rest
    /// locations.
    /// # Errors
    /// ``ParamLengthMismatch`` for wrongly sized parameters
    pub fn posed_joint_locations(&self, pose: Option<&[f64]>, shape: Option<&[f64]>) -> Result<nd::Array2<f64>> {
        let joint_locations = self.joint_locations(shape)?;
        let Some(pose) = pose else {
            return Ok(joint_locations);
        };
        self.check_pose(pose)?;
        let transforms = self.kinematics().global_transforms(pose, &joint_locations, None)?;
        Ok(transforms.posed_joints())
    }

    pub fn key_point(&self, key: KeyPoint) -> Option<KeyIndex> {
        self.assets.key_points().get(key)
    }

    pub fn key_point_by_name(&self, name: &str) -> Option<KeyIndex> {
        self.assets.key_points().by_name(name)
    }

    /// Positions of every known key point, read from the vertices or joints of
    /// an evaluation
    pub fn key_point_locations(&self, verts: &nd::Array2<f64>, joints: &nd::Array2<f64>) -> Vec<(KeyPoint, na::Vector3<f64>)> {
        let mut vert_keys = Vec::new();
        let mut vert_idx = Vec::new();
        let mut joint_keys = Vec::new();
        let mut joint_idx = Vec::new();
        for (key, index) in self.assets.key_points().iter() {
            match index {
                KeyIndex::Vertex(v) => {
                    vert_keys.push(key);
                    vert_idx.push(v);
                }
                KeyIndex::Joint(j) => {
                    joint_keys.push(key);
                    joint_idx.push(j);
                }
            }
        }
        let vert_pos = verts.gather_rows(&vert_idx);
        let joint_pos = joints.gather_rows(&joint_idx);

        let on_verts = vert_keys.into_iter().enumerate().map(|(i, key)| (key, row_to_vec3(&vert_pos.view(), i)));
        let on_joints = joint_keys.into_iter().enumerate().map(|(i, key)| (key, row_to_vec3(&joint_pos.view(), i)));
        on_verts.chain(on_joints).collect()
    }

    /// Column mean of the template vertices
    pub fn template_mean_point(&self) -> na::Vector3<f64> {
        self.template_mean_point
    }

    fn translation(pose: &Pose) -> Result<na::Vector3<f64>> {
        if pose.global_trans.len() != SPACE_DIM {
            return Err(SmplError::ParamLengthMismatch {
                name: "translation",
                expected: SPACE_DIM,
                actual: pose.global_trans.len(),
            });
        }
        Ok(na::Vector3::new(pose.global_trans[0], pose.global_trans[1], pose.global_trans[2]))
    }
}

fn translate_rows(arr: &mut nd::Array2<f64>, t: &na::Vector3<f64>) {
    for mut row in arr.outer_iter_mut() {
        for d in 0..SPACE_DIM {
            row[d] += t[d];
        }
    }
}

impl SmplModel for SmplAnalytic {
    fn gender(&self) -> Gender {
        self.gender
    }

    fn dims(&self) -> ModelDims {
        self.assets.dims()
    }

    fn forward(&self, betas: &Betas, pose: &Pose) -> Result<SmplOutput> {
        let shape = betas.to_vec();
        self.check_shape(&shape)?;
        let flat_pose = pose.to_flat();
        self.check_pose(&flat_pose)?;
        let translation = Self::translation(pose)?;

        let verts_t_pose = self.betas2verts(betas)?;
        let (mut verts, transforms) = self.pose_verts(&flat_pose, verts_t_pose.view(), None)?;
        let mut joints = transforms.posed_joints();
        translate_rows(&mut verts, &translation);
        translate_rows(&mut joints, &translation);
        Ok(SmplOutput {
            verts,
            faces: self.assets.faces().clone(),
            joints,
        })
    }

    fn betas2verts(&self, betas: &Betas) -> Result<nd::Array2<f64>> {
        self.deformer().deform(Some(betas.to_vec().as_slice()), self.assets.verts_template())
    }

    fn verts2joints(&self, verts_t_pose: &nd::Array2<f64>) -> nd::Array2<f64> {
        self.assets.joint_regressor().dot(verts_t_pose)
    }

    fn apply_pose(&self, verts_t_pose: &nd::Array2<f64>, pose: &Pose) -> Result<nd::Array2<f64>> {
        let flat_pose = pose.to_flat();
        self.check_pose(&flat_pose)?;
        let (posed, _) = self.pose_verts(&flat_pose, verts_t_pose.view(), None)?;
        Ok(posed)
    }

    fn faces(&self) -> &nd::Array2<u32> {
        self.assets.faces()
    }

    fn key_points(&self) -> &KeyPoints {
        self.assets.key_points()
    }
}
