use super::{
    errors::{Result, SmplError},
    keypoints::KeyPoints,
    types::ModelDims,
};
use crate::smpl::{ROOT_PARENT, SPACE_DIM, WEIGHT_EPSILON};
use log::{info, warn};
use ndarray as nd;
use smpl_utils::sparse::SparseMatrix;

//rows of the skinning weights further than this from one are reported
const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Template data of a model, already parsed into memory. Immutable once built.
/// Only ``new_from_matrices`` creates one, after checking every array against
/// ``ModelDims``.
#[derive(Clone, Debug)]
pub struct SmplAssets {
    dims: ModelDims,
    /// `V x 3`
    verts_template: nd::Array2<f64>,
    /// `F x 3` vertex indices
    faces: nd::Array2<u32>,
    /// `S x V x 3` per vertex offsets for one unit of each shape parameter
    shape_dirs: nd::Array3<f64>,
    /// `J x V`
    joint_regressor: nd::Array2<f64>,
    /// Parent of every joint, ``ROOT_PARENT`` for the root
    parent_idx_per_joint: Vec<u32>,
    /// `V x J` with entries at or below ``WEIGHT_EPSILON`` removed
    lbs_weights: SparseMatrix,
    key_points: KeyPoints,
}
impl SmplAssets {
    /// # Errors
    /// ``UnsupportedDimension`` if points are not 3D, ``AssetDimensionMismatch``
    /// if an array disagrees with `dims` and ``HierarchyMismatch`` if the joints
    /// are not a tree with parents listed before their children
    #[allow(clippy::too_many_arguments)]
    pub fn new_from_matrices(
        dims: ModelDims,
        verts_template: nd::Array2<f64>,
        faces: nd::Array2<u32>,
        shape_dirs: nd::Array3<f64>,
        joint_regressor: nd::Array2<f64>,
        parent_idx_per_joint: Vec<u32>,
        lbs_weights: &nd::Array2<f64>,
        key_points: KeyPoints,
    ) -> Result<Self> {
        let ModelDims {
            num_verts,
            num_joints,
            shape_space_dim,
            weights_by_vertex,
        } = dims;

        if verts_template.ncols() != SPACE_DIM {
            return Err(SmplError::UnsupportedDimension(verts_template.ncols()));
        }
        check_dim("template vertices", num_verts, verts_template.nrows())?;

        check_dim("face columns", 3, faces.ncols())?;
        if let Some(&max_idx) = faces.iter().max() {
            if max_idx as usize >= num_verts {
                return Err(SmplError::AssetDimensionMismatch {
                    asset: "face vertex index",
                    expected: num_verts,
                    actual: max_idx as usize,
                });
            }
        }

        let (nr_shapes, shape_verts, shape_dim) = shape_dirs.dim();
        check_dim("shape basis size", shape_space_dim, nr_shapes)?;
        check_dim("shape basis vertices", num_verts, shape_verts)?;
        if shape_dim != SPACE_DIM {
            return Err(SmplError::UnsupportedDimension(shape_dim));
        }

        check_dim("joint regressor joints", num_joints, joint_regressor.nrows())?;
        check_dim("joint regressor vertices", num_verts, joint_regressor.ncols())?;

        check_hierarchy(&parent_idx_per_joint, num_joints)?;

        check_dim("skinning weight vertices", num_verts, lbs_weights.nrows())?;
        check_dim("skinning weight joints", num_joints, lbs_weights.ncols())?;
        let lbs_weights = SparseMatrix::from_dense_thresholded(lbs_weights.view(), WEIGHT_EPSILON);
        let mut nr_unnormalized = 0;
        for v in 0..num_verts {
            let nnz = lbs_weights.row_nnz(v);
            if nnz > weights_by_vertex {
                return Err(SmplError::AssetDimensionMismatch {
                    asset: "skinning weights per vertex",
                    expected: weights_by_vertex,
                    actual: nnz,
                });
            }
            let sum: f64 = lbs_weights.row(v).map(|(_, w)| w).sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                nr_unnormalized += 1;
            }
        }
        if nr_unnormalized > 0 {
            warn!("{nr_unnormalized} vertices have skinning weights that do not sum to one");
        }

        key_points.validate(num_verts, num_joints)?;

        info!(
            "Loaded model assets: {num_verts} verts, {} faces, {num_joints} joints, {shape_space_dim} shape components, {} skinning weights",
            faces.nrows(),
            lbs_weights.nnz()
        );

        Ok(Self {
            dims,
            verts_template,
            faces,
            shape_dirs,
            joint_regressor,
            parent_idx_per_joint,
            lbs_weights,
            key_points,
        })
    }

    pub fn dims(&self) -> ModelDims {
        self.dims
    }
    pub fn verts_template(&self) -> &nd::Array2<f64> {
        &self.verts_template
    }
    pub fn faces(&self) -> &nd::Array2<u32> {
        &self.faces
    }
    pub fn shape_dirs(&self) -> &nd::Array3<f64> {
        &self.shape_dirs
    }
    pub fn joint_regressor(&self) -> &nd::Array2<f64> {
        &self.joint_regressor
    }
    /// Parents listed before their children, ``ROOT_PARENT`` for joint 0
    pub fn parent_idx_per_joint(&self) -> &[u32] {
        &self.parent_idx_per_joint
    }
    pub fn lbs_weights(&self) -> &SparseMatrix {
        &self.lbs_weights
    }
    pub fn key_points(&self) -> &KeyPoints {
        &self.key_points
    }

    pub fn num_verts(&self) -> usize {
        self.dims.num_verts
    }
    pub fn num_joints(&self) -> usize {
        self.dims.num_joints
    }
    pub fn shape_space_dim(&self) -> usize {
        self.dims.shape_space_dim
    }
    pub fn pose_dim(&self) -> usize {
        self.dims.pose_dim()
    }

    /// Offsets of one shape component, `V x 3`
    pub fn shape_dir(&self, idx: usize) -> nd::ArrayView2<f64> {
        self.shape_dirs.index_axis(nd::Axis(0), idx)
    }
}

fn check_dim(asset: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SmplError::AssetDimensionMismatch { asset, expected, actual })
    }
}

fn check_hierarchy(parents: &[u32], num_joints: usize) -> Result<()> {
    if parents.len() != num_joints {
        return Err(SmplError::HierarchyMismatch(format!(
            "expected {num_joints} parent entries, got {}",
            parents.len()
        )));
    }
    for (joint, &parent) in parents.iter().enumerate() {
        match (joint, parent) {
            (0, ROOT_PARENT) => {}
            (0, _) => return Err(SmplError::HierarchyMismatch(format!("joint 0 must be the root, found parent {parent}"))),
            (_, ROOT_PARENT) => return Err(SmplError::HierarchyMismatch(format!("joint {joint} is a second root"))),
            (_, _) if parent as usize >= joint => {
                return Err(SmplError::HierarchyMismatch(format!(
                    "joint {joint} has parent {parent}, parents have to come before their children"
                )))
            }
            _ => {}
        }
    }
    Ok(())
}
