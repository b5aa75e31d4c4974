use super::{HOMO_SIZE, SPACE_DIM};
use crate::common::errors::{Result, SmplError};
use ndarray as nd;
use smpl_utils::sparse::{SparseMatrix, Triplet};

/// Linear blend skinning as a single sparse operator of size `V x 4J`.
///
/// Row `v` holds `w * [x y z 1]` in the column block of every joint that
/// influences vertex `v`, so multiplying with the stacked point transforms
/// blends the rigidly moved copies of the vertex. The operator only depends on
/// the unposed vertices and the weights.
#[derive(Clone, Debug)]
pub struct LbsOperator {
    matrix: SparseMatrix,
}
impl LbsOperator {
    /// # Errors
    /// ``UnsupportedDimension`` if the vertices are not 3D and
    /// ``ParamLengthMismatch`` if their count differs from the weights
    pub fn new(lbs_weights: &SparseMatrix, verts: nd::ArrayView2<f64>) -> Result<Self> {
        if verts.ncols() != SPACE_DIM {
            return Err(SmplError::UnsupportedDimension(verts.ncols()));
        }
        if verts.nrows() != lbs_weights.nrows() {
            return Err(SmplError::ParamLengthMismatch {
                name: "skinned vertices",
                expected: lbs_weights.nrows(),
                actual: verts.nrows(),
            });
        }
        let num_joints = lbs_weights.ncols();
        let mut triplets: Vec<Triplet> = Vec::with_capacity(lbs_weights.nnz() * HOMO_SIZE);
        for Triplet {
            row: idx_vert,
            col: idx_joint,
            value: weight,
        } in lbs_weights.iter()
        {
            //premultiply weights by the homogeneous vertex
            for idx_dim in 0..SPACE_DIM {
                triplets.push(Triplet::new(
                    idx_vert,
                    idx_joint * HOMO_SIZE + idx_dim,
                    weight * verts[[idx_vert, idx_dim]],
                ));
            }
            triplets.push(Triplet::new(idx_vert, idx_joint * HOMO_SIZE + SPACE_DIM, weight));
        }
        let matrix = SparseMatrix::from_triplets(verts.nrows(), num_joints * HOMO_SIZE, triplets);
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    /// Skinned vertices for stacked point transforms of shape `4J x 3`
    pub fn apply(&self, point_transforms: &nd::Array2<f64>) -> nd::Array2<f64> {
        self.matrix.dot_dense(point_transforms)
    }

    /// Pushes stacked transform jacobians through the operator, in place. Each
    /// `4J x 3` entry becomes the `V x 3` jacobian of the vertices.
    pub fn apply_jacobians(&self, jacobians: &mut [nd::Array2<f64>]) {
        for jac in jacobians.iter_mut() {
            *jac = self.matrix.dot_dense(jac);
        }
    }
}
