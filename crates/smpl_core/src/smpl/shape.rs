use crate::common::errors::{Result, SmplError};
use ndarray as nd;

/// Blends shape basis offsets into the template vertices
pub struct ShapeDeformer<'a> {
    shape_dirs: &'a nd::Array3<f64>,
}
impl<'a> ShapeDeformer<'a> {
    /// `shape_dirs` is `S x V x 3`
    pub fn new(shape_dirs: &'a nd::Array3<f64>) -> Self {
        Self { shape_dirs }
    }

    pub fn shape_space_dim(&self) -> usize {
        self.shape_dirs.len_of(nd::Axis(0))
    }

    /// `base_verts + sum_i betas[i] * shape_dirs[i]`. Without betas the base
    /// vertices are returned unchanged.
    /// # Errors
    /// ``ParamLengthMismatch`` if there is not exactly one beta per basis
    /// field
    pub fn deform(&self, betas: Option<&[f64]>, base_verts: &nd::Array2<f64>) -> Result<nd::Array2<f64>> {
        let mut verts = base_verts.clone();
        let Some(betas) = betas else {
            return Ok(verts);
        };
        if betas.len() != self.shape_space_dim() {
            return Err(SmplError::ParamLengthMismatch {
                name: "shape",
                expected: self.shape_space_dim(),
                actual: betas.len(),
            });
        }
        for (beta, shape_dir) in betas.iter().zip(self.shape_dirs.outer_iter()) {
            verts.scaled_add(*beta, &shape_dir);
        }
        Ok(verts)
    }

    /// The map is linear so the jacobian w.r.t. every beta is its basis field,
    /// independent of the betas themselves
    pub fn jacobian(&self) -> Vec<nd::Array2<f64>> {
        self.shape_dirs.outer_iter().map(|dir| dir.to_owned()).collect()
    }
}
