use crate::smpl::SHAPE_SPACE_DIM;
use ndarray as nd;

/// Smpl Betas or Shape Parameters
#[derive(Clone, Debug, PartialEq)]
pub struct Betas {
    pub betas: nd::Array1<f64>,
}
impl Default for Betas {
    fn default() -> Self {
        Self::new_empty(SHAPE_SPACE_DIM)
    }
}
impl Betas {
    pub fn new(betas: nd::Array1<f64>) -> Self {
        Self { betas }
    }
    pub fn new_empty(num_betas: usize) -> Self {
        let betas = nd::Array1::<f64>::zeros(num_betas);
        Self { betas }
    }
    pub fn from_slice(betas: &[f64]) -> Self {
        Self::new(nd::Array1::from_vec(betas.to_vec()))
    }
    pub fn num_betas(&self) -> usize {
        self.betas.len()
    }
    /// Betas as a contiguous slice, the layout the model evaluation takes
    pub fn to_vec(&self) -> Vec<f64> {
        self.betas.to_vec()
    }
}
