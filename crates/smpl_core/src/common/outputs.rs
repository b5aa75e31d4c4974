use ndarray as nd;

/// Final shaped, posed and translated mesh, the output of ``forward``
#[derive(Clone, Debug)]
pub struct SmplOutput {
    pub verts: nd::Array2<f64>,
    pub faces: nd::Array2<u32>,
    pub joints: nd::Array2<f64>,
}
impl SmplOutput {
    pub fn num_verts(&self) -> usize {
        self.verts.nrows()
    }
    pub fn num_joints(&self) -> usize {
        self.joints.nrows()
    }
}
