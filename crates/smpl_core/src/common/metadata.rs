use crate::smpl;

/// Static description of the canonical SMPL model
#[derive(Default, Clone, Debug)]
pub struct SmplMetadata {
    pub num_joints: usize,
    pub num_verts: usize,
    pub num_faces: usize,
    pub shape_space_dim: usize,
    pub weights_by_vertex: usize,
    pub joint_parents: Vec<u32>,
    pub joint_names: Vec<String>,
}
impl SmplMetadata {
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joint_names.iter().position(|n| n == name)
    }
}
pub fn smpl_metadata() -> SmplMetadata {
    SmplMetadata {
        num_joints: smpl::NUM_JOINTS,
        num_verts: smpl::NUM_VERTS,
        num_faces: smpl::NUM_FACES,
        shape_space_dim: smpl::SHAPE_SPACE_DIM,
        weights_by_vertex: smpl::WEIGHTS_BY_VERTEX,
        joint_parents: smpl::PARENT_ID_PER_JOINT.to_vec(),
        joint_names: smpl::JOINT_NAMES.map(std::string::ToString::to_string).to_vec(),
    }
}
