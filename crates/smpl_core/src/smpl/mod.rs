pub mod kinematics;
pub mod rotation;
pub mod shape;
pub mod skinning;
pub mod smpl_analytic;

pub const SPACE_DIM: usize = 3;
/// Size of a homogeneous point or transform row
pub const HOMO_SIZE: usize = SPACE_DIM + 1;
pub const NUM_VERTS: usize = 6890;
pub const NUM_FACES: usize = 13776;
pub const NUM_JOINTS: usize = 24;
pub const SHAPE_SPACE_DIM: usize = 10;
pub const POSE_DIM: usize = NUM_JOINTS * SPACE_DIM;
pub const WEIGHTS_BY_VERTEX: usize = 4;
/// Skinning weights at or below this are dropped when the assets are built
pub const WEIGHT_EPSILON: f64 = 1e-5;
/// Parent entry of the root joint
pub const ROOT_PARENT: u32 = u32::MAX;
pub const PARENT_ID_PER_JOINT: [u32; NUM_JOINTS] = [
    ROOT_PARENT, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 9, 12, 13, 14, 16, 17, 18, 19, 20, 21,
];
pub const JOINT_NAMES: [&str; NUM_JOINTS] = [
    "pelvis",
    "left_hip",
    "right_hip",
    "spine1",
    "left_knee",
    "right_knee",
    "spine2",
    "left_ankle",
    "right_ankle",
    "spine3",
    "left_foot",
    "right_foot",
    "neck",
    "left_collar",
    "right_collar",
    "head",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hand",
    "right_hand",
];
