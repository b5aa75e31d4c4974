#![allow(dead_code)]

use ndarray as nd;
use ndarray::array;
use smpl_core::{
    common::keypoints::{KeyIndex, KeyPoint, KeyPoints},
    smpl::ROOT_PARENT,
    Gender, ModelDims, SmplAnalytic, SmplAssets, SmplOptions,
};

pub const NUM_VERTS: usize = 9;
pub const NUM_JOINTS: usize = 4;
pub const NUM_BETAS: usize = 2;
pub const POSE_DIM: usize = NUM_JOINTS * 3;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn dims() -> ModelDims {
    ModelDims::new(NUM_VERTS, NUM_JOINTS, NUM_BETAS, 4)
}

/// Joint `j` sits on vertex `j`: a root at the origin, a chain going up the y
/// axis and a second branch along x.
pub fn parents() -> Vec<u32> {
    vec![ROOT_PARENT, 0, 1, 0]
}

pub fn template() -> nd::Array2<f64> {
    array![
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 2.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.5, 0.5, 0.2],
        [0.1, 1.5, -0.1],
        [0.2, 2.5, 0.0],
        [1.5, 0.2, 0.1],
        [-0.3, 0.8, 0.4],
    ]
}

pub fn weights() -> nd::Array2<f64> {
    array![
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
        [0.5, 0.0, 0.0, 0.5],
        [0.0, 0.6, 0.4, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.2, 0.0, 0.0, 0.8],
        [0.3, 0.3, 0.2, 0.2],
    ]
}

pub fn shape_dirs() -> nd::Array3<f64> {
    nd::Array3::from_shape_fn((NUM_BETAS, NUM_VERTS, 3), |(s, v, d)| {
        0.05 * (s + 1) as f64 * ((v * 3 + d) as f64 * 0.7 + s as f64).sin()
    })
}

pub fn regressor() -> nd::Array2<f64> {
    nd::Array2::from_shape_fn((NUM_JOINTS, NUM_VERTS), |(j, v)| if j == v { 1.0 } else { 0.0 })
}

pub fn faces() -> nd::Array2<u32> {
    array![[0, 1, 4], [1, 2, 5], [4, 5, 8], [3, 7, 4]]
}

pub fn key_points() -> KeyPoints {
    KeyPoints::empty()
        .with(KeyPoint::Nose, KeyIndex::Vertex(6))
        .with(KeyPoint::Pelvis, KeyIndex::Joint(0))
        .with(KeyPoint::RightElbow, KeyIndex::Joint(3))
}

pub fn assets_with_weights(weights: &nd::Array2<f64>) -> SmplAssets {
    SmplAssets::new_from_matrices(dims(), template(), faces(), shape_dirs(), regressor(), parents(), weights, key_points()).unwrap()
}

pub fn assets() -> SmplAssets {
    assets_with_weights(&weights())
}

pub fn model(options: SmplOptions) -> SmplAnalytic {
    init_logging();
    SmplAnalytic::new(Gender::Male, assets(), options)
}

/// Deterministic pose with every joint rotated well away from the small
/// angle cutoff
pub fn sample_pose() -> Vec<f64> {
    (0..POSE_DIM).map(|i| 0.3 + 0.4 * (1.7 * i as f64 + 0.4).sin()).collect()
}

pub fn sample_shape() -> Vec<f64> {
    vec![0.8, -1.3]
}
