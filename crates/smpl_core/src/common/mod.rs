pub mod assets;
pub mod betas;
pub mod errors;
pub mod keypoints;
pub mod metadata;
pub mod outputs;
pub mod pose;
pub mod smpl_model;
pub mod smpl_options;
pub mod types;
