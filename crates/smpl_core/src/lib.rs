// #![warn(
//     clippy::all,
//     clippy::pedantic,
// )]

//! Differentiable SMPL body model: vertices of a shaped and posed template
//! together with their analytic jacobians w.r.t. the pose and shape
//! parameters.

pub mod common;
pub mod smpl;

pub use common::{
    assets::SmplAssets,
    errors::{Result, SmplError},
    smpl_model::{SmplCache, SmplModel},
    smpl_options::SmplOptions,
    types::{Gender, ModelDims, RotationBackend},
};
pub use smpl::smpl_analytic::SmplAnalytic;
