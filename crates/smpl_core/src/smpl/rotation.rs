//! Axis-angle to rotation matrix maps and their derivatives.
//!
//! Both implementations share the same small angle convention: at or below
//! [`ROTATION_EPSILON`] the rotation is the identity. The map is constant
//! there, so its derivative is zero.

use crate::common::types::RotationBackend;
use nalgebra as na;
use smpl_utils::numerical::{rodrigues, skew_squared_derivative, skew_symmetric, skew_symmetric_derivatives, ROTATION_EPSILON};

/// Rotation together with its derivative w.r.t. each axis-angle component
pub type RotationWithJacobian = (na::Matrix3<f64>, [na::Matrix3<f64>; 3]);

fn identity_with_zero_jacobian() -> RotationWithJacobian {
    (na::Matrix3::identity(), [na::Matrix3::zeros(); 3])
}

pub trait RotationDifferentiator: Send + Sync {
    fn rotation(&self, axis_angle: &na::Vector3<f64>) -> na::Matrix3<f64>;
    fn rotation_with_jacobian(&self, axis_angle: &na::Vector3<f64>) -> RotationWithJacobian;
}

/// Rodrigues formula with its derivative worked out by hand
#[derive(Clone, Copy, Debug, Default)]
pub struct ClosedFormRodrigues;

impl RotationDifferentiator for ClosedFormRodrigues {
    fn rotation(&self, axis_angle: &na::Vector3<f64>) -> na::Matrix3<f64> {
        rodrigues(axis_angle)
    }

    fn rotation_with_jacobian(&self, axis_angle: &na::Vector3<f64>) -> RotationWithJacobian {
        let angle = axis_angle.norm();
        if angle <= ROTATION_EPSILON {
            return identity_with_zero_jacobian();
        }
        let skew_derivs = skew_symmetric_derivatives();
        let (sin, cos) = angle.sin_cos();
        let k = skew_symmetric(&(axis_angle / angle));
        let k2 = k * k;
        let rot = na::Matrix3::identity() + k * sin + k2 * (1.0 - cos);

        let jac = std::array::from_fn(|i| {
            let r_i = axis_angle[i];
            k * (cos * r_i / angle)
                + (skew_derivs[i] - k * (r_i / angle)) * (sin / angle)
                + k2 * (sin * r_i / angle)
                + (skew_squared_derivative(axis_angle, i) - k2 * (2.0 * r_i)) * ((1.0 - cos) / (angle * angle))
        });
        (rot, jac)
    }
}

/// Rotation from ``nalgebra::Rotation3`` and the compact derivative
/// `dR/dr_i = (r_i [r]x + [r x (I - R) e_i]x) R / |r|^2`
#[derive(Clone, Copy, Debug, Default)]
pub struct NalgebraRotation;

impl RotationDifferentiator for NalgebraRotation {
    fn rotation(&self, axis_angle: &na::Vector3<f64>) -> na::Matrix3<f64> {
        if axis_angle.norm() <= ROTATION_EPSILON {
            return na::Matrix3::identity();
        }
        na::Rotation3::new(*axis_angle).into_inner()
    }

    fn rotation_with_jacobian(&self, axis_angle: &na::Vector3<f64>) -> RotationWithJacobian {
        let angle_sq = axis_angle.norm_squared();
        if angle_sq.sqrt() <= ROTATION_EPSILON {
            return identity_with_zero_jacobian();
        }
        let rot = na::Rotation3::new(*axis_angle).into_inner();
        let skew = skew_symmetric(axis_angle);
        let i_minus_r = na::Matrix3::identity() - rot;
        let jac = std::array::from_fn(|i| {
            let e_i = na::Vector3::ith(i, 1.0);
            let cross = axis_angle.cross(&(i_minus_r * e_i));
            (skew * axis_angle[i] + skew_symmetric(&cross)) * rot / angle_sq
        });
        (rot, jac)
    }
}

static CLOSED_FORM: ClosedFormRodrigues = ClosedFormRodrigues;
static NALGEBRA: NalgebraRotation = NalgebraRotation;

impl RotationBackend {
    pub fn differentiator(self) -> &'static dyn RotationDifferentiator {
        match self {
            RotationBackend::ClosedForm => &CLOSED_FORM,
            RotationBackend::Nalgebra => &NALGEBRA,
        }
    }
}
