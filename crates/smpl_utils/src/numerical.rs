use nalgebra as na;

/// Axis-angle vectors with a norm at or below this are treated as no rotation
pub const ROTATION_EPSILON: f64 = 1e-4;

/// Cross-product matrix of `v`, such that `skew_symmetric(v) * u == v.cross(u)`
pub fn skew_symmetric(v: &na::Vector3<f64>) -> na::Matrix3<f64> {
    na::Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Derivatives of ``skew_symmetric(v)`` w.r.t. each component of `v`. They do
/// not depend on `v`.
pub fn skew_symmetric_derivatives() -> [na::Matrix3<f64>; 3] {
    [
        na::Matrix3::new(0.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0),
        na::Matrix3::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0),
        na::Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
    ]
}

/// Derivative of ``skew_symmetric(v)^2`` w.r.t. `v[idx]`.
/// Uses `[v]x^2 = v v^T - |v|^2 I`.
pub fn skew_squared_derivative(v: &na::Vector3<f64>, idx: usize) -> na::Matrix3<f64> {
    let e = na::Vector3::ith(idx, 1.0);
    e * v.transpose() + v * e.transpose() - na::Matrix3::identity() * (2.0 * v[idx])
}

/// Rotation matrix for an axis-angle vector using the Rodrigues formula.
/// Angles at or below ``ROTATION_EPSILON`` give the identity.
pub fn rodrigues(axis_angle: &na::Vector3<f64>) -> na::Matrix3<f64> {
    let angle = axis_angle.norm();
    if angle <= ROTATION_EPSILON {
        return na::Matrix3::identity();
    }
    let k = skew_symmetric(&(axis_angle / angle));
    na::Matrix3::identity() + k * angle.sin() + k * k * (1.0 - angle.cos())
}

/// Homogeneous translation by `t`
pub fn translation_mat(t: &na::Vector3<f64>) -> na::Matrix4<f64> {
    let mut mat = na::Matrix4::identity();
    mat.fixed_view_mut::<3, 1>(0, 3).copy_from(t);
    mat
}

/// Homogeneous rigid transform with rotation `rot` followed by translation `t`
pub fn rigid_mat(rot: &na::Matrix3<f64>, t: &na::Vector3<f64>) -> na::Matrix4<f64> {
    let mut mat = na::Matrix4::identity();
    mat.fixed_view_mut::<3, 3>(0, 0).copy_from(rot);
    mat.fixed_view_mut::<3, 1>(0, 3).copy_from(t);
    mat
}

/// Embeds the derivative of a rotation into a 4x4 matrix. The translation of a
/// local joint transform is constant, so the last column and row stay zero.
pub fn rotation_derivative_mat(drot: &na::Matrix3<f64>) -> na::Matrix4<f64> {
    let mut mat = na::Matrix4::zeros();
    mat.fixed_view_mut::<3, 3>(0, 0).copy_from(drot);
    mat
}

/// Re-centers `transform` on `pivot` and returns it transposed with the
/// homogeneous row dropped, i.e. the 4x3 block that maps a row vector
/// `[x y z 1]` of a point given in the rest frame to its transformed position.
pub fn point_transform_block(transform: &na::Matrix4<f64>, pivot: &na::Vector3<f64>) -> na::Matrix4x3<f64> {
    let recentered = transform * translation_mat(&(-pivot));
    recentered.transpose().fixed_columns::<3>(0).into_owned()
}
