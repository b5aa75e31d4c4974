mod common;

use approx::assert_abs_diff_eq;
use common::*;
use nalgebra as na;
use ndarray as nd;
use smpl_core::{
    common::{betas::Betas, keypoints::KeyPoint, pose::Pose},
    Gender, RotationBackend, SmplAnalytic, SmplCache, SmplError, SmplModel, SmplOptions,
};
use strum::IntoEnumIterator;

fn eval(model: &SmplAnalytic, pose: Option<&[f64]>, shape: Option<&[f64]>) -> nd::Array2<f64> {
    model.evaluate(pose, shape, None, None).unwrap()
}

#[test]
fn omitted_parameters_give_the_template() {
    let model = model(SmplOptions::default());
    assert_eq!(eval(&model, None, None), template());
}

#[test]
fn zero_pose_and_shape_give_the_template() {
    let model = model(SmplOptions::default());
    let verts = eval(&model, Some(&[0.0; POSE_DIM]), Some(&[0.0; NUM_BETAS]));
    assert_abs_diff_eq!(verts, template(), epsilon = 1e-12);
}

#[test]
fn unit_beta_adds_its_basis_field() {
    let model = model(SmplOptions::default());
    let dirs = shape_dirs();
    for s in 0..NUM_BETAS {
        let mut shape = [0.0; NUM_BETAS];
        shape[s] = 1.0;
        let verts = eval(&model, None, Some(&shape));
        assert_eq!(verts, template() + dirs.index_axis(nd::Axis(0), s));
    }
}

#[test]
fn shape_jacobian_without_pose_is_the_basis() {
    let model = model(SmplOptions::default());
    let mut shape_jac = Vec::new();
    let shape = sample_shape();
    model.evaluate(None, Some(&shape), None, Some(&mut shape_jac)).unwrap();
    assert_eq!(shape_jac.len(), NUM_BETAS);
    for (s, jac) in shape_jac.iter().enumerate() {
        assert_eq!(jac, &shape_dirs().index_axis(nd::Axis(0), s));
    }
}

#[test]
fn child_joint_rotates_about_its_own_location() {
    let model = model(SmplOptions::default());
    let mut pose = [0.0; POSE_DIM];
    pose[5] = std::f64::consts::FRAC_PI_2;
    let verts = eval(&model, Some(&pose), None);

    let expected = template();
    for v in [0, 1, 3, 4, 7] {
        assert_abs_diff_eq!(verts.row(v), expected.row(v), epsilon = 1e-12);
    }
    assert_abs_diff_eq!(verts.row(2), nd::arr1(&[-1.0, 1.0, 0.0]), epsilon = 1e-12);
    assert_abs_diff_eq!(verts.row(5), nd::arr1(&[-0.5, 1.1, -0.1]), epsilon = 1e-12);
    assert_abs_diff_eq!(verts.row(6), nd::arr1(&[-1.5, 1.2, 0.0]), epsilon = 1e-12);

    let joints = model.posed_joint_locations(Some(&pose), None).unwrap();
    assert_abs_diff_eq!(joints.row(1), nd::arr1(&[0.0, 1.0, 0.0]), epsilon = 1e-12);
    assert_abs_diff_eq!(joints.row(2), nd::arr1(&[-1.0, 1.0, 0.0]), epsilon = 1e-12);
}

#[test]
fn root_rotation_rotates_every_vertex() {
    let model = model(SmplOptions::default());
    let angle = std::f64::consts::FRAC_PI_4;
    let mut pose = [0.0; POSE_DIM];
    pose[2] = angle;
    let verts = eval(&model, Some(&pose), None);

    let rot = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), angle);
    for (posed, rest) in verts.outer_iter().zip(template().outer_iter()) {
        let expected = rot * na::Vector3::new(rest[0], rest[1], rest[2]);
        assert_abs_diff_eq!(posed[0], expected.x, epsilon = 1e-12);
        assert_abs_diff_eq!(posed[1], expected.y, epsilon = 1e-12);
        assert_abs_diff_eq!(posed[2], expected.z, epsilon = 1e-12);
    }
}

#[test]
fn pose_jacobian_matches_finite_differences() {
    for backend in RotationBackend::iter() {
        let model = model(SmplOptions::new(backend));
        let pose = sample_pose();
        let shape = sample_shape();
        let mut pose_jac = Vec::new();
        model.evaluate(Some(&pose), Some(&shape), Some(&mut pose_jac), None).unwrap();
        assert_eq!(pose_jac.len(), POSE_DIM);

        let h = 1e-6;
        for (k, analytic) in pose_jac.iter().enumerate() {
            assert_eq!(analytic.dim(), (NUM_VERTS, 3));
            let mut plus = pose.clone();
            plus[k] += h;
            let mut minus = pose.clone();
            minus[k] -= h;
            let numeric = (eval(&model, Some(&plus), Some(&shape)) - eval(&model, Some(&minus), Some(&shape))) / (2.0 * h);
            assert_abs_diff_eq!(*analytic, numeric, epsilon = 1e-6);
        }
    }
}

fn assert_pose_jacobian_matches_finite_differences(model: &SmplAnalytic, pose: &[f64], epsilon: f64) {
    let mut pose_jac = Vec::new();
    model.evaluate(Some(pose), None, Some(&mut pose_jac), None).unwrap();
    let h = 1e-6;
    for (k, analytic) in pose_jac.iter().enumerate() {
        let mut plus = pose.to_vec();
        plus[k] += h;
        let mut minus = pose.to_vec();
        minus[k] -= h;
        let numeric = (eval(model, Some(&plus), None) - eval(model, Some(&minus), None)) / (2.0 * h);
        assert_abs_diff_eq!(*analytic, numeric, epsilon = epsilon);
    }
}

#[test]
fn small_angle_pose_jacobian_matches_finite_differences() {
    //every joint stays inside the identity cutoff of 1e-4
    let pose: Vec<f64> = (0..POSE_DIM).map(|i| 1e-5 * (1 + i % 3) as f64).collect();
    for backend in RotationBackend::iter() {
        assert_pose_jacobian_matches_finite_differences(&model(SmplOptions::new(backend)), &pose, 1e-4);
    }
}

#[test]
fn jacobian_is_consistent_with_one_joint_inside_the_cutoff() {
    let mut pose = sample_pose();
    pose[6..9].copy_from_slice(&[2e-5, -1e-5, 3e-5]);
    assert_pose_jacobian_matches_finite_differences(&model(SmplOptions::default()), &pose, 1e-6);
}

#[test]
fn posed_shape_jacobian_matches_finite_differences() {
    let model = model(SmplOptions::default());
    let pose = sample_pose();
    let shape = sample_shape();
    let mut shape_jac = Vec::new();
    model.evaluate(Some(&pose), Some(&shape), None, Some(&mut shape_jac)).unwrap();
    assert_eq!(shape_jac.len(), NUM_BETAS);

    let h = 1e-5;
    for (s, analytic) in shape_jac.iter().enumerate() {
        let mut plus = shape.clone();
        plus[s] += h;
        let mut minus = shape.clone();
        minus[s] -= h;
        let numeric = (eval(&model, Some(&pose), Some(&plus)) - eval(&model, Some(&pose), Some(&minus))) / (2.0 * h);
        assert_abs_diff_eq!(*analytic, numeric, epsilon = 1e-8);
    }
}

#[test]
fn evaluation_is_idempotent() {
    let model = model(SmplOptions::default());
    let pose = sample_pose();
    let shape = sample_shape();
    let (mut jac_a, mut jac_b) = (Vec::new(), Vec::new());
    let a = model.evaluate(Some(&pose), Some(&shape), Some(&mut jac_a), None).unwrap();
    let b = model.evaluate(Some(&pose), Some(&shape), Some(&mut jac_b), None).unwrap();
    assert_eq!(a, b);
    assert_eq!(jac_a, jac_b);
}

#[test]
fn negligible_weights_are_ignored() {
    init_logging();
    let pose = sample_pose();
    let baseline = SmplAnalytic::new(Gender::Male, assets(), SmplOptions::default());
    let mut jac_baseline = Vec::new();
    let expected = baseline.evaluate(Some(&pose), None, Some(&mut jac_baseline), None).unwrap();

    for tiny in [1e-6, 1e-5] {
        let mut weights = weights();
        weights[[4, 1]] = tiny;
        let model = SmplAnalytic::new(Gender::Male, assets_with_weights(&weights), SmplOptions::default());
        let mut jac = Vec::new();
        let verts = model.evaluate(Some(&pose), None, Some(&mut jac), None).unwrap();
        assert_eq!(verts, expected);
        assert_eq!(jac, jac_baseline);
    }
}

#[test]
fn rotation_backends_agree() {
    let pose = sample_pose();
    let shape = sample_shape();
    let mut results = RotationBackend::iter().map(|backend| {
        let mut jac = Vec::new();
        let verts = model(SmplOptions::default().with_rotation_backend(backend))
            .evaluate(Some(&pose), Some(&shape), Some(&mut jac), None)
            .unwrap();
        (verts, jac)
    });
    let (verts_a, jac_a) = results.next().unwrap();
    for (verts_b, jac_b) in results {
        assert_abs_diff_eq!(verts_a, verts_b, epsilon = 1e-10);
        for (a, b) in jac_a.iter().zip(jac_b.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-10);
        }
    }
}

#[test]
fn wrong_parameter_lengths_are_rejected() {
    let model = model(SmplOptions::default());
    assert!(matches!(
        model.evaluate(Some(&[0.0; POSE_DIM - 1]), None, None, None),
        Err(SmplError::ParamLengthMismatch { name: "pose", .. })
    ));
    assert!(matches!(
        model.evaluate(None, Some(&[0.0; NUM_BETAS + 1]), None, None),
        Err(SmplError::ParamLengthMismatch { name: "shape", .. })
    ));

    let mut pose_jac = vec![nd::Array2::zeros((1, 1))];
    assert!(matches!(
        model.evaluate(None, None, Some(&mut pose_jac), None),
        Err(SmplError::ParamLengthMismatch { .. })
    ));
    let pose = sample_pose();
    assert!(model.evaluate(Some(&pose), Some(&[1.0]), Some(&mut pose_jac), None).is_err());
    assert_eq!(pose_jac.len(), 1);
}

#[test]
fn inconsistent_assets_are_rejected() {
    init_logging();
    let regressor_too_small = smpl_core::SmplAssets::new_from_matrices(
        dims(),
        template(),
        faces(),
        shape_dirs(),
        nd::Array2::zeros((NUM_JOINTS - 1, NUM_VERTS)),
        parents(),
        &weights(),
        key_points(),
    );
    assert!(matches!(regressor_too_small, Err(SmplError::AssetDimensionMismatch { .. })));

    let flat_template = smpl_core::SmplAssets::new_from_matrices(
        dims(),
        nd::Array2::zeros((NUM_VERTS, 2)),
        faces(),
        shape_dirs(),
        regressor(),
        parents(),
        &weights(),
        key_points(),
    );
    assert!(matches!(flat_template, Err(SmplError::UnsupportedDimension(2))));

    let child_before_parent = smpl_core::SmplAssets::new_from_matrices(
        dims(),
        template(),
        faces(),
        shape_dirs(),
        regressor(),
        vec![smpl_core::smpl::ROOT_PARENT, 2, 0, 0],
        &weights(),
        key_points(),
    );
    assert!(matches!(child_before_parent, Err(SmplError::HierarchyMismatch(_))));

    assert!(matches!(
        SmplAnalytic::new_smpl(Gender::Female, assets(), SmplOptions::default()),
        Err(SmplError::AssetDimensionMismatch {
            asset: "number of vertices",
            expected: 6890,
            actual: NUM_VERTS
        })
    ));
    assert!(matches!(Gender::try_from('x'), Err(SmplError::GenderMismatch(_))));
}

#[test]
fn forward_applies_the_translation() {
    let model = model(SmplOptions::default());
    let pose = sample_pose();
    let shape = sample_shape();
    let output = model.forward(&Betas::from_slice(&shape), &Pose::from_flat(&pose, [0.1, -0.2, 0.3]).unwrap()).unwrap();

    let translation = nd::arr1(&[0.1, -0.2, 0.3]);
    let verts = eval(&model, Some(&pose), Some(&shape)) + &translation;
    let joints = model.posed_joint_locations(Some(&pose), Some(&shape)).unwrap() + &translation;
    assert_abs_diff_eq!(output.verts, verts, epsilon = 1e-12);
    assert_abs_diff_eq!(output.joints, joints, epsilon = 1e-12);
    assert_eq!(output.faces, faces());
    assert_eq!(output.num_joints(), NUM_JOINTS);
}

#[test]
fn trait_steps_compose_to_an_evaluation() {
    let model = model(SmplOptions::default());
    let pose = sample_pose();
    let shape = sample_shape();
    let verts_t_pose = model.betas2verts(&Betas::from_slice(&shape)).unwrap();
    assert_eq!(model.verts2joints(&verts_t_pose), model.joint_locations(Some(&shape)).unwrap());
    let posed = model.apply_pose(&verts_t_pose, &Pose::from_flat(&pose, [0.0; 3]).unwrap()).unwrap();
    assert_eq!(posed, eval(&model, Some(&pose), Some(&shape)));
}

#[test]
fn key_points_follow_the_model() {
    let model = model(SmplOptions::default());
    let pose = sample_pose();
    let verts = eval(&model, Some(&pose), None);
    let joints = model.posed_joint_locations(Some(&pose), None).unwrap();

    let locations = model.key_point_locations(&verts, &joints);
    assert_eq!(locations.len(), 3);
    for (key, location) in locations {
        let expected = match key {
            KeyPoint::Nose => verts.row(6),
            KeyPoint::Pelvis => joints.row(0),
            KeyPoint::RightElbow => joints.row(3),
            other => panic!("unexpected key point {other}"),
        };
        assert_eq!(location, na::Vector3::new(expected[0], expected[1], expected[2]));
    }
    assert_eq!(model.key_point_by_name("Right_Elbow"), model.key_point(KeyPoint::RightElbow));
    assert!(model.key_point(KeyPoint::LeftHeel).is_none());
}

#[test]
fn template_mean_point_is_the_vertex_centroid() {
    let model = model(SmplOptions::default());
    let mean = template().mean_axis(nd::Axis(0)).unwrap();
    assert_abs_diff_eq!(model.template_mean_point(), na::Vector3::new(mean[0], mean[1], mean[2]), epsilon = 1e-12);
}

#[test]
fn assets_are_only_readable_after_loading() {
    let model = model(SmplOptions::default());
    let assets = model.assets();
    assert_eq!(assets.dims(), dims());
    assert_eq!(assets.parent_idx_per_joint(), parents().as_slice());
    assert_eq!(assets.verts_template(), &template());
    assert_eq!(assets.lbs_weights().nnz(), 15);
    assert_eq!(model.options(), SmplOptions::default());
}

#[test]
fn cache_holds_one_model_per_gender() {
    let mut cache = SmplCache::default();
    cache.add_model(model(SmplOptions::default()));
    assert!(cache.has_model(Gender::Male));
    assert!(!cache.has_model(Gender::Female));
    let cached = cache.get_model_ref(Gender::Male).unwrap();
    assert_eq!(cached.gender(), Gender::Male);
    assert_eq!(cached.dims(), dims());
    cache.remove_all_models();
    assert!(cache.get_model_ref(Gender::Male).is_none());
}
