//! Frustum reconstruction against known-good reference output.
//!
//! Conventions: right-handed view space (camera looks down -Z), clip depth
//! in [0, 1] as produced by `Mat4::perspective_rh`.
use cascade_shadows::shadows::{frustum_corners, practical_split_scheme, view_depth_to_clip_depth};
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_4;

fn reference_view_proj_inverse() -> Mat4 {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh(FRAC_PI_4, 1.0, 0.25, 10000.0);
    (projection * view).inverse()
}

fn assert_close(actual: Vec3, expected: Vec3, tolerance: f32) {
    assert!(
        (actual - expected).abs().max_element() <= tolerance,
        "{actual:?} != {expected:?} (tolerance {tolerance})"
    );
}

#[test]
fn full_depth_range_first_corner_is_top_left_far() {
    let corners = frustum_corners(0.0, 1.0, &reference_view_proj_inverse()).unwrap();
    assert_eq!(corners.len(), 8);

    assert_close(corners[0], Vec3::new(-4136.519, 4136.519, -9976.457), 0.01);
    assert!(corners[0].x < 0.0 && corners[0].y > 0.0);
}

#[test]
fn partial_depth_range_first_corner_matches_reference() {
    let corners = frustum_corners(0.3, 0.8, &reference_view_proj_inverse()).unwrap();
    assert_close(corners[0], Vec3::new(-0.517_715_1, 0.517_715_1, 8.750_123), 0.01);
}

#[test]
fn near_face_corners_sit_on_the_near_plane() {
    let corners = frustum_corners(0.0, 1.0, &reference_view_proj_inverse()).unwrap();
    let half = 0.25 * (FRAC_PI_4 * 0.5).tan();
    // Corners 4..8 are the clip-near face.
    assert_close(corners[4], Vec3::new(-half, half, 9.75), 1e-3);
    assert_close(corners[6], Vec3::new(half, -half, 9.75), 1e-3);
}

#[test]
fn split_depths_round_trip_through_projection() {
    let projection = Mat4::perspective_rh(FRAC_PI_4, 1.0, 1.0, 1000.0);
    let inverse = projection.inverse();
    let splits = practical_split_scheme(4, 1.0, 200.0).unwrap();

    for depth in splits {
        let clip = view_depth_to_clip_depth(-depth, &projection);
        let corners = frustum_corners(clip, clip, &inverse).unwrap();
        for corner in corners {
            assert!(
                (corner.z + depth).abs() <= depth * 1e-3,
                "depth {depth} reconstructed as {}",
                -corner.z
            );
        }
    }
}
