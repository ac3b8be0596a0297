//! Frustum reconstruction and split-depth helpers.
//!
//! Clip space here is whatever the supplied projection produces: X/Y span
//! `[-1, 1]` and Z spans the projection's own depth range (`[0, 1]` for the
//! glam `*_rh`/`*_lh` builders used by wgpu).

use glam::{Mat4, Vec3, Vec4};

use super::bounds::Aabb;
use crate::error::{ShadowError, ShadowResult};

/// World-space corners of the clip-space slab `X, Y ∈ [-1, 1]`,
/// `Z ∈ [clip_near, clip_far]`, in [`Aabb::corners`] order (far slab face
/// first).
///
/// A corner whose homogeneous W is zero after the inverse transform means
/// the projection or depth bounds are invalid and is rejected.
pub fn frustum_corners(
    clip_near: f32,
    clip_far: f32,
    view_proj_inverse: &Mat4,
) -> ShadowResult<[Vec3; 8]> {
    let clip_box = Aabb {
        min: Vec3::new(-1.0, -1.0, clip_near),
        max: Vec3::new(1.0, 1.0, clip_far),
    };

    let mut corners = [Vec3::ZERO; 8];
    for (corner, clip) in corners.iter_mut().zip(clip_box.corners()) {
        let world = *view_proj_inverse * clip.extend(1.0);
        if world.w == 0.0 || !world.is_finite() {
            return Err(ShadowError::DegenerateClipPoint { clip_depth: clip.z });
        }
        *corner = world.truncate() / world.w;
    }
    Ok(corners)
}

/// Practical split scheme: `num_splits + 1` boundaries over view depth
/// `[near, far]`.
///
/// Boundary `i < num_splits` is the mean of the logarithmic split
/// `near * (far / near)^(i / n)` and the uniform split
/// `near + (far - near) * i / n`; boundary 0 is therefore `near` and the
/// final boundary is exactly `far`.
pub fn practical_split_scheme(num_splits: usize, near: f32, far: f32) -> ShadowResult<Vec<f32>> {
    if num_splits == 0 {
        return Err(ShadowError::ZeroSplits);
    }
    if !(near > 0.0) || !near.is_finite() {
        return Err(ShadowError::InvalidNearDepth(near));
    }
    if !(far > near) || !far.is_finite() {
        return Err(ShadowError::DegenerateSplitRange { near, far });
    }

    let mut splits = Vec::with_capacity(num_splits + 1);
    for i in 0..num_splits {
        let p = i as f32 / num_splits as f32;
        let log = near * (far / near).powf(p);
        let linear = near + (far - near) * p;
        splits.push(0.5 * (log + linear));
    }
    splits.push(far);
    Ok(splits)
}

/// Projects the view-space point `(0, 0, depth)` and returns its clip depth,
/// or `None` when the projected W is exactly zero.
pub fn checked_view_depth_to_clip_depth(depth: f32, projection: &Mat4) -> Option<f32> {
    let clip = *projection * Vec4::new(0.0, 0.0, depth, 1.0);
    (clip.w != 0.0).then(|| clip.z / clip.w)
}

/// Same as [`checked_view_depth_to_clip_depth`] but maps a zero W to a clip
/// depth of `0.0`.
///
/// The fallback is discontinuous: depths approaching the W = 0 plane diverge
/// while the plane itself reads as the near clip value. Callers that must
/// not hide a degenerate camera should use the checked variant.
pub fn view_depth_to_clip_depth(depth: f32, projection: &Mat4) -> f32 {
    checked_view_depth_to_clip_depth(depth, projection).unwrap_or_else(|| {
        log::warn!("View depth {} projects to W = 0; using clip depth 0", depth);
        0.0
    })
}
