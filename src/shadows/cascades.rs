//! Per-frame cascaded shadow transforms for a directional light.
//!
//! Conventions are explicit in [`ShadowConfig`]: right-handed view space
//! with the camera looking down -Z is the default, up is +Y, and clip depth
//! follows whatever range the camera projection produces.

use glam::{Mat4, Vec3};

use super::atlas::{ShadowAtlas, TileBounds, TileViewport};
use super::bounds::Aabb;
use super::frustum::{checked_view_depth_to_clip_depth, frustum_corners, practical_split_scheme};
use crate::error::{ShadowError, ShadowResult};
use crate::shadows::uniforms::MAX_CASCADES;

const DEFAULT_CASCADE_COUNT: usize = 4;
const DEFAULT_SPLIT_NEAR: f32 = 1.0;
const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Handedness {
    /// Camera looks down -Z; view depths are negative in front of it.
    #[default]
    RightHanded,
    /// Camera looks down +Z; view depths are positive in front of it.
    LeftHanded,
}

/// How far from the camera the last cascade reaches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ViewDistance {
    /// Largest side of the scene bounding box.
    #[default]
    SceneExtent,
    Fixed(f32),
}

/// Immutable cascade layout, fixed for the lifetime of a [`CascadedShadows`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowConfig {
    cascade_count: usize,
    atlas: ShadowAtlas,
    split_near: f32,
    view_distance: ViewDistance,
    handedness: Handedness,
    up: Vec3,
}

impl ShadowConfig {
    pub fn new(cascade_count: usize, atlas: ShadowAtlas) -> ShadowResult<Self> {
        if cascade_count == 0 || cascade_count > MAX_CASCADES {
            return Err(ShadowError::InvalidCascadeCount {
                count: cascade_count,
                max: MAX_CASCADES,
            });
        }
        if cascade_count > atlas.capacity() {
            return Err(ShadowError::AtlasTooSmall {
                columns: atlas.columns(),
                rows: atlas.rows(),
                cascades: cascade_count,
            });
        }

        Ok(Self {
            cascade_count,
            atlas,
            split_near: DEFAULT_SPLIT_NEAR,
            view_distance: ViewDistance::default(),
            handedness: Handedness::default(),
            up: Vec3::Y,
        })
    }

    /// View depth where the first cascade starts.
    pub fn with_split_near(mut self, split_near: f32) -> ShadowResult<Self> {
        if !(split_near > 0.0) || !split_near.is_finite() {
            return Err(ShadowError::InvalidNearDepth(split_near));
        }
        if let ViewDistance::Fixed(distance) = self.view_distance {
            if !(distance > split_near) {
                return Err(ShadowError::DegenerateSplitRange {
                    near: split_near,
                    far: distance,
                });
            }
        }
        self.split_near = split_near;
        Ok(self)
    }

    pub fn with_view_distance(mut self, view_distance: ViewDistance) -> ShadowResult<Self> {
        if let ViewDistance::Fixed(distance) = view_distance {
            if !(distance > self.split_near) || !distance.is_finite() {
                return Err(ShadowError::DegenerateSplitRange {
                    near: self.split_near,
                    far: distance,
                });
            }
        }
        self.view_distance = view_distance;
        Ok(self)
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    pub fn with_up(mut self, up: Vec3) -> ShadowResult<Self> {
        if !up.is_finite() || up.length_squared() <= PARALLEL_EPSILON {
            return Err(ShadowError::InvalidUpVector(up));
        }
        self.up = up.normalize();
        Ok(self)
    }

    pub fn cascade_count(&self) -> usize {
        self.cascade_count
    }

    pub fn atlas(&self) -> &ShadowAtlas {
        &self.atlas
    }

    pub fn split_near(&self) -> f32 {
        self.split_near
    }

    pub fn view_distance(&self) -> ViewDistance {
        self.view_distance
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            cascade_count: DEFAULT_CASCADE_COUNT,
            atlas: ShadowAtlas::default(),
            split_near: DEFAULT_SPLIT_NEAR,
            view_distance: ViewDistance::default(),
            handedness: Handedness::default(),
            up: Vec3::Y,
        }
    }
}

/// Everything the render loop needs for one cascade in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CascadeTransform {
    pub index: usize,
    /// Light view-projection used to render occluders into the tile.
    pub view_proj: Mat4,
    /// Positive view-space distance where this cascade ends.
    pub far_view_depth: f32,
    /// Camera clip-space depth where this cascade ends.
    pub far_clip_depth: f32,
    /// `view_proj` followed by the atlas tile remap; maps world space to
    /// atlas UV and depth for sampling.
    pub atlas_view_proj: Mat4,
    pub tile_bounds: TileBounds,
    pub viewport: TileViewport,
    /// World-space corners of this cascade's slice of the camera frustum.
    pub frustum_corners: [Vec3; 8],
}

/// Computes cascade transforms for a fixed [`ShadowConfig`]. Holds no
/// per-frame state; every call recomputes from its inputs.
#[derive(Clone, Debug, Default)]
pub struct CascadedShadows {
    config: ShadowConfig,
}

impl CascadedShadows {
    pub fn new(config: ShadowConfig) -> Self {
        log::info!(
            "Cascaded shadows: {} cascades in a {}x{} atlas of {}px tiles",
            config.cascade_count,
            config.atlas.columns(),
            config.atlas.rows(),
            config.atlas.tile_size()
        );
        Self { config }
    }

    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    /// Fits one orthographic shadow projection per cascade.
    ///
    /// `light_direction` is the direction light travels (from the light into
    /// the scene). `world_bounds` must enclose every caster and receiver.
    pub fn compute(
        &self,
        light_direction: Vec3,
        world_bounds: &Aabb,
        camera_view: &Mat4,
        camera_projection: &Mat4,
    ) -> ShadowResult<Vec<CascadeTransform>> {
        self.compute_inner(light_direction, world_bounds, camera_view, camera_projection)
            .inspect_err(|err| log::error!("Rejected shadow transform inputs: {}", err))
    }

    fn compute_inner(
        &self,
        light_direction: Vec3,
        world_bounds: &Aabb,
        camera_view: &Mat4,
        camera_projection: &Mat4,
    ) -> ShadowResult<Vec<CascadeTransform>> {
        let config = &self.config;

        if world_bounds.is_empty() || !world_bounds.is_finite() {
            return Err(ShadowError::InvalidSceneBounds);
        }

        let light_view = self.light_view(light_direction)?;

        let camera_view_proj = *camera_projection * *camera_view;
        let determinant = camera_view_proj.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(ShadowError::SingularViewProjection(determinant));
        }
        let view_proj_inverse = camera_view_proj.inverse();

        let view_distance = match config.view_distance {
            ViewDistance::SceneExtent => world_bounds.maximum_extent(),
            ViewDistance::Fixed(distance) => distance,
        };

        let split_depths =
            practical_split_scheme(config.cascade_count, config.split_near, view_distance)?;
        let split_clip_depths = split_depths
            .iter()
            .map(|&depth| {
                let signed = match config.handedness {
                    Handedness::RightHanded => -depth,
                    Handedness::LeftHanded => depth,
                };
                checked_view_depth_to_clip_depth(signed, camera_projection)
                    .ok_or(ShadowError::DegenerateDepthProjection(signed))
            })
            .collect::<ShadowResult<Vec<f32>>>()?;

        // The orthographic depth range always spans the whole scene along
        // the light axis so casters outside a cascade's slice still occlude.
        let light_bounds = world_bounds.transform(&light_view);
        let (near_z, far_z) = match config.handedness {
            Handedness::RightHanded => (-light_bounds.max.z, -light_bounds.min.z),
            Handedness::LeftHanded => (light_bounds.min.z, light_bounds.max.z),
        };
        if !(far_z > near_z) {
            return Err(ShadowError::InvalidSceneBounds);
        }

        let atlas = &config.atlas;
        let outside_atlas = || ShadowError::AtlasTooSmall {
            columns: atlas.columns(),
            rows: atlas.rows(),
            cascades: config.cascade_count,
        };

        let mut cascades = Vec::with_capacity(config.cascade_count);
        for index in 0..config.cascade_count {
            let corners = frustum_corners(
                split_clip_depths[index],
                split_clip_depths[index + 1],
                &view_proj_inverse,
            )?;
            let slice = Aabb::from_points(corners.iter().map(|c| light_view.transform_point3(*c)));

            let projection = match config.handedness {
                Handedness::RightHanded => Mat4::orthographic_rh(
                    slice.min.x,
                    slice.max.x,
                    slice.min.y,
                    slice.max.y,
                    near_z,
                    far_z,
                ),
                Handedness::LeftHanded => Mat4::orthographic_lh(
                    slice.min.x,
                    slice.max.x,
                    slice.min.y,
                    slice.max.y,
                    near_z,
                    far_z,
                ),
            };

            let view_proj = projection * light_view;
            let tile_remap = atlas.tile_remap(index).ok_or_else(outside_atlas)?;
            let cascade = CascadeTransform {
                index,
                view_proj,
                far_view_depth: split_depths[index + 1],
                far_clip_depth: split_clip_depths[index + 1],
                atlas_view_proj: tile_remap * view_proj,
                tile_bounds: atlas.tile_bounds(index).ok_or_else(outside_atlas)?,
                viewport: atlas.viewport(index).ok_or_else(outside_atlas)?,
                frustum_corners: corners,
            };

            log::debug!(
                "Cascade {}: far depth {:.3} (clip {:.5}), light-space xy {:?}..{:?}",
                index,
                cascade.far_view_depth,
                cascade.far_clip_depth,
                slice.min.truncate(),
                slice.max.truncate()
            );

            cascades.push(cascade);
        }

        Ok(cascades)
    }

    /// Light view matrix looking from the origin along `light_direction`.
    pub fn light_view(&self, light_direction: Vec3) -> ShadowResult<Mat4> {
        let up = self.config.up;
        let degenerate = || ShadowError::DegenerateLightDirection {
            direction: light_direction,
            up,
        };

        if !light_direction.is_finite() || light_direction.length_squared() <= PARALLEL_EPSILON {
            return Err(degenerate());
        }
        if light_direction.normalize().cross(up).length_squared() <= PARALLEL_EPSILON {
            return Err(degenerate());
        }

        Ok(match self.config.handedness {
            Handedness::RightHanded => Mat4::look_at_rh(Vec3::ZERO, light_direction, up),
            Handedness::LeftHanded => Mat4::look_at_lh(Vec3::ZERO, light_direction, up),
        })
    }
}

/// Index of the first cascade whose range reaches `view_depth` (a positive
/// distance from the camera), or `None` past the last cascade.
pub fn select_cascade(cascades: &[CascadeTransform], view_depth: f32) -> Option<usize> {
    cascades
        .iter()
        .position(|cascade| view_depth <= cascade.far_view_depth)
}
