use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::cascades::CascadeTransform;

/// Upper bound on cascades a renderer can be configured with; sizes the
/// fixed arrays of [`CascadeShadowUniform`].
pub const MAX_CASCADES: usize = 8;

/// Per-cascade uniform for the caster pass.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ShadowViewUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ShadowViewUniform {
    pub fn from_cascade(cascade: &CascadeTransform) -> Self {
        Self {
            view_proj: cascade.view_proj.to_cols_array_2d(),
        }
    }
}

/// Everything the shading stage reads to pick, sample and clamp a cascade.
/// Far depths are packed four to a vec4 to keep a 16-byte array stride.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CascadeShadowUniform {
    pub counts: [u32; 4],
    pub atlas_view_proj: [[[f32; 4]; 4]; MAX_CASCADES],
    pub tile_bounds: [[f32; 4]; MAX_CASCADES],
    pub far_view_depths: [[f32; 4]; MAX_CASCADES / 4],
}

impl CascadeShadowUniform {
    pub fn from_cascades(cascades: &[CascadeTransform]) -> Self {
        let mut uniform = Self::zeroed();

        if cascades.len() > MAX_CASCADES {
            log::warn!(
                "{} cascades exceed the uniform capacity of {}; extra cascades dropped",
                cascades.len(),
                MAX_CASCADES
            );
        }

        let count = cascades.len().min(MAX_CASCADES);
        uniform.counts[0] = count as u32;

        for (slot, cascade) in cascades.iter().take(count).enumerate() {
            uniform.atlas_view_proj[slot] = cascade.atlas_view_proj.to_cols_array_2d();
            uniform.tile_bounds[slot] = cascade.tile_bounds.to_vec4().to_array();
            uniform.far_view_depths[slot / 4][slot % 4] = cascade.far_view_depth;
        }

        uniform
    }

    pub fn atlas_view_proj(&self, slot: usize) -> Mat4 {
        Mat4::from_cols_array_2d(&self.atlas_view_proj[slot])
    }

    pub fn far_view_depth(&self, slot: usize) -> f32 {
        self.far_view_depths[slot / 4][slot % 4]
    }
}
