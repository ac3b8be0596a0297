//! wgpu descriptors for the shadow atlas and the rotation volume. The render
//! loop owns the device and creates the resources from these.

use super::atlas::ShadowAtlas;

/// Single-channel float target holding light-space depth per texel.
pub const ATLAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;
pub const ATLAS_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub const ROTATION_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg16Unorm;

/// Clear value meaning "no occluder, farthest possible". The shading stage
/// treats any stored depth at or above the receiver's depth as lit.
pub const ATLAS_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: f32::MAX as f64,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

pub fn atlas_extent(atlas: &ShadowAtlas) -> wgpu::Extent3d {
    let size = atlas.extent();
    wgpu::Extent3d {
        width: size.x,
        height: size.y,
        depth_or_array_layers: 1,
    }
}

pub fn atlas_texture_descriptor(atlas: &ShadowAtlas) -> wgpu::TextureDescriptor<'static> {
    wgpu::TextureDescriptor {
        label: Some("ShadowAtlas"),
        size: atlas_extent(atlas),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ATLAS_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    }
}

pub fn atlas_depth_descriptor(atlas: &ShadowAtlas) -> wgpu::TextureDescriptor<'static> {
    wgpu::TextureDescriptor {
        label: Some("ShadowAtlasDepth"),
        size: atlas_extent(atlas),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ATLAS_DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    }
}

pub fn rotation_volume_descriptor(size: u32) -> wgpu::TextureDescriptor<'static> {
    wgpu::TextureDescriptor {
        label: Some("ShadowRotationVolume"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: size,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D3,
        format: ROTATION_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    }
}

/// Buffer layout for writing
/// [`RotationVolume::as_bytes`](super::poisson::RotationVolume::as_bytes)
/// into a texture made from [`rotation_volume_descriptor`].
pub fn rotation_volume_copy_layout(size: u32) -> wgpu::TexelCopyBufferLayout {
    wgpu::TexelCopyBufferLayout {
        offset: 0,
        bytes_per_row: Some(4 * size),
        rows_per_image: Some(size),
    }
}
