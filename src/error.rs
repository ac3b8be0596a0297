use glam::Vec3;

/// Precondition violations rejected by the shadow-transform core.
///
/// None of these are recoverable by retrying with the same inputs: they
/// mean the caller handed over a camera, light or configuration that would
/// otherwise produce a degenerate shadow projection.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShadowError {
    #[error("cascade count must be between 1 and {max}, got {count}")]
    InvalidCascadeCount { count: usize, max: usize },

    #[error("atlas grid {columns}x{rows} cannot hold {cascades} cascades")]
    AtlasTooSmall {
        columns: u32,
        rows: u32,
        cascades: usize,
    },

    #[error("atlas grid {columns}x{rows} of {tile_size} texel tiles exceeds the addressable texture size")]
    AtlasTooLarge {
        columns: u32,
        rows: u32,
        tile_size: u32,
    },

    #[error("atlas tile size must be greater than zero")]
    ZeroTileSize,

    #[error("tile border of {border} texels does not fit a {tile_size} texel tile")]
    InvalidTileBorder { border: f32, tile_size: u32 },

    #[error("split near depth must be positive and finite, got {0}")]
    InvalidNearDepth(f32),

    #[error("split range [{near}, {far}] is empty; the scene bounds are too small")]
    DegenerateSplitRange { near: f32, far: f32 },

    #[error("split count must be at least 1")]
    ZeroSplits,

    #[error("camera view-projection is not invertible (determinant {0})")]
    SingularViewProjection(f32),

    #[error("light direction {direction:?} is zero or parallel to the up vector {up:?}")]
    DegenerateLightDirection { direction: Vec3, up: Vec3 },

    #[error("up vector {0:?} is zero or not finite")]
    InvalidUpVector(Vec3),

    #[error("scene bounding box is empty or not finite")]
    InvalidSceneBounds,

    #[error("clip-space point at depth {clip_depth} has W = 0")]
    DegenerateClipPoint { clip_depth: f32 },

    #[error("view depth {0} projects to W = 0")]
    DegenerateDepthProjection(f32),
}

pub type ShadowResult<T> = Result<T, ShadowError>;
