pub mod atlas;
pub mod bounds;
pub mod cascades;
pub mod frustum;
pub mod gpu;
pub mod poisson;
pub mod uniforms;

pub use atlas::{ShadowAtlas, TileBounds, TileViewport};
pub use bounds::Aabb;
pub use cascades::{
    select_cascade, CascadeTransform, CascadedShadows, Handedness, ShadowConfig, ViewDistance,
};
pub use frustum::{
    checked_view_depth_to_clip_depth, frustum_corners, practical_split_scheme,
    view_depth_to_clip_depth,
};
pub use poisson::{poisson_kernel, RotationVolume};
pub use uniforms::{CascadeShadowUniform, ShadowViewUniform, MAX_CASCADES};
