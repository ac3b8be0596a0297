pub mod error;
pub mod settings;
pub mod shadows;

pub use error::{ShadowError, ShadowResult};
pub use settings::ShadowSettings;
pub use shadows::{Aabb, CascadeTransform, CascadedShadows, ShadowAtlas, ShadowConfig};

use glam::{Mat4, Vec3};

use shadows::poisson::ROTATION_VOLUME_SIZE;
use shadows::{poisson_kernel, CascadeShadowUniform, RotationVolume, ShadowViewUniform};

fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// Ship-over-grid demo scene: a camera above a 100 unit ground grid and a
/// light shining down at an angle.
fn demo_inputs() -> (Vec3, Aabb, Mat4, Mat4) {
    let camera_position = Vec3::new(0.0, 70.0, 100.0);
    let camera_forward = Vec3::new(0.0, -0.447_213_6, -0.894_427_2);
    let view = Mat4::look_at_rh(camera_position, camera_position + camera_forward, Vec3::Y);
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 800.0 / 480.0, 1.0, 1000.0);

    // Direction from the scene toward the light, negated into travel direction.
    let toward_light = Vec3::new(-1.0, 2.0, 2.0).normalize();

    let world_bounds = [
        Aabb::from_sphere(Vec3::ZERO, 100.0),
        Aabb::from_sphere(Vec3::new(0.0, 15.0, 0.0), 12.0),
    ]
    .iter()
    .fold(Aabb::EMPTY, |acc, b| acc.merge(b));

    (-toward_light, world_bounds, view, projection)
}

pub fn run() -> ShadowResult<()> {
    init_logging();

    log::info!("Computing cascaded shadow transforms for the demo scene");

    let settings = ShadowSettings::load();
    let cascaded = CascadedShadows::new(settings.to_config()?);
    let atlas = *cascaded.config().atlas();

    let (light_direction, world_bounds, view, projection) = demo_inputs();
    let cascades = cascaded.compute(light_direction, &world_bounds, &view, &projection)?;

    for cascade in &cascades {
        let bounds = cascade.tile_bounds;
        log::info!(
            "Cascade {}: up to depth {:.2} (clip {:.5}), tile uv [{:.4}, {:.4}]..[{:.4}, {:.4}], viewport {:?}",
            cascade.index,
            cascade.far_view_depth,
            cascade.far_clip_depth,
            bounds.min.x,
            bounds.min.y,
            bounds.max.x,
            bounds.max.y,
            cascade.viewport
        );
    }

    let caster_views: Vec<ShadowViewUniform> =
        cascades.iter().map(ShadowViewUniform::from_cascade).collect();
    let uniform = CascadeShadowUniform::from_cascades(&cascades);
    let kernel = poisson_kernel(atlas.texel_size());
    let rotations = RotationVolume::new(ROTATION_VOLUME_SIZE);

    log::info!(
        "Caster uniforms {} bytes, shading uniform {} bytes, {} kernel taps, rotation volume {} bytes",
        bytemuck::cast_slice::<ShadowViewUniform, u8>(&caster_views).len(),
        std::mem::size_of_val(&uniform),
        kernel.len(),
        rotations.as_bytes().len()
    );

    Ok(())
}
