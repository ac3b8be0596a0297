//! Frame-level properties of the cascade set consumed by the render loop.
use cascade_shadows::shadows::{
    select_cascade, Aabb, CascadeShadowUniform, CascadedShadows, ShadowAtlas, ShadowConfig,
    ShadowViewUniform,
};
use cascade_shadows::{CascadeTransform, ShadowError, ShadowResult};
use glam::{Mat4, Vec3, Vec4};

struct Frame {
    light_direction: Vec3,
    world_bounds: Aabb,
    view: Mat4,
    projection: Mat4,
}

fn frame() -> Frame {
    let eye = Vec3::new(8.0, 10.0, 8.0);
    Frame {
        light_direction: Vec3::new(0.4, -1.0, 0.2).normalize(),
        world_bounds: Aabb::new(Vec3::new(-40.0, -2.0, -40.0), Vec3::new(40.0, 12.0, 40.0)),
        view: Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y),
        projection: Mat4::perspective_rh(45_f32.to_radians(), 16.0 / 9.0, 0.1, 100.0),
    }
}

fn compute(shadows: &CascadedShadows, frame: &Frame) -> ShadowResult<Vec<CascadeTransform>> {
    shadows.compute(
        frame.light_direction,
        &frame.world_bounds,
        &frame.view,
        &frame.projection,
    )
}

#[test]
fn identical_inputs_give_bit_identical_outputs() {
    let shadows = CascadedShadows::default();
    let a = compute(&shadows, &frame()).unwrap();
    let b = compute(&shadows, &frame()).unwrap();

    for (x, y) in a.iter().zip(&b) {
        assert_eq!(
            x.view_proj.to_cols_array().map(f32::to_bits),
            y.view_proj.to_cols_array().map(f32::to_bits)
        );
        assert_eq!(
            x.atlas_view_proj.to_cols_array().map(f32::to_bits),
            y.atlas_view_proj.to_cols_array().map(f32::to_bits)
        );
        assert_eq!(x.far_view_depth.to_bits(), y.far_view_depth.to_bits());
        assert_eq!(x.far_clip_depth.to_bits(), y.far_clip_depth.to_bits());
        assert_eq!(x.tile_bounds, y.tile_bounds);
    }
}

#[test]
fn far_distances_are_monotonic_for_every_layout() {
    let layouts = [
        ShadowConfig::default(),
        ShadowConfig::new(4, ShadowAtlas::strip(4, 512).unwrap()).unwrap(),
        ShadowConfig::new(6, ShadowAtlas::grid(3, 2, 256).unwrap()).unwrap(),
        ShadowConfig::new(1, ShadowAtlas::strip(1, 1024).unwrap()).unwrap(),
    ];

    for config in layouts {
        let cascades = compute(&CascadedShadows::new(config), &frame()).unwrap();
        assert_eq!(cascades.len(), config.cascade_count());
        assert!(cascades
            .windows(2)
            .all(|w| w[0].far_view_depth < w[1].far_view_depth));
        assert_eq!(
            cascades.last().unwrap().far_view_depth,
            frame().world_bounds.maximum_extent()
        );
    }
}

#[test]
fn tile_rectangles_are_inside_the_atlas_and_disjoint() {
    let config = ShadowConfig::new(6, ShadowAtlas::grid(3, 2, 256).unwrap()).unwrap();
    let cascades = compute(&CascadedShadows::new(config), &frame()).unwrap();

    for (i, a) in cascades.iter().enumerate() {
        let v = a.tile_bounds.to_vec4();
        assert!(v.cmpgt(Vec4::ZERO).all() && v.cmplt(Vec4::ONE).all(), "{v:?}");
        for b in &cascades[i + 1..] {
            assert!(!a.tile_bounds.overlaps(&b.tile_bounds));
        }
    }
}

#[test]
fn receivers_sample_the_tile_of_their_cascade() {
    let frame = frame();
    let cascades = compute(&CascadedShadows::default(), &frame).unwrap();
    let inverse_view = frame.view.inverse();

    // Points straight ahead of the camera at increasing depth.
    for depth in [3.0_f32, 9.0, 20.0, 45.0, 70.0] {
        let world = inverse_view.transform_point3(Vec3::new(0.0, 0.0, -depth));
        let index = select_cascade(&cascades, depth).expect("depth inside shadow range");
        let cascade = &cascades[index];

        let shadow = cascade.atlas_view_proj * world.extend(1.0);
        let uv = shadow.truncate().truncate() / shadow.w;
        assert!(
            cascade.tile_bounds.contains(uv),
            "depth {depth} cascade {index} uv {uv:?} outside {:?}",
            cascade.tile_bounds
        );
    }
}

#[test]
fn render_viewport_and_sampling_matrix_address_the_same_texels() {
    let config = ShadowConfig::new(4, ShadowAtlas::strip(4, 256).unwrap()).unwrap();
    let cascades = compute(&CascadedShadows::new(config), &frame()).unwrap();
    let extent = config.atlas().extent().as_vec2();

    for cascade in &cascades {
        // Shadow clip origin maps to the viewport center, to within a texel.
        let center = cascade.atlas_view_proj * cascade.view_proj.inverse() * Vec4::W;
        let texel = center.truncate().truncate() / center.w * extent;
        let viewport = cascade.viewport;
        assert!((texel.x - (viewport.x + viewport.width * 0.5)).abs() < 0.5);
        assert!((texel.y - (viewport.y + viewport.height * 0.5)).abs() < 0.5);
    }
}

#[test]
fn uniform_mirrors_cascade_order() {
    let cascades = compute(&CascadedShadows::default(), &frame()).unwrap();
    let uniform = CascadeShadowUniform::from_cascades(&cascades);

    assert_eq!(uniform.counts[0], 4);
    for (slot, cascade) in cascades.iter().enumerate() {
        assert_eq!(uniform.far_view_depth(slot), cascade.far_view_depth);
        assert_eq!(uniform.atlas_view_proj(slot), cascade.atlas_view_proj);
        assert_eq!(uniform.tile_bounds[slot], cascade.tile_bounds.to_vec4().to_array());
    }
    assert_eq!(uniform.far_view_depth(4), 0.0);
}

#[test]
fn caster_uniform_carries_the_unremapped_light_matrix() {
    let cascades = compute(&CascadedShadows::default(), &frame()).unwrap();
    for cascade in &cascades {
        let uniform = ShadowViewUniform::from_cascade(cascade);
        let view_proj = Mat4::from_cols_array_2d(&uniform.view_proj);
        assert_eq!(view_proj, cascade.view_proj);
        assert_ne!(view_proj, cascade.atlas_view_proj);
    }
}

#[test]
fn degenerate_inputs_fail_loudly() {
    let shadows = CascadedShadows::default();
    let good = frame();

    let singular = Frame {
        projection: Mat4::ZERO,
        ..frame()
    };
    assert!(matches!(
        compute(&shadows, &singular),
        Err(ShadowError::SingularViewProjection(_))
    ));

    let straight_down = Frame {
        light_direction: Vec3::NEG_Y,
        ..frame()
    };
    assert!(matches!(
        compute(&shadows, &straight_down),
        Err(ShadowError::DegenerateLightDirection { .. })
    ));

    let empty_scene = Frame {
        world_bounds: Aabb::new(Vec3::ZERO, Vec3::ZERO),
        ..frame()
    };
    assert!(matches!(
        compute(&shadows, &empty_scene),
        Err(ShadowError::DegenerateSplitRange { .. })
    ));

    assert!(compute(&shadows, &good).is_ok());
}
