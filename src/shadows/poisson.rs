//! Sampling pattern for shadow filtering: a fixed Poisson disk and a volume
//! of random per-texel rotations. Both are consumed by the shading stage.

use std::f64::consts::TAU;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Edge length of the default rotation volume.
pub const ROTATION_VOLUME_SIZE: u32 = 32;

const POISSON_DISK: [Vec2; 12] = [
    Vec2::new(-0.326_212, -0.405_81),
    Vec2::new(-0.840_144, -0.073_58),
    Vec2::new(-0.695_914, 0.457_137),
    Vec2::new(-0.203_345, 0.620_716),
    Vec2::new(0.962_34, -0.194_983),
    Vec2::new(0.473_434, -0.480_026),
    Vec2::new(0.519_456, 0.767_022),
    Vec2::new(0.185_461, -0.893_124),
    Vec2::new(0.507_431, 0.064_425),
    Vec2::new(0.896_42, 0.412_458),
    Vec2::new(-0.321_94, -0.932_615),
    Vec2::new(-0.791_559, -0.597_71),
];

/// Poisson disk offsets scaled to `texel_size`, nearest to the origin first.
pub fn poisson_kernel(texel_size: Vec2) -> Vec<Vec2> {
    let mut kernel = POISSON_DISK.to_vec();
    kernel.sort_by(|a, b| a.length().total_cmp(&b.length()));
    kernel.into_iter().map(|offset| offset * texel_size).collect()
}

/// Cube of random rotations, one `(cos, sin)` pair per texel encoded as
/// unsigned 16-bit normalized values (`-1 -> 0`, `1 -> 65535`). Matches the
/// `Rg16Unorm` texture layout, texels ordered x fastest, then y, then z.
#[derive(Clone, Debug)]
pub struct RotationVolume {
    size: u32,
    texels: Vec<[u16; 2]>,
}

impl RotationVolume {
    /// Entropy-seeded volume; differs on every call.
    pub fn new(size: u32) -> Self {
        Self::generate(size, &mut SmallRng::from_entropy())
    }

    pub fn with_seed(size: u32, seed: u64) -> Self {
        Self::generate(size, &mut SmallRng::seed_from_u64(seed))
    }

    pub fn generate<R: Rng + ?Sized>(size: u32, rng: &mut R) -> Self {
        let count = (size as usize).pow(3);
        let texels = (0..count)
            .map(|_| {
                let angle = rng.gen::<f64>() * TAU;
                [encode_unorm16(angle.cos()), encode_unorm16(angle.sin())]
            })
            .collect();

        log::debug!("Generated {}^3 shadow rotation volume", size);

        Self { size, texels }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn texels(&self) -> &[[u16; 2]] {
        &self.texels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Rotation stored at a texel, decoded back to `(cos, sin)`.
    pub fn rotation(&self, x: u32, y: u32, z: u32) -> Vec2 {
        let size = self.size as usize;
        let index = (z as usize * size + y as usize) * size + x as usize;
        let [c, s] = self.texels[index];
        Vec2::new(decode_unorm16(c), decode_unorm16(s))
    }
}

fn encode_unorm16(value: f64) -> u16 {
    ((value * 0.5 + 0.5) * f64::from(u16::MAX)).round() as u16
}

fn decode_unorm16(value: u16) -> f32 {
    (f64::from(value) / f64::from(u16::MAX) * 2.0 - 1.0) as f32
}
