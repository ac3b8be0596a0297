use glam::{Mat4, Vec3, Vec4};

/// Corner-index pairs forming the 12 edges of a box or frustum whose corners
/// follow the [`Aabb::corners`] order. Suitable for a line-list index buffer.
pub const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Axis-aligned bounding box. The reference frame (world or light space) is
/// implied by the caller and never mixed within one box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Neutral element for [`Aabb::merge`]. Never a valid final result.
    pub const EMPTY: Self = Self {
        min: Vec3::MAX,
        max: Vec3::MIN,
    };

    /// Builds a box from two corners, ordering them componentwise.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        let extent = Vec3::splat(radius.abs());
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        points.into_iter().fold(Self::EMPTY, |acc, point| Self {
            min: acc.min.min(point),
            max: acc.max.max(point),
        })
    }

    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest side length, used as a cheap proxy for how far shadows need
    /// to reach.
    pub fn maximum_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// The eight corners, far face (max Z) first:
    ///
    /// | index | x   | y   | z   |
    /// |-------|-----|-----|-----|
    /// | 0     | min | max | max |
    /// | 1     | max | max | max |
    /// | 2     | max | min | max |
    /// | 3     | min | min | max |
    /// | 4     | min | max | min |
    /// | 5     | max | max | min |
    /// | 6     | max | min | min |
    /// | 7     | min | min | min |
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, min.y, min.z),
        ]
    }

    /// Tight axis-aligned bound of this box after an affine transform.
    ///
    /// Each basis column is scaled by the box extremes along that axis, the
    /// per-axis minimum and maximum are summed, then the translation is
    /// added. Exact for affine matrices; `matrix` must not carry a
    /// projective row.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        debug_assert!(
            is_affine(matrix),
            "bounding box transform requires an affine matrix, got {matrix:?}"
        );

        let xa = matrix.x_axis.truncate() * self.min.x;
        let xb = matrix.x_axis.truncate() * self.max.x;
        let ya = matrix.y_axis.truncate() * self.min.y;
        let yb = matrix.y_axis.truncate() * self.max.y;
        let za = matrix.z_axis.truncate() * self.min.z;
        let zb = matrix.z_axis.truncate() * self.max.z;
        let translation = matrix.w_axis.truncate();

        Self {
            min: xa.min(xb) + ya.min(yb) + za.min(zb) + translation,
            max: xa.max(xb) + ya.max(yb) + za.max(zb) + translation,
        }
    }
}

fn is_affine(matrix: &Mat4) -> bool {
    matrix.row(3) == Vec4::W
}

/// Line-list segments for the edges of eight corners laid out in
/// [`Aabb::corners`] order, e.g. a cascade's frustum slice.
pub fn edge_segments(corners: &[Vec3; 8]) -> [(Vec3, Vec3); 12] {
    BOX_EDGES.map(|(a, b)| (corners[a], corners[b]))
}
