use glam::{Mat4, UVec2, Vec2, Vec4};

use crate::error::{ShadowError, ShadowResult};

/// Texels kept free around every tile so filter taps never reach a
/// neighbouring cascade.
pub const DEFAULT_TILE_BORDER_TEXELS: f32 = 3.0;

/// Fixed grid of square tiles sharing one shadow texture. Cascade `i`
/// occupies column `i % columns`, row `i / columns`, rows counted from the
/// top of the texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowAtlas {
    columns: u32,
    rows: u32,
    tile_size: u32,
    border_texels: f32,
}

/// UV rectangle a cascade's filter taps are clamped to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl TileBounds {
    /// Packed as `[u_min, u_max, v_min, v_max]` for the shading stage.
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.min.x, self.max.x, self.min.y, self.max.y)
    }

    pub fn contains(&self, uv: Vec2) -> bool {
        uv.cmpge(self.min).all() && uv.cmple(self.max).all()
    }

    pub fn overlaps(&self, other: &TileBounds) -> bool {
        self.min.cmplt(other.max).all() && other.min.cmplt(self.max).all()
    }
}

/// Pixel rectangle to set as the viewport when rendering a cascade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileViewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ShadowAtlas {
    pub fn new(columns: u32, rows: u32, tile_size: u32, border_texels: f32) -> ShadowResult<Self> {
        if columns == 0 || rows == 0 {
            return Err(ShadowError::AtlasTooSmall {
                columns,
                rows,
                cascades: 1,
            });
        }
        if tile_size == 0 {
            return Err(ShadowError::ZeroTileSize);
        }
        if !(border_texels > 0.0) || border_texels * 2.0 >= tile_size as f32 {
            return Err(ShadowError::InvalidTileBorder {
                border: border_texels,
                tile_size,
            });
        }
        let fits = columns.checked_mul(rows).is_some()
            && columns.checked_mul(tile_size).is_some()
            && rows.checked_mul(tile_size).is_some();
        if !fits {
            return Err(ShadowError::AtlasTooLarge {
                columns,
                rows,
                tile_size,
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_size,
            border_texels,
        })
    }

    /// Tiles side by side in a single row.
    pub fn strip(tiles: u32, tile_size: u32) -> ShadowResult<Self> {
        Self::new(tiles, 1, tile_size, DEFAULT_TILE_BORDER_TEXELS)
    }

    /// `columns x rows` grid.
    pub fn grid(columns: u32, rows: u32, tile_size: u32) -> ShadowResult<Self> {
        Self::new(columns, rows, tile_size, DEFAULT_TILE_BORDER_TEXELS)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn border_texels(&self) -> f32 {
        self.border_texels
    }

    pub fn capacity(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// Full texture size in texels.
    pub fn extent(&self) -> UVec2 {
        UVec2::new(self.columns, self.rows) * self.tile_size
    }

    /// Size of one texel in atlas UV units.
    pub fn texel_size(&self) -> Vec2 {
        Vec2::ONE / self.extent().as_vec2()
    }

    /// Grid cell of tile `index`, or `None` past the last tile.
    pub fn tile_coords(&self, index: usize) -> Option<UVec2> {
        if index >= self.capacity() {
            return None;
        }
        let index = index as u32;
        Some(UVec2::new(index % self.columns, index / self.columns))
    }

    /// Tile rectangle in UV, inset by the border on every side.
    pub fn tile_bounds(&self, index: usize) -> Option<TileBounds> {
        let grid = UVec2::new(self.columns, self.rows).as_vec2();
        let tile = self.tile_coords(index)?.as_vec2();
        let border = self.texel_size() * self.border_texels;

        Some(TileBounds {
            min: tile / grid + border,
            max: (tile + Vec2::ONE) / grid - border,
        })
    }

    /// Maps shadow clip space `[-1, 1]^2` onto the tile's UV rectangle,
    /// flipping Y so clip +Y lands at the tile's top edge. Depth and W pass
    /// through unchanged.
    pub fn tile_remap(&self, index: usize) -> Option<Mat4> {
        let grid = UVec2::new(self.columns, self.rows).as_vec2();
        let tile = self.tile_coords(index)?.as_vec2();
        let center = (tile + Vec2::splat(0.5)) / grid;

        Some(Mat4::from_cols(
            Vec4::new(0.5 / grid.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, -0.5 / grid.y, 0.0, 0.0),
            Vec4::Z,
            Vec4::new(center.x, center.y, 0.0, 1.0),
        ))
    }

    pub fn viewport(&self, index: usize) -> Option<TileViewport> {
        let origin = self.tile_coords(index)? * self.tile_size;
        Some(TileViewport {
            x: origin.x as f32,
            y: origin.y as f32,
            width: self.tile_size as f32,
            height: self.tile_size as f32,
        })
    }
}

impl Default for ShadowAtlas {
    fn default() -> Self {
        Self {
            columns: 2,
            rows: 2,
            tile_size: 256,
            border_texels: DEFAULT_TILE_BORDER_TEXELS,
        }
    }
}
