use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ShadowResult;
use crate::shadows::atlas::DEFAULT_TILE_BORDER_TEXELS;
use crate::shadows::{Handedness, ShadowAtlas, ShadowConfig, ViewDistance, MAX_CASCADES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowSettings {
    #[serde(default = "ShadowSettings::default_cascade_count")]
    pub cascade_count: usize,
    #[serde(default = "ShadowSettings::default_tile_size")]
    pub tile_size: u32,
    #[serde(default = "ShadowSettings::default_tile_border_texels")]
    pub tile_border_texels: f32,
    #[serde(default)]
    pub atlas_layout: AtlasLayoutSetting,
    #[serde(default = "ShadowSettings::default_split_near")]
    pub split_near: f32,
    /// Reach of the last cascade; the scene's largest extent when absent.
    #[serde(default)]
    pub view_distance: Option<f32>,
    #[serde(default)]
    pub handedness: HandednessSetting,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            cascade_count: Self::default_cascade_count(),
            tile_size: Self::default_tile_size(),
            tile_border_texels: Self::default_tile_border_texels(),
            atlas_layout: AtlasLayoutSetting::default(),
            split_near: Self::default_split_near(),
            view_distance: None,
            handedness: HandednessSetting::default(),
        }
    }
}

impl ShadowSettings {
    pub fn load() -> Self {
        Self::load_from_path("shadow_settings.json")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<ShadowSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded shadow settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default shadow settings.",
                        path, err
                    );
                    ShadowSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Shadow settings file {:?} not found. Using default settings.",
                    path
                );
                ShadowSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default shadow settings.",
                    path, err
                );
                ShadowSettings::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        if self.cascade_count == 0 || self.cascade_count > MAX_CASCADES {
            warn!(
                "Cascade count must be between 1 and {}. Using default value.",
                MAX_CASCADES
            );
            self.cascade_count = Self::default_cascade_count();
        }

        if self.tile_size == 0 {
            warn!("Shadow tile size must be greater than zero. Using default value.");
            self.tile_size = Self::default_tile_size();
        }

        if !(self.tile_border_texels > 0.0)
            || self.tile_border_texels * 2.0 >= self.tile_size as f32
        {
            warn!("Tile border does not fit inside a tile. Using default value.");
            self.tile_border_texels = Self::default_tile_border_texels();
        }

        if let AtlasLayoutSetting::Grid { columns, rows } = self.atlas_layout {
            if (columns as usize) * (rows as usize) < self.cascade_count {
                warn!(
                    "A {}x{} atlas cannot hold {} cascades. Using a strip layout.",
                    columns, rows, self.cascade_count
                );
                self.atlas_layout = AtlasLayoutSetting::Strip;
            }
        }

        if self.atlas().is_err() {
            warn!(
                "Shadow atlas of {}px tiles does not fit in a texture. Using default tile size.",
                self.tile_size
            );
            self.tile_size = Self::default_tile_size();
            self.tile_border_texels = Self::default_tile_border_texels();
            if self.atlas().is_err() {
                self.atlas_layout = AtlasLayoutSetting::Strip;
            }
        }

        if !(self.split_near > 0.0) || !self.split_near.is_finite() {
            warn!("Split near depth must be positive. Using default value.");
            self.split_near = Self::default_split_near();
        }

        if let Some(distance) = self.view_distance {
            if !(distance > self.split_near) || !distance.is_finite() {
                warn!(
                    "View distance {} does not exceed the split near depth. Using the scene extent.",
                    distance
                );
                self.view_distance = None;
            }
        }

        self
    }

    pub fn atlas(&self) -> ShadowResult<ShadowAtlas> {
        let (columns, rows) = match self.atlas_layout {
            AtlasLayoutSetting::Strip => (self.cascade_count as u32, 1),
            AtlasLayoutSetting::Grid { columns, rows } => (columns, rows),
        };
        ShadowAtlas::new(columns, rows, self.tile_size, self.tile_border_texels)
    }

    pub fn to_config(&self) -> ShadowResult<ShadowConfig> {
        let view_distance = self
            .view_distance
            .map(ViewDistance::Fixed)
            .unwrap_or(ViewDistance::SceneExtent);

        Ok(ShadowConfig::new(self.cascade_count, self.atlas()?)?
            .with_split_near(self.split_near)?
            .with_view_distance(view_distance)?
            .with_handedness(self.handedness.into()))
    }

    const fn default_cascade_count() -> usize {
        4
    }

    const fn default_tile_size() -> u32 {
        256
    }

    const fn default_tile_border_texels() -> f32 {
        DEFAULT_TILE_BORDER_TEXELS
    }

    const fn default_split_near() -> f32 {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtlasLayoutSetting {
    Strip,
    Grid { columns: u32, rows: u32 },
}

impl Default for AtlasLayoutSetting {
    fn default() -> Self {
        AtlasLayoutSetting::Grid {
            columns: 2,
            rows: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandednessSetting {
    #[default]
    RightHanded,
    LeftHanded,
}

impl From<HandednessSetting> for Handedness {
    fn from(setting: HandednessSetting) -> Self {
        match setting {
            HandednessSetting::RightHanded => Handedness::RightHanded,
            HandednessSetting::LeftHanded => Handedness::LeftHanded,
        }
    }
}
