//! MTL material data
//!
//! Mirrors the Wavefront MTL model: four reflectivity/transmission channels,
//! scalar lighting properties and per-channel texture map file names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Reflectivity/transmission channel of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Ambient reflectivity (`Ka`)
    Ambient,
    /// Diffuse reflectivity (`Kd`)
    Diffuse,
    /// Specular reflectivity (`Ks`)
    Specular,
    /// Transmission filter (`Tf`)
    TransmissionFilter,
}

impl ChannelKind {
    /// Channel for an MTL keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Ka" => Some(Self::Ambient),
            "Kd" => Some(Self::Diffuse),
            "Ks" => Some(Self::Specular),
            "Tf" => Some(Self::TransmissionFilter),
            _ => None,
        }
    }
}

/// Representation of a channel's triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Red, green, blue
    Rgb,
    /// CIE XYZ
    Xyz,
}

/// Channel values with the active representation
///
/// A channel that was never set has no color space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Channel {
    /// Raw triple, interpreted according to `space`
    pub values: Vec3,
    /// Active representation, `None` until set
    pub space: Option<ColorSpace>,
}

impl Channel {
    /// Set RGB values, clearing any XYZ representation
    pub fn set_rgb(&mut self, r: f64, g: f64, b: f64) {
        self.values = Vec3::new(r, g, b);
        self.space = Some(ColorSpace::Rgb);
    }

    /// Set XYZ values, clearing any RGB representation
    pub fn set_xyz(&mut self, x: f64, y: f64, z: f64) {
        self.values = Vec3::new(x, y, z);
        self.space = Some(ColorSpace::Xyz);
    }

    /// Whether the RGB representation is active
    pub fn is_rgb(&self) -> bool {
        self.space == Some(ColorSpace::Rgb)
    }

    /// Whether the XYZ representation is active
    pub fn is_xyz(&self) -> bool {
        self.space == Some(ColorSpace::Xyz)
    }

    /// Values if the channel holds RGB
    pub fn rgb(&self) -> Option<Vec3> {
        self.is_rgb().then_some(self.values)
    }

    /// Values if the channel holds XYZ
    pub fn xyz(&self) -> Option<Vec3> {
        self.is_xyz().then_some(self.values)
    }
}

/// Texture map slot of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextureMapKind {
    /// `map_Ka`
    Ambient,
    /// `map_Kd`
    Diffuse,
    /// `map_Ks`
    Specular,
    /// `map_Ns`
    Exponent,
    /// `map_d`
    Dissolve,
    /// `decal`
    Decal,
    /// `disp`
    Displacement,
    /// `bump` / `map_Bump`
    Bump,
}

impl TextureMapKind {
    /// Every map slot, in MTL order
    pub const ALL: [Self; 8] = [
        Self::Ambient,
        Self::Diffuse,
        Self::Specular,
        Self::Exponent,
        Self::Dissolve,
        Self::Decal,
        Self::Displacement,
        Self::Bump,
    ];

    /// Map slot for an MTL keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "map_Ka" => Some(Self::Ambient),
            "map_Kd" => Some(Self::Diffuse),
            "map_Ks" => Some(Self::Specular),
            "map_Ns" => Some(Self::Exponent),
            "map_d" => Some(Self::Dissolve),
            "decal" => Some(Self::Decal),
            "disp" => Some(Self::Displacement),
            "bump" | "map_Bump" | "map_bump" => Some(Self::Bump),
            _ => None,
        }
    }
}

/// Reflection map projection (`refl -type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReflectionType {
    /// Unrecognized projection
    #[default]
    Unknown,
    /// `sphere`
    Sphere,
    /// `cube_top`
    CubeTop,
    /// `cube_bottom`
    CubeBottom,
    /// `cube_front`
    CubeFront,
    /// `cube_back`
    CubeBack,
    /// `cube_left`
    CubeLeft,
    /// `cube_right`
    CubeRight,
}

impl ReflectionType {
    /// Projection for a `-type` argument; unrecognized values map to `Unknown`
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "sphere" => Self::Sphere,
            "cube_top" => Self::CubeTop,
            "cube_bottom" => Self::CubeBottom,
            "cube_front" => Self::CubeFront,
            "cube_back" => Self::CubeBack,
            "cube_left" => Self::CubeLeft,
            "cube_right" => Self::CubeRight,
            _ => Self::Unknown,
        }
    }
}

/// Reflection map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    /// Projection type
    pub kind: ReflectionType,
    /// Map file name
    pub filename: String,
}

/// Material parsed from an MTL library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name (`newmtl`)
    pub name: String,
    /// Ambient reflectivity (`Ka`)
    pub ambient: Channel,
    /// Diffuse reflectivity (`Kd`)
    pub diffuse: Channel,
    /// Specular reflectivity (`Ks`)
    pub specular: Channel,
    /// Transmission filter (`Tf`)
    pub transmission_filter: Channel,
    /// Illumination model (`illum`)
    pub illumination_model: u32,
    /// Dissolve factor (`d`)
    pub dissolve: f64,
    /// Dissolve depends on surface orientation (`d -halo`)
    pub halo: bool,
    /// Specular exponent (`Ns`)
    pub specular_exponent: f64,
    /// Reflection map sharpness (`sharpness`)
    pub sharpness: f64,
    /// Optical density (`Ni`)
    pub optical_density: f64,
    /// Texture map file names by slot
    pub texture_maps: HashMap<TextureMapKind, String>,
    /// Reflection map (`refl`)
    pub reflection: Option<Reflection>,
}

impl Material {
    /// Create a material with every property unset
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: Channel::default(),
            diffuse: Channel::default(),
            specular: Channel::default(),
            transmission_filter: Channel::default(),
            illumination_model: 0,
            dissolve: 0.0,
            halo: false,
            specular_exponent: 0.0,
            sharpness: 0.0,
            optical_density: 0.0,
            texture_maps: HashMap::new(),
            reflection: None,
        }
    }

    /// Get a channel
    pub const fn channel(&self, kind: ChannelKind) -> &Channel {
        match kind {
            ChannelKind::Ambient => &self.ambient,
            ChannelKind::Diffuse => &self.diffuse,
            ChannelKind::Specular => &self.specular,
            ChannelKind::TransmissionFilter => &self.transmission_filter,
        }
    }

    /// Get a channel mutably
    pub fn channel_mut(&mut self, kind: ChannelKind) -> &mut Channel {
        match kind {
            ChannelKind::Ambient => &mut self.ambient,
            ChannelKind::Diffuse => &mut self.diffuse,
            ChannelKind::Specular => &mut self.specular,
            ChannelKind::TransmissionFilter => &mut self.transmission_filter,
        }
    }

    /// File name of a texture map slot
    pub fn texture_map(&self, kind: TextureMapKind) -> Option<&str> {
        self.texture_maps.get(&kind).map(String::as_str)
    }

    /// Every texture file the material references, reflection map included
    pub fn texture_files(&self) -> impl Iterator<Item = &str> {
        TextureMapKind::ALL
            .iter()
            .filter_map(|kind| self.texture_map(*kind))
            .chain(self.reflection.iter().map(|r| r.filename.as_str()))
    }
}
