//! Model building
//!
//! [`ModelSink`] is the contract between whatever produces directives (the
//! readers in [`crate::assets`], or a caller driving it by hand) and whatever
//! assembles them. [`ModelBuilder`] is the in-memory implementation.

mod material;
mod model_builder;
mod session;

pub use model_builder::ModelBuilder;

use std::fmt;

use crate::model::{ChannelKind, FaceId, ReflectionType, TextureMapKind};
use crate::Result;

/// Smoothing group id meaning "smoothing off"
pub const NO_SMOOTHING_GROUP: u32 = 0;

/// Lifecycle phase of a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderPhase {
    /// No model has been started
    Idle,
    /// A model is being assembled
    Parsing,
    /// The model was handed out; waiting for `close`
    Finished,
    /// Transient state released
    Closed,
}

impl fmt::Display for BuilderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Parsing => "parsing",
            Self::Finished => "finished",
            Self::Closed => "closed",
        })
    }
}

/// Unresolved face corner as written in a face statement
///
/// Indices are 1-based when positive and relative to the current end of the
/// sequence when negative (`-1` is the most recent element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawCorner {
    /// Position index
    pub position: i64,
    /// Texture coordinate index, `None` when the slot is empty
    pub texture: Option<i64>,
    /// Normal index, `None` when the slot is empty
    pub normal: Option<i64>,
}

impl RawCorner {
    /// Corner with all three slots
    pub const fn new(position: i64, texture: Option<i64>, normal: Option<i64>) -> Self {
        Self {
            position,
            texture,
            normal,
        }
    }

    /// Corner with a position only
    pub const fn position(position: i64) -> Self {
        Self::new(position, None, None)
    }

    /// Position-only corners for a whole face
    pub fn positions(indices: &[i64]) -> Vec<Self> {
        indices.iter().copied().map(Self::position).collect()
    }
}

/// Receiver of OBJ/MTL directives
///
/// Lifecycle: `start_parsing`, any number of geometry and material calls,
/// `finish_parsing`, then `close`. Out-of-order calls fail with
/// [`BuildError::ProtocolViolation`](crate::BuildError::ProtocolViolation).
pub trait ModelSink {
    /// What `finish_parsing` hands back
    type Output;

    /// Begin a new model
    fn start_parsing(&mut self, name: &str) -> Result<()>;

    /// Add a geometric vertex; returns its 1-based index
    fn add_position(&mut self, x: f64, y: f64, z: f64) -> Result<usize>;

    /// Add a texture vertex; returns its 1-based index
    fn add_tex_coord(&mut self, u: f64, v: f64) -> Result<usize>;

    /// Add a vertex normal; returns its 1-based index
    fn add_normal(&mut self, x: f64, y: f64, z: f64) -> Result<usize>;

    /// Point element (`p`)
    fn add_points(&mut self, indices: &[i64]) -> Result<()>;

    /// Line element (`l`)
    fn add_line(&mut self, indices: &[i64]) -> Result<()>;

    /// Face element (`f`); `None` when the face was discarded
    fn add_face(&mut self, corners: &[RawCorner]) -> Result<Option<FaceId>>;

    /// Object name (`o`)
    fn set_object_name(&mut self, name: &str) -> Result<()>;

    /// Replace the active group set (`g`); `None` or empty clears it
    fn set_active_groups(&mut self, names: Option<&[&str]>) -> Result<()>;

    /// Set the active smoothing group (`s`); 0 turns smoothing off
    fn set_active_smoothing_group(&mut self, id: u32) -> Result<()>;

    /// Material library references (`mtllib`)
    fn add_material_lib(&mut self, names: &[&str]) -> Result<()>;

    /// Map library references (`maplib`)
    fn add_map_lib(&mut self, names: &[&str]) -> Result<()>;

    /// Register a texture map definition from a map library
    fn define_map(&mut self, name: &str, filename: &str) -> Result<()>;

    /// Material for subsequent faces (`usemtl`)
    fn set_active_material(&mut self, name: &str) -> Result<()>;

    /// Texture map for subsequent faces (`usemap`); resolved against defined maps
    fn set_active_map(&mut self, name: &str) -> Result<()>;

    /// Start a material definition (`newmtl`)
    fn begin_material(&mut self, name: &str) -> Result<()>;

    /// Set a channel from RGB values
    fn set_channel_rgb(&mut self, kind: ChannelKind, r: f64, g: f64, b: f64) -> Result<()>;

    /// Set a channel from CIE XYZ values
    fn set_channel_xyz(&mut self, kind: ChannelKind, x: f64, y: f64, z: f64) -> Result<()>;

    /// Illumination model (`illum`)
    fn set_illumination(&mut self, model: u32) -> Result<()>;

    /// Dissolve factor and halo flag (`d`)
    fn set_dissolve(&mut self, halo: bool, factor: f64) -> Result<()>;

    /// Specular exponent (`Ns`)
    fn set_specular_exponent(&mut self, exponent: f64) -> Result<()>;

    /// Reflection sharpness (`sharpness`)
    fn set_sharpness(&mut self, value: f64) -> Result<()>;

    /// Optical density (`Ni`)
    fn set_optical_density(&mut self, density: f64) -> Result<()>;

    /// Texture map file name for a slot
    fn set_texture_map(&mut self, kind: TextureMapKind, filename: &str) -> Result<()>;

    /// Reflection map (`refl`)
    fn set_reflection(&mut self, kind: ReflectionType, filename: &str) -> Result<()>;

    /// End the current material definition
    fn end_material(&mut self) -> Result<()>;

    /// Finish the model and hand it out
    fn finish_parsing(&mut self) -> Result<Self::Output>;

    /// Release transient state after `finish_parsing`
    fn close(&mut self) -> Result<()>;
}
