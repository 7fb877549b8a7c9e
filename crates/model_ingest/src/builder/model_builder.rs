//! In-memory model builder
//!
//! Owns one [`ParseSession`] between `start_parsing` and `close`. The session
//! lives inside the state enum, so every operation checks the lifecycle before
//! it can reach any parse state.

use std::mem;

use log::{info, warn};

use super::session::ParseSession;
use super::{BuilderPhase, ModelSink, RawCorner};
use crate::config::BuilderConfig;
use crate::model::{ChannelKind, FaceId, Model, ReflectionType, TextureMapKind};
use crate::{BuildError, Result};

enum BuilderState {
    Idle,
    Parsing(Box<ParseSession>),
    /// Model handed out; transient state kept until `close`
    Finished(Box<ParseSession>),
    Closed,
}

impl BuilderState {
    const fn phase(&self) -> BuilderPhase {
        match self {
            Self::Idle => BuilderPhase::Idle,
            Self::Parsing(_) => BuilderPhase::Parsing,
            Self::Finished(_) => BuilderPhase::Finished,
            Self::Closed => BuilderPhase::Closed,
        }
    }
}

/// Builds a [`Model`] from OBJ/MTL directives
///
/// # Examples
/// ```
/// use model_ingest::prelude::*;
///
/// let mut builder = ModelBuilder::new(BuilderConfig::default());
/// builder.start_parsing("materials").unwrap();
/// builder.begin_material("red").unwrap();
/// builder.set_channel_rgb(ChannelKind::Diffuse, 1.0, 0.0, 0.0).unwrap();
/// builder.end_material().unwrap();
///
/// // No material open any more
/// assert!(builder.set_illumination(2).is_err());
/// ```
pub struct ModelBuilder {
    config: BuilderConfig,
    state: BuilderState,
}

impl ModelBuilder {
    /// Create a builder with the given configuration
    pub const fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            state: BuilderState::Idle,
        }
    }

    /// Current lifecycle phase
    pub const fn phase(&self) -> BuilderPhase {
        self.state.phase()
    }

    /// Builder configuration
    pub const fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Session being parsed, or a protocol violation
    fn session(&mut self, operation: &'static str) -> Result<&mut ParseSession> {
        match &mut self.state {
            BuilderState::Parsing(session) => Ok(session.as_mut()),
            other => Err(BuildError::wrong_phase(operation, other.phase())),
        }
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl ModelSink for ModelBuilder {
    type Output = Model;

    fn start_parsing(&mut self, name: &str) -> Result<()> {
        match self.state {
            BuilderState::Idle | BuilderState::Closed => {
                self.state =
                    BuilderState::Parsing(Box::new(ParseSession::new(name, self.config.clone())));
                Ok(())
            }
            ref other => Err(BuildError::wrong_phase("start_parsing", other.phase())),
        }
    }

    fn add_position(&mut self, x: f64, y: f64, z: f64) -> Result<usize> {
        Ok(self.session("add_position")?.add_position(x, y, z))
    }

    fn add_tex_coord(&mut self, u: f64, v: f64) -> Result<usize> {
        Ok(self.session("add_tex_coord")?.add_tex_coord(u, v))
    }

    fn add_normal(&mut self, x: f64, y: f64, z: f64) -> Result<usize> {
        Ok(self.session("add_normal")?.add_normal(x, y, z))
    }

    fn add_points(&mut self, indices: &[i64]) -> Result<()> {
        self.session("add_points")?.add_points(indices);
        Ok(())
    }

    fn add_line(&mut self, indices: &[i64]) -> Result<()> {
        self.session("add_line")?.add_line(indices);
        Ok(())
    }

    fn add_face(&mut self, corners: &[RawCorner]) -> Result<Option<FaceId>> {
        Ok(self.session("add_face")?.add_face(corners))
    }

    fn set_object_name(&mut self, name: &str) -> Result<()> {
        self.session("set_object_name")?.set_object_name(name);
        Ok(())
    }

    fn set_active_groups(&mut self, names: Option<&[&str]>) -> Result<()> {
        self.session("set_active_groups")?.set_active_groups(names);
        Ok(())
    }

    fn set_active_smoothing_group(&mut self, id: u32) -> Result<()> {
        self.session("set_active_smoothing_group")?
            .set_active_smoothing_group(id);
        Ok(())
    }

    fn add_material_lib(&mut self, names: &[&str]) -> Result<()> {
        self.session("add_material_lib")?.add_material_lib(names);
        Ok(())
    }

    fn add_map_lib(&mut self, names: &[&str]) -> Result<()> {
        self.session("add_map_lib")?.add_map_lib(names);
        Ok(())
    }

    fn define_map(&mut self, name: &str, filename: &str) -> Result<()> {
        self.session("define_map")?.define_map(name, filename);
        Ok(())
    }

    fn set_active_material(&mut self, name: &str) -> Result<()> {
        self.session("set_active_material")?.set_active_material(name);
        Ok(())
    }

    fn set_active_map(&mut self, name: &str) -> Result<()> {
        self.session("set_active_map")?.set_active_map(name);
        Ok(())
    }

    fn begin_material(&mut self, name: &str) -> Result<()> {
        self.session("begin_material")?.begin_material(name);
        Ok(())
    }

    fn set_channel_rgb(&mut self, kind: ChannelKind, r: f64, g: f64, b: f64) -> Result<()> {
        self.session("set_channel_rgb")?.set_channel_rgb(kind, r, g, b)
    }

    fn set_channel_xyz(&mut self, kind: ChannelKind, x: f64, y: f64, z: f64) -> Result<()> {
        self.session("set_channel_xyz")?.set_channel_xyz(kind, x, y, z)
    }

    fn set_illumination(&mut self, model: u32) -> Result<()> {
        self.session("set_illumination")?.set_illumination(model)
    }

    fn set_dissolve(&mut self, halo: bool, factor: f64) -> Result<()> {
        self.session("set_dissolve")?.set_dissolve(halo, factor)
    }

    fn set_specular_exponent(&mut self, exponent: f64) -> Result<()> {
        self.session("set_specular_exponent")?
            .set_specular_exponent(exponent)
    }

    fn set_sharpness(&mut self, value: f64) -> Result<()> {
        self.session("set_sharpness")?.set_sharpness(value)
    }

    fn set_optical_density(&mut self, density: f64) -> Result<()> {
        self.session("set_optical_density")?
            .set_optical_density(density)
    }

    fn set_texture_map(&mut self, kind: TextureMapKind, filename: &str) -> Result<()> {
        self.session("set_texture_map")?
            .set_texture_map(kind, filename)
    }

    fn set_reflection(&mut self, kind: ReflectionType, filename: &str) -> Result<()> {
        self.session("set_reflection")?.set_reflection(kind, filename)
    }

    fn end_material(&mut self) -> Result<()> {
        self.session("end_material")?.end_material();
        Ok(())
    }

    fn finish_parsing(&mut self) -> Result<Model> {
        match mem::replace(&mut self.state, BuilderState::Idle) {
            BuilderState::Parsing(mut session) => {
                let model = mem::take(&mut session.model);
                let target = session.target();
                if model.is_empty() && session.config.warn_on_empty_model {
                    warn!(target: target, "Model '{}' contains no faces", model.name);
                }
                info!(
                    target: target,
                    "Finished parsing '{}': {} faces ({} triangles, {} quads, {} polygons), {} errors",
                    model.name,
                    model.faces.len(),
                    model.diagnostics.triangles,
                    model.diagnostics.quads,
                    model.diagnostics.polygons,
                    model.diagnostics.errors
                );
                self.state = BuilderState::Finished(session);
                Ok(model)
            }
            other => {
                let phase = other.phase();
                self.state = other;
                Err(BuildError::wrong_phase("finish_parsing", phase))
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        match mem::replace(&mut self.state, BuilderState::Closed) {
            BuilderState::Finished(mut session) => {
                session.release();
                Ok(())
            }
            other => {
                let phase = other.phase();
                self.state = other;
                Err(BuildError::wrong_phase("close", phase))
            }
        }
    }
}
