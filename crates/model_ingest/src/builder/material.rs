//! MTL sub-protocol of a parse session
//!
//! Every setter writes into the material opened by `begin_material`. With no
//! material open the setter fails and nothing is written, so a library missing
//! its `newmtl` line cannot silently overwrite the previous material.

use log::warn;

use super::session::{MaterialTarget, ParseSession};
use crate::config::DuplicateMaterialPolicy;
use crate::model::{ChannelKind, Material, Reflection, ReflectionType, TextureMapKind};
use crate::{BuildError, Result};

impl ParseSession {
    pub(super) fn begin_material(&mut self, name: &str) {
        let keep_first = self.config.duplicate_materials == DuplicateMaterialPolicy::KeepFirst;

        self.material_target = if keep_first && self.model.materials.contains_key(name) {
            warn!(
                target: self.target(),
                "Material '{}' is already defined, ignoring redefinition",
                name
            );
            Some(MaterialTarget::Detached(Box::new(Material::new(name))))
        } else {
            self.model
                .materials
                .insert(name.to_string(), Material::new(name));
            Some(MaterialTarget::Registered(name.to_string()))
        };
    }

    pub(super) fn end_material(&mut self) {
        self.material_target = None;
    }

    /// Material currently being parsed
    fn material_mut(&mut self, operation: &'static str) -> Result<&mut Material> {
        match &mut self.material_target {
            Some(MaterialTarget::Registered(name)) => self
                .model
                .materials
                .get_mut(name.as_str())
                .ok_or_else(|| BuildError::no_material_target(operation)),
            Some(MaterialTarget::Detached(material)) => Ok(material.as_mut()),
            None => Err(BuildError::no_material_target(operation)),
        }
    }

    pub(super) fn set_channel_rgb(&mut self, kind: ChannelKind, r: f64, g: f64, b: f64) -> Result<()> {
        self.material_mut("set_channel_rgb")?
            .channel_mut(kind)
            .set_rgb(r, g, b);
        Ok(())
    }

    pub(super) fn set_channel_xyz(&mut self, kind: ChannelKind, x: f64, y: f64, z: f64) -> Result<()> {
        self.material_mut("set_channel_xyz")?
            .channel_mut(kind)
            .set_xyz(x, y, z);
        Ok(())
    }

    pub(super) fn set_illumination(&mut self, model: u32) -> Result<()> {
        self.material_mut("set_illumination")?.illumination_model = model;
        Ok(())
    }

    pub(super) fn set_dissolve(&mut self, halo: bool, factor: f64) -> Result<()> {
        let material = self.material_mut("set_dissolve")?;
        material.halo = halo;
        material.dissolve = factor;
        Ok(())
    }

    pub(super) fn set_specular_exponent(&mut self, exponent: f64) -> Result<()> {
        self.material_mut("set_specular_exponent")?.specular_exponent = exponent;
        Ok(())
    }

    pub(super) fn set_sharpness(&mut self, value: f64) -> Result<()> {
        self.material_mut("set_sharpness")?.sharpness = value;
        Ok(())
    }

    pub(super) fn set_optical_density(&mut self, density: f64) -> Result<()> {
        self.material_mut("set_optical_density")?.optical_density = density;
        Ok(())
    }

    pub(super) fn set_texture_map(&mut self, kind: TextureMapKind, filename: &str) -> Result<()> {
        self.material_mut("set_texture_map")?
            .texture_maps
            .insert(kind, filename.to_string());
        Ok(())
    }

    pub(super) fn set_reflection(&mut self, kind: ReflectionType, filename: &str) -> Result<()> {
        self.material_mut("set_reflection")?.reflection = Some(Reflection {
            kind,
            filename: filename.to_string(),
        });
        Ok(())
    }
}
