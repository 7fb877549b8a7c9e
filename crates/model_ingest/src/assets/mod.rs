//! Asset loading: OBJ/MTL readers and the texture registry

pub mod mtl_reader;
pub mod obj_reader;
pub mod texture_registry;

pub use mtl_reader::MtlReader;
pub use obj_reader::ObjReader;
pub use texture_registry::{TextureRegistry, TextureUse};

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::builder::{ModelBuilder, ModelSink};
use crate::config::BuilderConfig;
use crate::directive::{apply_all, Directive};
use crate::model::Model;
use crate::Result;

/// Loads OBJ files and their material libraries into a [`Model`]
///
/// Each load runs its own [`ModelBuilder`], so one loader can be shared by
/// several threads.
#[derive(Debug, Clone, Default)]
pub struct ModelLoader {
    config: BuilderConfig,
}

impl ModelLoader {
    /// Create a loader whose builders use `config`
    pub const fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Builder configuration
    pub const fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Build a model from OBJ text and already-read MTL texts
    ///
    /// Material libraries are applied before the geometry so `usemtl`
    /// statements resolve.
    pub fn load_str(&self, name: &str, obj: &str, material_libraries: &[&str]) -> Result<Model> {
        let mut material_directives = Vec::new();
        for library in material_libraries {
            material_directives.extend(MtlReader::parse(library)?);
        }
        let directives = ObjReader::parse(obj)?;

        self.build(name, &material_directives, &directives)
    }

    /// Load an OBJ file, reading `mtllib` files relative to its directory
    ///
    /// Missing material libraries are logged and skipped.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Model> {
        let path = path.as_ref();
        info!(target: self.config.log_target.as_str(), "Loading OBJ file: {:?}", path);

        let contents = fs::read_to_string(path)?;
        let directives = ObjReader::parse(&contents)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

        let mut material_directives = Vec::new();
        for directive in &directives {
            let Directive::MaterialLib(files) = directive else {
                continue;
            };
            for file in files {
                let mtl_path = base_dir.join(file);
                match fs::read_to_string(&mtl_path) {
                    Ok(mtl) => material_directives.extend(MtlReader::parse(&mtl)?),
                    Err(e) => warn!(
                        target: self.config.log_target.as_str(),
                        "Failed to read material library {:?}: {}",
                        mtl_path,
                        e
                    ),
                }
            }
        }

        let name = path
            .file_stem()
            .map_or_else(|| path.to_string_lossy(), |stem| stem.to_string_lossy());
        self.build(&name, &material_directives, &directives)
    }

    fn build(&self, name: &str, materials: &[Directive], geometry: &[Directive]) -> Result<Model> {
        let mut builder = ModelBuilder::new(self.config.clone());
        builder.start_parsing(name)?;
        apply_all(materials, &mut builder)?;
        apply_all(geometry, &mut builder)?;
        let model = builder.finish_parsing()?;
        builder.close()?;
        Ok(model)
    }
}
