//! Registry of texture files referenced by loaded models
//!
//! Shared across parse sessions running on different threads. Only names are
//! recorded; decoding the images is left to the renderer.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::Model;

/// Materials using one texture file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureUse {
    /// `model/material` labels, in registration order
    pub materials: Vec<String>,
}

/// Thread-safe texture file registry
#[derive(Debug, Default)]
pub struct TextureRegistry {
    /// Texture file name -> users
    textures: RwLock<HashMap<String, TextureUse>>,
}

impl TextureRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every texture file referenced by the model's materials
    ///
    /// # Returns
    /// Number of file names not seen before
    pub fn register_model(&self, model: &Model) -> usize {
        let mut textures = self.write();
        let mut added = 0;

        for (material_name, material) in &model.materials {
            let label = format!("{}/{}", model.name, material_name);
            for filename in material.texture_files() {
                let entry = textures.entry(filename.to_string()).or_insert_with(|| {
                    added += 1;
                    TextureUse::default()
                });
                if !entry.materials.contains(&label) {
                    entry.materials.push(label.clone());
                }
            }
        }

        if added > 0 {
            log::debug!("Registered {} new textures from '{}'", added, model.name);
        }
        added
    }

    /// Whether a texture file has been registered
    pub fn contains(&self, filename: &str) -> bool {
        self.read().contains_key(filename)
    }

    /// Materials using a texture file
    pub fn users(&self, filename: &str) -> Option<TextureUse> {
        self.read().get(filename).cloned()
    }

    /// Number of distinct texture files
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All registered file names, sorted
    pub fn filenames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, TextureUse>> {
        self.textures.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, TextureUse>> {
        self.textures.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Material, TextureMapKind};

    fn textured_model(name: &str, files: &[(&str, &str)]) -> Model {
        let mut model = Model::new(name);
        for (material_name, file) in files {
            let mut material = Material::new(*material_name);
            material
                .texture_maps
                .insert(TextureMapKind::Diffuse, (*file).to_string());
            model.materials.insert((*material_name).to_string(), material);
        }
        model
    }

    #[test]
    fn test_register_model() {
        let registry = TextureRegistry::new();
        assert!(registry.is_empty());

        let model = textured_model("crate", &[("wood", "wood.png"), ("metal", "metal.png")]);
        assert_eq!(registry.register_model(&model), 2);
        // Registering again adds nothing
        assert_eq!(registry.register_model(&model), 0);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("wood.png"));
        assert_eq!(registry.filenames(), vec!["metal.png", "wood.png"]);
        assert_eq!(
            registry.users("wood.png").unwrap().materials,
            vec!["crate/wood".to_string()]
        );
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(TextureRegistry::new());

        std::thread::scope(|scope| {
            for i in 0..4 {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    let model = textured_model(
                        &format!("model{i}"),
                        &[("shared", "shared.png"), ("own", &format!("own{i}.png"))],
                    );
                    registry.register_model(&model);
                });
            }
        });

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.users("shared.png").unwrap().materials.len(), 4);
    }
}
