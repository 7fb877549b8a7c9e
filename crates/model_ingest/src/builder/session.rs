//! State of one parse session: the model under construction plus everything
//! that only matters while directives are still arriving.

use std::collections::HashMap;

use log::{debug, info, warn};

use super::{RawCorner, NO_SMOOTHING_GROUP};
use crate::config::BuilderConfig;
use crate::foundation::math::{Vec2, Vec3};
use crate::model::{AttributeKind, Face, FaceId, FaceVertex, Group, Material, Model, SmoothingGroup};
use crate::{BuildError, Result};

/// Fewest corners a face can have
const MIN_FACE_CORNERS: usize = 3;

/// Structural dedup key: resolved 0-based (position, texture, normal)
type VertexKey = (usize, Option<usize>, Option<usize>);

/// Material receiving MTL setters
pub(super) enum MaterialTarget {
    /// Registered in the model's library under this name
    Registered(String),
    /// Parsed but never registered (duplicate under `KeepFirst`)
    Detached(Box<Material>),
}

pub(super) struct ParseSession {
    pub(super) config: BuilderConfig,
    pub(super) model: Model,
    face_vertex_map: HashMap<VertexKey, FaceVertex>,
    active_groups: Vec<String>,
    active_smoothing_group: u32,
    active_material: Option<String>,
    active_map: Option<String>,
    pub(super) material_target: Option<MaterialTarget>,
}

/// Resolve an OBJ index against a sequence of `len` elements
///
/// Positive indices are 1-based; negative ones count back from the end as it
/// stands at this statement. Returns the 0-based position.
pub(crate) fn resolve_index(kind: AttributeKind, index: i64, len: usize) -> Result<usize> {
    let out_of_range = || BuildError::IndexOutOfRange { kind, index, len };

    let back = usize::try_from(index.unsigned_abs()).map_err(|_| out_of_range())?;
    let resolved = if index > 0 {
        back - 1
    } else if index < 0 && back <= len {
        len - back
    } else {
        return Err(out_of_range());
    };

    if resolved < len {
        Ok(resolved)
    } else {
        Err(out_of_range())
    }
}

impl ParseSession {
    pub(super) fn new(name: &str, config: BuilderConfig) -> Self {
        info!(target: config.log_target.as_str(), "Started parsing '{}'", name);
        Self {
            config,
            model: Model::new(name),
            face_vertex_map: HashMap::new(),
            active_groups: Vec::new(),
            active_smoothing_group: NO_SMOOTHING_GROUP,
            active_material: None,
            active_map: None,
            material_target: None,
        }
    }

    pub(super) fn target(&self) -> &str {
        &self.config.log_target
    }

    /// Drop everything that only mattered while parsing
    pub(super) fn release(&mut self) {
        self.face_vertex_map = HashMap::new();
        self.active_groups = Vec::new();
        self.active_smoothing_group = NO_SMOOTHING_GROUP;
        self.active_material = None;
        self.active_map = None;
        self.material_target = None;
    }

    pub(super) fn add_position(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.model.positions.push(Vec3::new(x, y, z));
        self.model.positions.len()
    }

    pub(super) fn add_tex_coord(&mut self, u: f64, v: f64) -> usize {
        self.model.tex_coords.push(Vec2::new(u, v));
        self.model.tex_coords.len()
    }

    pub(super) fn add_normal(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.model.normals.push(Vec3::new(x, y, z));
        self.model.normals.len()
    }

    pub(super) fn add_points(&mut self, indices: &[i64]) {
        info!(target: self.target(), "Got {} points, ignoring", indices.len());
        self.model.diagnostics.points += 1;
    }

    pub(super) fn add_line(&mut self, indices: &[i64]) {
        info!(target: self.target(), "Got a line of {} vertices, ignoring", indices.len());
        self.model.diagnostics.lines += 1;
    }

    /// Resolve a texture/normal slot; out of range becomes absent
    fn resolve_optional(&self, kind: AttributeKind, index: Option<i64>, len: usize) -> Option<usize> {
        let index = index?;
        match resolve_index(kind, index, len) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                warn!(target: self.target(), "{}, ignoring", err);
                None
            }
        }
    }

    /// Intern a resolved triple, reusing an existing face vertex when present
    fn intern(&mut self, key: VertexKey) -> FaceVertex {
        let face_vertices = &mut self.model.face_vertices;
        *self.face_vertex_map.entry(key).or_insert_with(|| {
            let vertex = FaceVertex {
                index: face_vertices.len(),
                position: key.0,
                texture: key.1,
                normal: key.2,
            };
            face_vertices.push(vertex);
            vertex
        })
    }

    pub(super) fn add_face(&mut self, corners: &[RawCorner]) -> Option<FaceId> {
        if corners.len() < MIN_FACE_CORNERS {
            warn!(
                target: self.target(),
                "Face with {} vertices, need at least {}, throwing away face",
                corners.len(),
                MIN_FACE_CORNERS
            );
            self.model.diagnostics.errors += 1;
            return None;
        }

        // Resolve every corner before touching the model so a bad position
        // leaves nothing behind.
        let mut keys = Vec::with_capacity(corners.len());
        for corner in corners {
            let position = match resolve_index(
                AttributeKind::Position,
                corner.position,
                self.model.positions.len(),
            ) {
                Ok(position) => position,
                Err(err) => {
                    warn!(
                        target: self.target(),
                        "{}; can't add vertex to face with missing position, throwing away face",
                        err
                    );
                    self.model.diagnostics.errors += 1;
                    return None;
                }
            };
            let texture =
                self.resolve_optional(AttributeKind::TexCoord, corner.texture, self.model.tex_coords.len());
            let normal =
                self.resolve_optional(AttributeKind::Normal, corner.normal, self.model.normals.len());
            keys.push((position, texture, normal));
        }

        let vertices = keys.into_iter().map(|key| self.intern(key)).collect::<Vec<_>>();
        let corner_count = vertices.len();
        let id = FaceId(self.model.faces.len());

        self.model.faces.push(Face {
            vertices,
            material: self.active_material.clone(),
            map: self.active_map.clone(),
        });

        if self.active_smoothing_group != NO_SMOOTHING_GROUP {
            if let Some(group) = self.model.smoothing_groups.get_mut(&self.active_smoothing_group) {
                group.faces.push(id);
            }
        }

        for name in &self.active_groups {
            if let Some(group) = self.model.groups.get_mut(name) {
                group.faces.push(id);
            }
        }

        self.model.diagnostics.record_face(corner_count);
        Some(id)
    }

    pub(super) fn set_object_name(&mut self, name: &str) {
        self.model.object_name = Some(name.to_string());
    }

    pub(super) fn set_active_groups(&mut self, names: Option<&[&str]>) {
        self.active_groups.clear();

        for name in names.unwrap_or_default() {
            let name = if self.config.trim_group_names {
                name.trim()
            } else {
                *name
            };
            if name.is_empty() || self.active_groups.iter().any(|active| active == name) {
                continue;
            }

            self.model
                .groups
                .entry(name.to_string())
                .or_insert_with(|| Group {
                    name: name.to_string(),
                    faces: Vec::new(),
                });
            self.active_groups.push(name.to_string());
        }
    }

    pub(super) fn set_active_smoothing_group(&mut self, id: u32) {
        self.active_smoothing_group = id;
        if id == NO_SMOOTHING_GROUP {
            return;
        }

        self.model
            .smoothing_groups
            .entry(id)
            .or_insert_with(|| SmoothingGroup {
                id,
                faces: Vec::new(),
            });
    }

    pub(super) fn add_material_lib(&mut self, names: &[&str]) {
        self.model
            .material_libraries
            .extend(names.iter().map(|name| (*name).to_string()));
    }

    pub(super) fn add_map_lib(&mut self, names: &[&str]) {
        self.model
            .map_libraries
            .extend(names.iter().map(|name| (*name).to_string()));
    }

    pub(super) fn define_map(&mut self, name: &str, filename: &str) {
        self.model.maps.insert(name.to_string(), filename.to_string());
    }

    pub(super) fn set_active_material(&mut self, name: &str) {
        let known = self.model.materials.contains_key(name);
        self.active_material = self.lookup(name, known, "material");
    }

    pub(super) fn set_active_map(&mut self, name: &str) {
        self.active_map = if name == "off" {
            None
        } else {
            let known = self.model.maps.contains_key(name);
            self.lookup(name, known, "map")
        };
    }

    fn lookup(&self, name: &str, known: bool, what: &str) -> Option<String> {
        if known {
            Some(name.to_string())
        } else {
            debug!(target: self.target(), "Unknown {} '{}', none active", what, name);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute() {
        assert_eq!(resolve_index(AttributeKind::Position, 1, 5).unwrap(), 0);
        assert_eq!(resolve_index(AttributeKind::Position, 5, 5).unwrap(), 4);
        assert!(resolve_index(AttributeKind::Position, 6, 5).is_err());
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_index(AttributeKind::Position, -1, 5).unwrap(), 4);
        assert_eq!(resolve_index(AttributeKind::Position, -5, 5).unwrap(), 0);
        assert!(resolve_index(AttributeKind::Position, -6, 5).is_err());
    }

    #[test]
    fn test_resolve_zero_and_empty() {
        assert!(resolve_index(AttributeKind::Normal, 0, 5).is_err());
        assert!(resolve_index(AttributeKind::Normal, 1, 0).is_err());
        assert!(resolve_index(AttributeKind::Normal, -1, 0).is_err());
        assert!(resolve_index(AttributeKind::Normal, i64::MIN, 3).is_err());
    }

    #[test]
    fn test_out_of_range_error_names_sequence() {
        let err = resolve_index(AttributeKind::TexCoord, 10, 5).unwrap_err();
        assert_eq!(err.to_string(), "texture vertex index 10 is out of range (1 to 5)");
    }

    #[test]
    fn test_duplicate_group_names_join_once() {
        let mut session = ParseSession::new("groups", BuilderConfig::default());
        for _ in 0..3 {
            session.add_position(0.0, 0.0, 0.0);
        }
        session.set_active_groups(Some(&["a", " a ", ""][..]));
        session.add_face(&RawCorner::positions(&[1, 2, 3]));

        assert_eq!(session.active_groups, vec!["a".to_string()]);
        assert_eq!(session.model.groups.len(), 1);
        assert_eq!(session.model.groups["a"].faces, vec![FaceId(0)]);
    }

    #[test]
    fn test_release_clears_transient_state() {
        let mut session = ParseSession::new("release", BuilderConfig::default());
        session.add_position(0.0, 0.0, 0.0);
        session.set_active_groups(Some(&["g"][..]));
        session.add_face(&RawCorner::positions(&[1, 1, 1]));
        session.release();

        assert!(session.active_groups.is_empty());
        assert!(session.face_vertex_map.is_empty());
    }
}
