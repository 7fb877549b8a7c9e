//! Assembled model data
//!
//! A [`Model`] is produced by [`ModelBuilder`](crate::builder::ModelBuilder)
//! and handed to scene assembly by value.

pub mod material;

pub use material::{
    Channel, ChannelKind, ColorSpace, Material, Reflection, ReflectionType, TextureMapKind,
};

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3};

/// Vertex attribute sequence a face index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Geometric vertex (`v`)
    Position,
    /// Texture vertex (`vt`)
    TexCoord,
    /// Vertex normal (`vn`)
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Position => "geometric vertex",
            Self::TexCoord => "texture vertex",
            Self::Normal => "vertex normal",
        })
    }
}

/// Deduplicated face corner
///
/// All indices are 0-based into the model's sequences. `index` is the slot of
/// this vertex in [`Model::face_vertices`]; two corners resolving to the same
/// triple share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceVertex {
    /// Slot in the model's unique face vertex list
    pub index: usize,
    /// Position index
    pub position: usize,
    /// Texture coordinate index, if any
    pub texture: Option<usize>,
    /// Normal index, if any
    pub normal: Option<usize>,
}

/// Index of a face in [`Model::faces`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceId(pub usize);

/// Polygon built from deduplicated corners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Corners in winding order
    pub vertices: Vec<FaceVertex>,
    /// Material active when the face was built
    pub material: Option<String>,
    /// Texture map active when the face was built
    pub map: Option<String>,
}

impl Face {
    /// Number of corners
    pub fn corner_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Named, non-exclusive collection of faces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name
    pub name: String,
    /// Member faces in insertion order
    pub faces: Vec<FaceId>,
}

/// Faces sharing interpolated-normal shading, keyed by a non-zero id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingGroup {
    /// Smoothing group id (never 0)
    pub id: u32,
    /// Member faces in insertion order
    pub faces: Vec<FaceId>,
}

/// Counters describing what the parse produced and what it dropped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Faces with three corners
    pub triangles: usize,
    /// Faces with four corners
    pub quads: usize,
    /// Faces with more than four corners
    pub polygons: usize,
    /// Faces discarded: fewer than three corners or an unresolvable position
    pub errors: usize,
    /// Point elements received and ignored
    pub points: usize,
    /// Line elements received and ignored
    pub lines: usize,
}

impl Diagnostics {
    /// Number of faces that made it into the model
    pub const fn face_count(&self) -> usize {
        self.triangles + self.quads + self.polygons
    }

    /// Record a built face by its corner count
    pub(crate) fn record_face(&mut self, corners: usize) {
        match corners {
            3 => self.triangles += 1,
            4 => self.quads += 1,
            5.. => self.polygons += 1,
            _ => {}
        }
    }
}

/// Scene-ready model assembled from OBJ/MTL directives
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Name given when parsing started (usually the file name)
    pub name: String,
    /// Object name from the last `o` statement
    pub object_name: Option<String>,
    /// Geometric vertices
    pub positions: Vec<Vec3>,
    /// Texture vertices
    pub tex_coords: Vec<Vec2>,
    /// Vertex normals
    pub normals: Vec<Vec3>,
    /// Unique face vertices, in first-use order
    pub face_vertices: Vec<FaceVertex>,
    /// Faces in statement order
    pub faces: Vec<Face>,
    /// Groups by name
    pub groups: HashMap<String, Group>,
    /// Smoothing groups by id
    pub smoothing_groups: HashMap<u32, SmoothingGroup>,
    /// Material library by name
    pub materials: HashMap<String, Material>,
    /// Texture map definitions: map name -> image file
    pub maps: HashMap<String, String>,
    /// Material library files referenced by `mtllib`
    pub material_libraries: Vec<String>,
    /// Map library files referenced by `maplib`
    pub map_libraries: Vec<String>,
    /// Parse diagnostics
    pub diagnostics: Diagnostics,
}

impl Model {
    /// Create an empty model
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether no face made it into the model
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Get a face by id
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0)
    }

    /// Get a group by name
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Get a smoothing group by id
    pub fn smoothing_group(&self, id: u32) -> Option<&SmoothingGroup> {
        self.smoothing_groups.get(&id)
    }

    /// Get a material by name
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Faces belonging to a group, empty if the group does not exist
    pub fn faces_in_group<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Face> + 'a {
        self.group(name)
            .into_iter()
            .flat_map(|group| group.faces.iter())
            .filter_map(|id| self.face(*id))
    }

    /// Names of every group containing the face
    pub fn groups_of(&self, id: FaceId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .groups
            .values()
            .filter(|group| group.faces.contains(&id))
            .map(|group| group.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Id of the smoothing group containing the face, if any
    pub fn smoothing_group_of(&self, id: FaceId) -> Option<u32> {
        self.smoothing_groups
            .values()
            .find(|group| group.faces.contains(&id))
            .map(|group| group.id)
    }

    /// Position of a face vertex
    pub fn position_of(&self, vertex: &FaceVertex) -> Option<&Vec3> {
        self.positions.get(vertex.position)
    }

    /// Texture coordinate of a face vertex
    pub fn tex_coord_of(&self, vertex: &FaceVertex) -> Option<&Vec2> {
        vertex.texture.and_then(|i| self.tex_coords.get(i))
    }

    /// Normal of a face vertex
    pub fn normal_of(&self, vertex: &FaceVertex) -> Option<&Vec3> {
        vertex.normal.and_then(|i| self.normals.get(i))
    }
}
