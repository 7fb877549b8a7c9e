//! # Model Ingest
//!
//! Assembles Wavefront OBJ geometry and MTL material libraries into an
//! in-memory [`Model`](model::Model) ready for scene assembly.
//!
//! ## Features
//!
//! - **Index Resolution**: Absolute and relative (negative) vertex references
//! - **Face Vertex Deduplication**: Structural interning of resolved index triples
//! - **Grouping**: Multi-membership groups and smoothing groups
//! - **Materials**: Stateful MTL channel assignment with a strict begin/end protocol
//! - **Readers**: Line readers turning OBJ/MTL text into directives
//!
//! ## Quick Start
//!
//! ```rust
//! use model_ingest::prelude::*;
//!
//! fn main() -> Result<(), BuildError> {
//!     let mut builder = ModelBuilder::new(BuilderConfig::default());
//!     builder.start_parsing("quad")?;
//!     builder.add_position(0.0, 0.0, 0.0)?;
//!     builder.add_position(1.0, 0.0, 0.0)?;
//!     builder.add_position(1.0, 1.0, 0.0)?;
//!     builder.add_position(0.0, 1.0, 0.0)?;
//!     builder.add_face(&RawCorner::positions(&[1, 2, 3, 4]))?;
//!
//!     let model = builder.finish_parsing()?;
//!     builder.close()?;
//!
//!     assert_eq!(model.diagnostics.quads, 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod builder;
pub mod config;
pub mod directive;
pub mod error;
pub mod foundation;
pub mod model;

pub use error::{BuildError, Result};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        assets::{ModelLoader, MtlReader, ObjReader, TextureRegistry},
        builder::{BuilderPhase, ModelBuilder, ModelSink, RawCorner},
        config::{BuilderConfig, Config, ConfigError, DuplicateMaterialPolicy},
        directive::Directive,
        error::{BuildError, Result},
        foundation::math::{Vec2, Vec3},
        model::{
            Channel, ChannelKind, ColorSpace, Diagnostics, Face, FaceId, FaceVertex, Group,
            Material, Model, Reflection, ReflectionType, SmoothingGroup, TextureMapKind,
        },
    };
}
