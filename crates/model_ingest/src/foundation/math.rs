//! Math types for model geometry
//!
//! Geometry is stored in double precision, as written in the source files.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type (texture coordinates)
pub type Vec2 = Vector2<f64>;

/// 3D vector type (positions, normals, color channels)
pub type Vec3 = Vector3<f64>;
