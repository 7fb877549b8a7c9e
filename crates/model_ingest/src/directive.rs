//! Parsed OBJ/MTL directives
//!
//! One [`Directive`] per source statement. Applying a directive forwards it to
//! a [`ModelSink`]; producers never touch the sink's state directly.

use crate::builder::{ModelSink, RawCorner};
use crate::model::{ChannelKind, ReflectionType, TextureMapKind};
use crate::Result;

/// A single OBJ or MTL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `v x y z [w]`
    Position([f64; 3]),
    /// `vt u v`
    TexCoord([f64; 2]),
    /// `vn x y z`
    Normal([f64; 3]),
    /// `p v1 v2 ...`
    Points(Vec<i64>),
    /// `l v1 v2 ...`
    Line(Vec<i64>),
    /// `f v1/vt1/vn1 ...`
    Face(Vec<RawCorner>),
    /// `o name`
    ObjectName(String),
    /// `g name1 name2 ...`; `None` for a bare `g`
    Groups(Option<Vec<String>>),
    /// `s id` / `s off`
    SmoothingGroup(u32),
    /// `mtllib file1 file2 ...`
    MaterialLib(Vec<String>),
    /// `maplib file1 file2 ...`
    MapLib(Vec<String>),
    /// Texture map definition from a map library
    DefineMap {
        /// Name used by `usemap`
        name: String,
        /// Image file
        filename: String,
    },
    /// `usemtl name`
    UseMaterial(String),
    /// `usemap name` / `usemap off`
    UseMap(String),
    /// `newmtl name`
    NewMaterial(String),
    /// `Ka/Kd/Ks/Tf r g b`
    ChannelRgb(ChannelKind, [f64; 3]),
    /// `Ka/Kd/Ks/Tf xyz x y z`
    ChannelXyz(ChannelKind, [f64; 3]),
    /// `illum n`
    Illumination(u32),
    /// `d [-halo] factor`
    Dissolve {
        /// `-halo` present
        halo: bool,
        /// Dissolve factor
        factor: f64,
    },
    /// `Ns exponent`
    SpecularExponent(f64),
    /// `sharpness value`
    Sharpness(f64),
    /// `Ni density`
    OpticalDensity(f64),
    /// `map_Ka`, `map_Kd`, ..., `bump`
    TextureMap(TextureMapKind, String),
    /// `refl -type kind file`
    Reflection(ReflectionType, String),
    /// End of a material library
    EndMaterial,
}

impl Directive {
    /// Forward this directive to a sink
    pub fn apply<S: ModelSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        match self {
            Self::Position([x, y, z]) => sink.add_position(*x, *y, *z).map(drop),
            Self::TexCoord([u, v]) => sink.add_tex_coord(*u, *v).map(drop),
            Self::Normal([x, y, z]) => sink.add_normal(*x, *y, *z).map(drop),
            Self::Points(indices) => sink.add_points(indices),
            Self::Line(indices) => sink.add_line(indices),
            Self::Face(corners) => sink.add_face(corners).map(drop),
            Self::ObjectName(name) => sink.set_object_name(name),
            Self::Groups(names) => {
                let names: Option<Vec<&str>> =
                    names.as_ref().map(|names| names.iter().map(String::as_str).collect());
                sink.set_active_groups(names.as_deref())
            }
            Self::SmoothingGroup(id) => sink.set_active_smoothing_group(*id),
            Self::MaterialLib(names) => sink.add_material_lib(&as_strs(names)),
            Self::MapLib(names) => sink.add_map_lib(&as_strs(names)),
            Self::DefineMap { name, filename } => sink.define_map(name, filename),
            Self::UseMaterial(name) => sink.set_active_material(name),
            Self::UseMap(name) => sink.set_active_map(name),
            Self::NewMaterial(name) => sink.begin_material(name),
            Self::ChannelRgb(kind, [r, g, b]) => sink.set_channel_rgb(*kind, *r, *g, *b),
            Self::ChannelXyz(kind, [x, y, z]) => sink.set_channel_xyz(*kind, *x, *y, *z),
            Self::Illumination(model) => sink.set_illumination(*model),
            Self::Dissolve { halo, factor } => sink.set_dissolve(*halo, *factor),
            Self::SpecularExponent(exponent) => sink.set_specular_exponent(*exponent),
            Self::Sharpness(value) => sink.set_sharpness(*value),
            Self::OpticalDensity(density) => sink.set_optical_density(*density),
            Self::TextureMap(kind, filename) => sink.set_texture_map(*kind, filename),
            Self::Reflection(kind, filename) => sink.set_reflection(*kind, filename),
            Self::EndMaterial => sink.end_material(),
        }
    }
}

fn as_strs(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}

/// Apply a sequence of directives in order, stopping at the first error
pub fn apply_all<'a, S, I>(directives: I, sink: &mut S) -> Result<()>
where
    S: ModelSink + ?Sized,
    I: IntoIterator<Item = &'a Directive>,
{
    directives
        .into_iter()
        .try_for_each(|directive| directive.apply(sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModelBuilder;

    #[test]
    fn test_apply_geometry_and_groups() {
        let directives = vec![
            Directive::Position([0.0, 0.0, 0.0]),
            Directive::Position([1.0, 0.0, 0.0]),
            Directive::Position([0.0, 1.0, 0.0]),
            Directive::Groups(Some(vec!["a".to_string(), "b".to_string()])),
            Directive::SmoothingGroup(2),
            Directive::Face(RawCorner::positions(&[1, 2, 3])),
            Directive::Groups(None),
            Directive::Face(RawCorner::positions(&[3, 2, 1])),
        ];

        let mut builder = ModelBuilder::default();
        builder.start_parsing("directives").unwrap();
        apply_all(&directives, &mut builder).unwrap();
        let model = builder.finish_parsing().unwrap();

        assert_eq!(model.faces.len(), 2);
        assert_eq!(model.groups["a"].faces.len(), 1);
        assert_eq!(model.groups["b"].faces.len(), 1);
        assert_eq!(model.smoothing_groups[&2].faces.len(), 2);
    }

    #[test]
    fn test_usemap_resolves_against_defined_maps() {
        let directives = vec![
            Directive::NewMaterial("red".to_string()),
            Directive::EndMaterial,
            Directive::DefineMap {
                name: "stone".to_string(),
                filename: "stone.png".to_string(),
            },
            Directive::Position([0.0, 0.0, 0.0]),
            Directive::UseMap("red".to_string()),
            Directive::Face(RawCorner::positions(&[1, 1, 1])),
            Directive::UseMap("stone".to_string()),
            Directive::Face(RawCorner::positions(&[1, 1, 1])),
        ];

        let mut builder = ModelBuilder::default();
        builder.start_parsing("maps").unwrap();
        apply_all(&directives, &mut builder).unwrap();
        let model = builder.finish_parsing().unwrap();

        assert_eq!(model.faces[0].map, None);
        assert_eq!(model.faces[1].map.as_deref(), Some("stone"));
    }

    #[test]
    fn test_apply_stops_at_protocol_violation() {
        let directives = vec![
            Directive::NewMaterial("m".to_string()),
            Directive::Illumination(2),
            Directive::EndMaterial,
            Directive::SpecularExponent(5.0),
            Directive::NewMaterial("never".to_string()),
        ];

        let mut builder = ModelBuilder::default();
        builder.start_parsing("mtl").unwrap();
        let err = apply_all(&directives, &mut builder).unwrap_err();
        let model = builder.finish_parsing().unwrap();

        assert!(err.is_protocol_violation());
        assert_eq!(model.materials.len(), 1);
        assert_eq!(model.material("m").unwrap().illumination_model, 2);
    }

    #[test]
    fn test_apply_outside_session_fails() {
        let mut builder = ModelBuilder::default();
        let err = Directive::Position([0.0, 0.0, 0.0])
            .apply(&mut builder)
            .unwrap_err();
        assert!(err.is_protocol_violation());
    }
}
