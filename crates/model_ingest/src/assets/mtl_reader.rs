//! MTL (Material Template Library) line reader
//!
//! Parses Wavefront .mtl text into [`Directive`]s for the material
//! sub-protocol. Statements before the first `newmtl` are kept, so the
//! builder rejects them instead of writing into some earlier material.

use super::obj_reader::{parse_array, parse_value, rest_of_line, strip_comment};
use crate::directive::Directive;
use crate::model::{ChannelKind, ReflectionType, TextureMapKind};
use crate::{BuildError, Result};

/// MTL text reader
pub struct MtlReader;

impl MtlReader {
    /// Parse MTL file contents into directives
    ///
    /// The result always ends with [`Directive::EndMaterial`].
    ///
    /// # Arguments
    /// * `contents` - The text contents of the MTL file
    pub fn parse(contents: &str) -> Result<Vec<Directive>> {
        let mut directives = Vec::new();

        for (line_num, line) in contents.lines().enumerate() {
            if let Some(directive) = Self::parse_statement(strip_comment(line), line_num + 1)? {
                directives.push(directive);
            }
        }

        directives.push(Directive::EndMaterial);
        Ok(directives)
    }

    /// Parse a single statement; `None` for blank lines and skipped keywords
    pub fn parse_statement(statement: &str, line_num: usize) -> Result<Option<Directive>> {
        let mut tokens = statement.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();

        if let Some(kind) = ChannelKind::from_keyword(command) {
            return Self::parse_channel(kind, &args, line_num, command);
        }
        if let Some(kind) = TextureMapKind::from_keyword(command) {
            let (_, filename) = split_map_options(&args, line_num, command)?;
            return Ok(Some(Directive::TextureMap(kind, filename)));
        }

        let directive = match command {
            "newmtl" => Directive::NewMaterial(rest_of_line(&args, line_num, command)?),
            "illum" => Directive::Illumination(parse_value(args.first().copied(), line_num, command)?),
            "d" => match args.as_slice() {
                ["-halo", factor, ..] => Directive::Dissolve {
                    halo: true,
                    factor: parse_value(Some(factor), line_num, command)?,
                },
                _ => Directive::Dissolve {
                    halo: false,
                    factor: parse_value(args.first().copied(), line_num, command)?,
                },
            },
            "Tr" => {
                // Transparency is inverted dissolve
                let transparency: f64 = parse_value(args.first().copied(), line_num, command)?;
                Directive::Dissolve {
                    halo: false,
                    factor: 1.0 - transparency,
                }
            }
            "Ns" => Directive::SpecularExponent(parse_value(args.first().copied(), line_num, command)?),
            "sharpness" => Directive::Sharpness(parse_value(args.first().copied(), line_num, command)?),
            "Ni" => Directive::OpticalDensity(parse_value(args.first().copied(), line_num, command)?),
            "refl" => {
                let (options, filename) = split_map_options(&args, line_num, command)?;
                let kind = options
                    .iter()
                    .find(|(name, _)| *name == "-type")
                    .and_then(|(_, values)| values.first())
                    .map_or(ReflectionType::Unknown, |value| ReflectionType::from_keyword(value));
                Directive::Reflection(kind, filename)
            }
            _ => {
                log::debug!("Line {}: skipping unsupported statement '{}'", line_num, command);
                return Ok(None);
            }
        };

        Ok(Some(directive))
    }

    /// `Ka r [g b]`, `Ka xyz x [y z]` or `Ka spectral file [factor]`
    ///
    /// A single component is repeated; exactly two is an error.
    fn parse_channel(
        kind: ChannelKind,
        args: &[&str],
        line_num: usize,
        command: &str,
    ) -> Result<Option<Directive>> {
        match args.first().copied() {
            Some("spectral") => {
                log::debug!("Line {}: spectral {} curves are not supported", line_num, command);
                Ok(None)
            }
            Some("xyz") => Ok(Some(Directive::ChannelXyz(
                kind,
                parse_triple(&args[1..], line_num, command)?,
            ))),
            _ => Ok(Some(Directive::ChannelRgb(
                kind,
                parse_triple(args, line_num, command)?,
            ))),
        }
    }
}

/// One value applies to all three components; two values are ambiguous
fn parse_triple(args: &[&str], line_num: usize, command: &str) -> Result<[f64; 3]> {
    match args.len() {
        0 | 1 => {
            let value = parse_value(args.first().copied(), line_num, command)?;
            Ok([value; 3])
        }
        2 => Err(BuildError::parse(
            line_num,
            format!("{command} needs one or three components, got two"),
        )),
        _ => parse_array::<3>(args, line_num, command),
    }
}

/// Number of arguments taken by a texture map option
fn option_arity(option: &str) -> (usize, usize) {
    match option {
        "-blendu" | "-blendv" | "-cc" | "-clamp" | "-bm" | "-boost" | "-texres" | "-imfchan"
        | "-type" => (1, 1),
        "-mm" => (2, 2),
        "-o" | "-s" | "-t" => (1, 3),
        _ => (0, 0),
    }
}

/// Split `-option value...` pairs from the trailing file name
///
/// The file name is the rest of the statement and may contain spaces.
fn split_map_options<'a>(
    args: &[&'a str],
    line_num: usize,
    command: &str,
) -> Result<(Vec<(&'a str, Vec<&'a str>)>, String)> {
    let mut options = Vec::new();
    let mut i = 0;

    while i < args.len() && args[i].starts_with('-') && args[i].parse::<f64>().is_err() {
        let option = args[i];
        let (min, max) = option_arity(option);
        i += 1;

        let mut values = Vec::new();
        while values.len() < max && i < args.len() {
            let numeric = args[i].parse::<f64>().is_ok();
            if values.len() >= min && !numeric {
                break;
            }
            values.push(args[i]);
            i += 1;
        }
        options.push((option, values));
    }

    if i >= args.len() {
        return Err(BuildError::parse(line_num, format!("{command} missing texture path")));
    }
    Ok((options, args[i..].join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_material() {
        let mtl_content = r#"
# Simple material
newmtl TestMaterial
Ka 1.0 1.0 1.0
Kd 0.8 0.2 0.2
Ks xyz 0.5
Ns 250.0
d -halo 0.6
illum 2
"#;

        let directives = MtlReader::parse(mtl_content).unwrap();
        assert_eq!(
            directives,
            vec![
                Directive::NewMaterial("TestMaterial".to_string()),
                Directive::ChannelRgb(ChannelKind::Ambient, [1.0, 1.0, 1.0]),
                Directive::ChannelRgb(ChannelKind::Diffuse, [0.8, 0.2, 0.2]),
                Directive::ChannelXyz(ChannelKind::Specular, [0.5, 0.5, 0.5]),
                Directive::SpecularExponent(250.0),
                Directive::Dissolve {
                    halo: true,
                    factor: 0.6
                },
                Directive::Illumination(2),
                Directive::EndMaterial,
            ]
        );
    }

    #[test]
    fn test_parse_material_with_textures() {
        let mtl_content = r#"
newmtl TexturedMaterial
map_Kd -s 2 2 1 -clamp on textures/diffuse map.png
map_Bump -bm 0.5 textures/normal.png
decal decal.tga
refl -type cube_top sky_top.png
sharpness 40
Ni 1.45
"#;

        let directives = MtlReader::parse(mtl_content).unwrap();
        assert_eq!(
            directives[1],
            Directive::TextureMap(TextureMapKind::Diffuse, "textures/diffuse map.png".to_string())
        );
        assert_eq!(
            directives[2],
            Directive::TextureMap(TextureMapKind::Bump, "textures/normal.png".to_string())
        );
        assert_eq!(
            directives[3],
            Directive::TextureMap(TextureMapKind::Decal, "decal.tga".to_string())
        );
        assert_eq!(
            directives[4],
            Directive::Reflection(ReflectionType::CubeTop, "sky_top.png".to_string())
        );
        assert_eq!(directives[5], Directive::Sharpness(40.0));
        assert_eq!(directives[6], Directive::OpticalDensity(1.45));
    }

    #[test]
    fn test_parse_transparency() {
        let directives = MtlReader::parse("newmtl Glass\nTr 0.25\n").unwrap();

        // Tr = 1.0 - d
        assert_eq!(
            directives[1],
            Directive::Dissolve {
                halo: false,
                factor: 0.75
            }
        );
    }

    #[test]
    fn test_statements_before_newmtl_are_kept() {
        let directives = MtlReader::parse("Kd 1 0 0\nnewmtl late\n").unwrap();
        assert_eq!(directives[0], Directive::ChannelRgb(ChannelKind::Diffuse, [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_skips_unsupported() {
        let directives = MtlReader::parse("newmtl m\nKe 1 1 1\nKa spectral ident.rfl\n").unwrap();
        assert_eq!(
            directives,
            vec![Directive::NewMaterial("m".to_string()), Directive::EndMaterial]
        );
    }

    #[test]
    fn test_channel_component_counts() {
        let directives = MtlReader::parse("newmtl m\nKa 0.3\nTf xyz 0.1 0.2 0.3\n").unwrap();
        assert_eq!(directives[1], Directive::ChannelRgb(ChannelKind::Ambient, [0.3, 0.3, 0.3]));
        assert_eq!(
            directives[2],
            Directive::ChannelXyz(ChannelKind::TransmissionFilter, [0.1, 0.2, 0.3])
        );

        let err = MtlReader::parse("newmtl m\nKa 0.1 0.2\n").unwrap_err();
        assert!(matches!(err, BuildError::Parse { line: 2, .. }));

        let err = MtlReader::parse("newmtl m\nKd xyz 0.1 0.2\n").unwrap_err();
        assert!(matches!(err, BuildError::Parse { line: 2, .. }));

        assert!(MtlReader::parse("newmtl m\nKs\n").is_err());
    }

    #[test]
    fn test_missing_texture_path() {
        let err = MtlReader::parse("newmtl m\nmap_Kd -clamp on\n").unwrap_err();
        assert!(matches!(err, BuildError::Parse { line: 2, .. }));
    }
}
