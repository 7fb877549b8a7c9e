//! OBJ line reader
//!
//! Turns Wavefront .obj text into [`Directive`]s. Only the polygonal subset is
//! understood; free-form geometry statements are skipped.

use std::str::FromStr;

use crate::builder::RawCorner;
use crate::directive::Directive;
use crate::{BuildError, Result};

/// OBJ text reader
pub struct ObjReader;

impl ObjReader {
    /// Parse OBJ file contents into directives
    ///
    /// # Arguments
    /// * `contents` - The text contents of the OBJ file
    ///
    /// # Returns
    /// Directives in statement order
    pub fn parse(contents: &str) -> Result<Vec<Directive>> {
        let mut directives = Vec::new();
        let mut pending = String::new();
        let mut pending_start = 0;

        for (line_num, line) in contents.lines().enumerate() {
            let line = strip_comment(line).trim_end();

            // A trailing backslash continues the statement on the next line
            if let Some(head) = line.strip_suffix('\\') {
                if pending.is_empty() {
                    pending_start = line_num + 1;
                }
                pending.push_str(head);
                pending.push(' ');
                continue;
            }

            let (statement, statement_line) = if pending.is_empty() {
                (line.to_string(), line_num + 1)
            } else {
                pending.push_str(line);
                (std::mem::take(&mut pending), pending_start)
            };

            if let Some(directive) = Self::parse_statement(&statement, statement_line)? {
                directives.push(directive);
            }
        }

        if !pending.is_empty() {
            if let Some(directive) = Self::parse_statement(&pending, pending_start)? {
                directives.push(directive);
            }
        }

        Ok(directives)
    }

    /// Parse a single statement; `None` for blank lines and skipped keywords
    pub fn parse_statement(statement: &str, line_num: usize) -> Result<Option<Directive>> {
        let mut tokens = statement.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();

        let directive = match command {
            "v" => {
                // Optional w is ignored
                let [x, y, z] = parse_array::<3>(&args, line_num, command)?;
                Directive::Position([x, y, z])
            }
            "vt" => {
                let u = parse_value(args.first().copied(), line_num, command)?;
                let v = args
                    .get(1)
                    .copied()
                    .map(|token| parse_value(Some(token), line_num, command))
                    .transpose()?
                    .unwrap_or(0.0);
                Directive::TexCoord([u, v])
            }
            "vn" => Directive::Normal(parse_array::<3>(&args, line_num, command)?),
            "f" | "fo" => Directive::Face(
                args.iter()
                    .map(|token| parse_corner(token, line_num))
                    .collect::<Result<_>>()?,
            ),
            "p" => Directive::Points(parse_indices(&args, line_num, command)?),
            "l" => Directive::Line(parse_indices(&args, line_num, command)?),
            "o" => Directive::ObjectName(rest_of_line(&args, line_num, command)?),
            "g" => Directive::Groups(if args.is_empty() {
                None
            } else {
                Some(args.iter().map(|name| (*name).to_string()).collect())
            }),
            "s" => {
                let id = match args.first().copied() {
                    Some("off") => 0,
                    token => parse_value(token, line_num, command)?,
                };
                Directive::SmoothingGroup(id)
            }
            "mtllib" => Directive::MaterialLib(names(&args, line_num, command)?),
            "maplib" => Directive::MapLib(names(&args, line_num, command)?),
            "usemtl" => Directive::UseMaterial(rest_of_line(&args, line_num, command)?),
            "usemap" => Directive::UseMap(rest_of_line(&args, line_num, command)?),
            _ => {
                log::debug!("Line {}: skipping unsupported statement '{}'", line_num, command);
                return Ok(None);
            }
        };

        Ok(Some(directive))
    }
}

/// Drop everything from the first `#`
pub(crate) fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(head, _)| head)
}

/// Parse one value
pub(crate) fn parse_value<T: FromStr>(token: Option<&str>, line_num: usize, command: &str) -> Result<T> {
    let token = token.ok_or_else(|| BuildError::parse(line_num, format!("{command} missing value")))?;
    token
        .parse::<T>()
        .map_err(|_| BuildError::parse(line_num, format!("{command} invalid value '{token}'")))
}

/// Parse the first `N` values; extra values are ignored
pub(crate) fn parse_array<const N: usize>(args: &[&str], line_num: usize, command: &str) -> Result<[f64; N]> {
    let mut values = [0.0; N];
    for (i, value) in values.iter_mut().enumerate() {
        *value = parse_value(args.get(i).copied(), line_num, command)?;
    }
    Ok(values)
}

fn parse_indices(args: &[&str], line_num: usize, command: &str) -> Result<Vec<i64>> {
    args.iter()
        .map(|token| {
            // Line elements may carry a texture index: "v/vt"
            let position = token.split('/').next();
            parse_value(position, line_num, command)
        })
        .collect()
}

/// Parse `v`, `v/vt`, `v//vn` or `v/vt/vn`
fn parse_corner(token: &str, line_num: usize) -> Result<RawCorner> {
    let mut parts = token.split('/');
    let position = parse_value(parts.next(), line_num, "f")?;

    let optional = |part: Option<&str>| -> Result<Option<i64>> {
        match part {
            None | Some("") => Ok(None),
            Some(index) => parse_value(Some(index), line_num, "f").map(Some),
        }
    };
    let texture = optional(parts.next())?;
    let normal = optional(parts.next())?;

    Ok(RawCorner::new(position, texture, normal))
}

fn names(args: &[&str], line_num: usize, command: &str) -> Result<Vec<String>> {
    if args.is_empty() {
        return Err(BuildError::parse(line_num, format!("{command} missing file name")));
    }
    Ok(args.iter().map(|name| (*name).to_string()).collect())
}

/// Names may contain spaces; take the rest of the statement
pub(crate) fn rest_of_line(args: &[&str], line_num: usize, command: &str) -> Result<String> {
    if args.is_empty() {
        return Err(BuildError::parse(line_num, format!("{command} missing name")));
    }
    Ok(args.join(" "))
}
