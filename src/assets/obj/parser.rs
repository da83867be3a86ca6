use std::fs;
use std::io::{self, BufRead};
use std::{num, path::Path};

use gfx_maths::*;
use log::{debug, warn};

use super::builder::*;

#[derive(thiserror::Error, Debug)]
pub enum ParserError {
    #[error("Failed to parse float.")]
    ParseFloat(#[from] num::ParseFloatError),
    #[error("Failed to parse integer.")]
    ParseInt(#[from] num::ParseIntError),
    #[error("Failed to read model.")]
    Io(#[from] io::Error),
    #[error("Failed to parse face.")]
    ParseFace,
    #[error("Expected {expected} values, found {found}.")]
    MissingValues { expected: usize, found: usize },
    #[error("Index {index} is out of range 1..={len}.")]
    IndexOutOfRange { index: usize, len: usize },
}

// parses wavefront obj (https://en.wikipedia.org/wiki/Wavefront_.obj_file)
// the implementation is very forgiving: broken records are logged and skipped
pub(crate) fn parse(filepath: &Path, builder: &mut ObjMeshBuilder) -> Result<(), ParserError> {
    let lines = read_lines(filepath)?;
    log::info!("Loading mesh: {}", filepath.display());

    for (number, line) in lines.enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!(
                    "Skipping line {}:{}: {}",
                    filepath.display(),
                    number + 1,
                    err
                );
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!("Parsing: \"{}\"", line);

        let (token, value) = line
            .split_once(char::is_whitespace)
            .map(|(token, value)| (token, value.trim()))
            .unwrap_or((line, ""));

        if let Err(err) = parse_token(token, value, builder) {
            warn!(
                "Skipping `{}` record at {}:{}: {}",
                token,
                filepath.display(),
                number + 1,
                err
            );
        }
    }

    Ok(())
}

pub(crate) fn parse_token(
    token: &str,
    value: &str,
    builder: &mut ObjMeshBuilder,
) -> Result<(), ParserError> {
    match token {
        // comment
        "#" => debug!("Comment: {:?}", value),
        // material library, resolved relative to the model
        "mtllib" => builder.set_material_library(value.split_whitespace().next().unwrap_or("")),
        // active material
        "usemtl" => builder.use_material(value.split_whitespace().next().unwrap_or("")),
        // vertex; the tables must stay aligned with the file, so a broken record still takes its slot
        "v" => builder.push_position(parse_vec3(value).unwrap_or_else(|err| {
            warn!("Invalid vertex \"{}\": {}", value, err);
            Vec3::zero()
        })),
        // texture coordinates
        "vt" => builder.push_uv(parse_vec2(value).unwrap_or_else(|err| {
            warn!("Invalid texture coordinate \"{}\": {}", value, err);
            Vec2::zero()
        })),
        // vertex normals
        "vn" => builder.push_normal(parse_vec3(value).unwrap_or_else(|err| {
            warn!("Invalid normal \"{}\": {}", value, err);
            Vec3::zero()
        })),
        "f" => builder.push_face(&parse_face(value))?,
        _ => debug!("Ignoring token: \"{}\"", token),
    };

    Ok(())
}

fn parse_vec3(value: &str) -> Result<Vec3, ParserError> {
    let numbers = parse_numbers(value, 3)?;
    Ok(Vec3::new(numbers[0], numbers[1], numbers[2]))
}

fn parse_vec2(value: &str) -> Result<Vec2, ParserError> {
    let numbers = parse_numbers(value, 2)?;
    Ok(Vec2::new(numbers[0], numbers[1]))
}

// parses at least `count` numbers seperated by whitespace
fn parse_numbers(value: &str, count: usize) -> Result<Vec<f32>, ParserError> {
    let numbers = value
        .split_whitespace()
        .map(|x| x.parse())
        .collect::<Result<Vec<f32>, _>>()?;

    if numbers.len() < count {
        return Err(ParserError::MissingValues {
            expected: count,
            found: numbers.len(),
        });
    }

    Ok(numbers)
}

// parses face indexes seperated by whitespace; broken references are dropped
pub(crate) fn parse_face(value: &str) -> ObjFace {
    let face_i = value
        .split_whitespace()
        .filter_map(|reference| match parse_face_index(reference) {
            Ok(index) => Some(index),
            Err(err) => {
                warn!("Invalid face vertex \"{}\": {}", reference, err);
                None
            }
        })
        .collect();

    ObjFace { face_i }
}

// parses a single face index of the form `v[/vt][/vn]`
fn parse_face_index(value: &str) -> Result<ObjFaceIndex, ParserError> {
    let triplet = parse_triplet(value)?;

    Ok(ObjFaceIndex {
        vert_i: triplet[0].ok_or(ParserError::ParseFace)?,
        uv_i: triplet[1],
        normal_i: triplet[2],
    })
}

// parse a triplet seperated by slashes; empty, zero and unparsable texture or
// normal fields count as absent, an unparsable position is an error
fn parse_triplet(value: &str) -> Result<[Option<usize>; 3], num::ParseIntError> {
    let mut ret = [None; 3];

    for (i, (a, b)) in ret.iter_mut().zip(value.split('/')).enumerate() {
        if b.is_empty() {
            continue;
        }

        *a = match b.parse::<usize>() {
            Ok(0) if i > 0 => None,
            Ok(index) => Some(index),
            Err(err) if i == 0 => return Err(err),
            Err(err) => {
                debug!("Ignoring attribute index \"{}\": {}", b, err);
                None
            }
        };
    }

    Ok(ret)
}

// The output is wrapped in a Result to allow matching on errors
// Returns an Iterator to the Reader of the lines of the file.
fn read_lines<P>(filename: P) -> io::Result<io::Lines<io::BufReader<fs::File>>>
where
    P: AsRef<Path>,
{
    let file = fs::File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assets::obj::meta::ObjMeta;
    use crate::texture::NoTextures;
    use std::num::ParseIntError;

    #[test]
    fn test_parse_token() -> Result<(), ParserError> {
        let mut decoder = NoTextures;
        let mut builder = ObjMeshBuilder::new(Path::new("."), ObjMeta::default(), &mut decoder);

        parse_token("o", "foo bar", &mut builder)?;
        parse_token("v", "1 2 3", &mut builder)?;
        parse_token("v", "4 5 6", &mut builder)?;
        parse_token("v", "7 8", &mut builder)?;
        parse_token("vt", "0.5 0.25", &mut builder)?;
        parse_token("vn", "0 0 1", &mut builder)?;
        parse_token("f", "1/1/1 2/1/1 3/1/1", &mut builder)?;

        assert_eq!(
            builder.positions(),
            &[
                Vec3::new(1.0, 2.0, 3.0),
                Vec3::new(4.0, 5.0, 6.0),
                Vec3::zero(),
            ]
        );
        assert_eq!(builder.uvs(), &[Vec2::new(0.5, 0.25)]);
        assert_eq!(builder.normals(), &[Vec3::new(0.0, 0.0, 1.0)]);

        let faces = builder.finish();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].vertices.len(), 3);

        Ok(())
    }

    #[test]
    fn test_empty_face_is_an_error() {
        let mut decoder = NoTextures;
        let mut builder = ObjMeshBuilder::new(Path::new("."), ObjMeta::default(), &mut decoder);

        assert!(matches!(
            parse_token("f", "", &mut builder),
            Err(ParserError::ParseFace)
        ));
        assert!(builder.finish().is_empty());
    }

    #[test]
    fn test_parse_vec() -> Result<(), ParserError> {
        assert_eq!(parse_vec3("1 1 1 1")?, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(parse_vec2("0.5   0.75 0")?, Vec2::new(0.5, 0.75));
        assert!(matches!(
            parse_vec3("1 2"),
            Err(ParserError::MissingValues {
                expected: 3,
                found: 2
            })
        ));
        assert!(parse_vec3("1 x 2").is_err());
        Ok(())
    }

    #[test]
    fn test_parse_face() {
        assert_eq!(
            parse_face("1 2/2 3/2/1 5//2"),
            ObjFace {
                face_i: vec![
                    ObjFaceIndex {
                        vert_i: 1,
                        ..ObjFaceIndex::default()
                    },
                    ObjFaceIndex {
                        vert_i: 2,
                        uv_i: Some(2),
                        ..ObjFaceIndex::default()
                    },
                    ObjFaceIndex {
                        vert_i: 3,
                        uv_i: Some(2),
                        normal_i: Some(1),
                    },
                    ObjFaceIndex {
                        vert_i: 5,
                        normal_i: Some(2),
                        ..ObjFaceIndex::default()
                    }
                ]
            }
        );
    }

    #[test]
    fn test_parse_face_skips_broken_references() {
        let face = parse_face("1 x/1 /2 -3 4");
        let positions: Vec<usize> = face.face_i.iter().map(|f| f.vert_i).collect();
        assert_eq!(positions, vec![1, 4]);
    }

    #[test]
    fn test_usemtl_takes_first_token() -> Result<(), ParserError> {
        let mut decoder = NoTextures;
        let mut builder = ObjMeshBuilder::new(Path::new("."), ObjMeta::default(), &mut decoder);

        parse_token("v", "0 0 0", &mut builder)?;
        parse_token("v", "1 0 0", &mut builder)?;
        parse_token("v", "1 1 0", &mut builder)?;
        parse_token("usemtl", "Red  # painted", &mut builder)?;
        parse_token("f", "1 2 3", &mut builder)?;

        let faces = builder.finish();
        assert_eq!(faces[0].material.name, "Red");
        Ok(())
    }

    #[test]
    fn test_undecodable_line_is_skipped() -> Result<(), ParserError> {
        let dir = std::env::temp_dir().join("scene_viewer_parser_latin1");
        fs::create_dir_all(&dir)?;
        let path = dir.join("quad.obj");
        fs::write(
            &path,
            b"# caf\xe9 quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )?;

        let mut decoder = NoTextures;
        let mut builder = ObjMeshBuilder::new(&dir, ObjMeta::default(), &mut decoder);
        parse(&path, &mut builder)?;

        assert_eq!(builder.positions().len(), 4);
        let faces = builder.finish();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].vertices.len(), 4);
        Ok(())
    }

    #[test]
    fn test_parse_triplet() -> Result<(), ParseIntError> {
        assert_eq!(parse_triplet("1")?, [Some(1), None, None]);
        assert_eq!(parse_triplet("1/3")?, [Some(1), Some(3), None]);
        assert_eq!(parse_triplet("1/2/3")?, [Some(1), Some(2), Some(3)]);
        assert_eq!(parse_triplet("1//3")?, [Some(1), None, Some(3)]);
        assert_eq!(parse_triplet("1/0/x")?, [Some(1), None, None]);
        assert!(parse_triplet("a/1/1").is_err());

        Ok(())
    }
}
