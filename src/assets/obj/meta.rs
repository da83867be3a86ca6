use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Import options of a model, read from `<model>.toml` or a folder scoped `obj.toml`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObjMeta {
    /// Negate the x, y and z axis of positions and normals.
    pub flip_axis: [bool; 3],
    /// Use `1 - v` for texture coordinates.
    pub flip_uv: bool,
}

impl ObjMeta {
    pub fn parse(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Could not read meta file: {}", path.display()))?;
        let meta: Self = toml::from_slice(&data)
            .with_context(|| format!("Invalid meta file: {}", path.display()))?;
        Ok(meta)
    }

    /// Meta of the file called `file.toml`, or alternatively the folder scoped
    /// meta file named `obj.toml`, or else the default meta.
    pub fn find(model: &Path) -> Result<Self> {
        let dir = model
            .parent()
            .with_context(|| format!("Path terminates in root or prefix: {}", model.display()))?;

        let own = model.with_extension("toml");
        if own.is_file() {
            return Self::parse(&own);
        }

        let folder = dir.join("obj.toml");
        if folder.is_file() {
            return Self::parse(&folder);
        }

        Ok(Self::default())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("scene_viewer_meta_{}", name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_partial_meta() -> Result<()> {
        let meta: ObjMeta = toml::from_str("flip_uv = true")?;
        assert_eq!(
            meta,
            ObjMeta {
                flip_axis: [false; 3],
                flip_uv: true
            }
        );
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(toml::from_str::<ObjMeta>("calculate_normals = true").is_err());
    }

    #[test]
    fn test_find_prefers_model_meta() -> Result<()> {
        let dir = temp_dir("find");
        fs::write(dir.join("obj.toml"), "flip_uv = true")?;
        fs::write(dir.join("crate.toml"), "flip_axis = [false, false, true]")?;

        assert_eq!(ObjMeta::find(&dir.join("crate.obj"))?.flip_axis, [false, false, true]);
        assert!(!ObjMeta::find(&dir.join("crate.obj"))?.flip_uv);
        assert!(ObjMeta::find(&dir.join("barrel.obj"))?.flip_uv);
        Ok(())
    }

    #[test]
    fn test_find_defaults() -> Result<()> {
        let dir = temp_dir("defaults");
        assert_eq!(ObjMeta::find(&dir.join("plain.obj"))?, ObjMeta::default());
        Ok(())
    }
}
