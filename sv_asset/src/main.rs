pub(crate) mod mesh;
pub(crate) mod utils;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use mesh::obj;
use std::{
    fs,
    path::{Path, PathBuf},
};
use structopt::StructOpt;
use walkdir::WalkDir;

/// Cooks every Wavefront model below a folder into mesh packages.
#[derive(StructOpt, Debug)]
#[structopt(name = "sv_asset")]
struct Options {
    /// Folder holding the models and their materials
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    /// Folder receiving the cooked packages, mirroring the input layout
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: PathBuf,
    /// Log every file that is looked at
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

#[derive(thiserror::Error, Debug)]
enum SetupError {
    #[error("No model folder at {0}")]
    MissingInput(PathBuf),
    #[error("Cannot create {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Model,
    /// Read while cooking the model that references it.
    Companion,
    Unknown,
}

impl AssetKind {
    fn of(path: &Path) -> Self {
        let extension = match path.extension().and_then(|x| x.to_str()) {
            Some(extension) => extension.to_ascii_lowercase(),
            None => return Self::Unknown,
        };
        match extension.as_str() {
            "obj" => Self::Model,
            "toml" | "mtl" | "png" | "jpg" | "jpeg" | "tga" | "bmp" => Self::Companion,
            _ => Self::Unknown,
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let options = Options::from_args();
    init_logger(options.verbose);

    cook_folder(&options.input, &options.output)
        .map(|count| info!("Cooked {} models into {}", count, options.output.display()))
        .map_err(|err| {
            error!("{:#}", err);
            err
        })
}

// mirrors the folder of `source` below `output` and returns it
fn target_folder(source: &Path, input: &Path, output: &Path) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(input)
        .with_context(|| format!("{} is outside of {}", source.display(), input.display()))?;
    let folder = match relative.parent() {
        Some(parent) => output.join(parent),
        None => output.to_path_buf(),
    };

    if !folder.is_dir() {
        fs::create_dir_all(&folder).map_err(|source| SetupError::OutputFolder {
            path: folder.clone(),
            source,
        })?;
    }
    Ok(folder)
}

fn cook_folder(input: &Path, output: &Path) -> Result<usize> {
    if !input.is_dir() {
        return Err(SetupError::MissingInput(input.to_path_buf()).into());
    }

    let mut count = 0;
    for entry in WalkDir::new(input) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Cannot visit entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }

        let source = entry.path();
        match AssetKind::of(source) {
            AssetKind::Model => {
                let folder = target_folder(source, input, output)?;
                let written = obj::process(source, &folder)?;
                debug!("Wrote {}", written.display());
                count += 1;
            }
            AssetKind::Companion => debug!("Companion file: {}", source.display()),
            AssetKind::Unknown => warn!("Not an asset: {}", source.display()),
        }
    }

    Ok(count)
}
