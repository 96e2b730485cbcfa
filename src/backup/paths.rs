//! Turning the directory strings of a job into absolute paths.

use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Expands `~`, anchors relative paths at `base` and canonicalizes when the
/// path exists. Paths that do not exist yet are normalized lexically.
pub fn resolve_dir<P: AsRef<Path>>(base: P, raw: &str) -> Result<PathBuf> {
    let expanded = expand_home(raw)?;
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        base.as_ref().join(expanded)
    };

    match joined.canonicalize() {
        Ok(p) => Ok(p),
        Err(_) => Ok(normalize(&joined)),
    }
}

fn expand_home(raw: &str) -> Result<PathBuf> {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return Ok(PathBuf::from(raw)),
    };

    let home = dirs::home_dir().ok_or_else(|| Error::NoHomeDir(raw.to_string()))?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Renders a directory the way rsync expects it to copy contents: exactly one
/// trailing `/`. The bytes of the path are kept as they are.
pub fn with_trailing_slash<P: AsRef<Path>>(path: P) -> OsString {
    let mut s = path
        .as_ref()
        .components()
        .collect::<PathBuf>()
        .into_os_string();
    if !s.as_encoded_bytes().ends_with(b"/") {
        s.push("/");
    }
    s
}

pub fn ensure_source_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        debug!("Source directory does not exist or is not a directory: {:?}", path);
        return Err(Error::SourceDirMissing(path.to_path_buf()));
    }

    Ok(())
}

pub fn ensure_destination_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    info!("Creating destination directory {:?}", path);
    std::fs::create_dir_all(path).map_err(|source| Error::DestinationDirUncreatable {
        path: path.to_path_buf(),
        source,
    })
}
