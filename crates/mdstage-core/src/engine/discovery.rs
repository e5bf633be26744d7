//! Discovery of relaxed systems ready for production.
//!
//! A system directory is any directory, at any depth below the root, holding the four
//! production inputs next to each other plus the relaxed structure in `finalOutput/`.
//! Everything else is skipped without complaint: the relaxation tree contains plenty
//! of directories that were never meant to qualify. Unreadable directories below the
//! root are skipped with a warning; a qualifying directory whose listing fails is an
//! error, since its topology fragments would go missing.

use super::error::EngineError;
use crate::core::files::{self, FileResult};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use walkdir::WalkDir;

/// Files that must sit directly inside a system directory.
pub const REQUIRED_INPUTS: [&str; 4] = ["prod.mdp", "topol.top", "index.ndx", "topol.tpr"];
/// Subdirectory holding the relaxed structure.
pub const FINAL_OUTPUT_DIR: &str = "finalOutput";
/// The relaxed structure production starts from.
pub const FINAL_CONFIGURATION: &str = "confout.gro";
/// Extension of topology fragments copied alongside the inputs.
pub const FRAGMENT_EXTENSION: &str = "itp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDescriptor {
    pub name: String,
    pub dir: PathBuf,
    pub final_configuration: PathBuf,
    pub fragments: Vec<PathBuf>,
}

impl SystemDescriptor {
    pub fn required_inputs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        REQUIRED_INPUTS.iter().map(|name| self.dir.join(name))
    }

    /// Every file a replica directory receives, in copy order.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        self.required_inputs()
            .chain(std::iter::once(self.final_configuration.clone()))
            .chain(self.fragments.iter().cloned())
            .collect()
    }
}

/// Read-only view of the filesystem used to qualify a directory.
pub trait FileProbe {
    fn is_file(&self, path: &Path) -> bool;

    /// Regular files directly inside `dir`, sorted by name.
    fn files_in(&self, dir: &Path) -> FileResult<Vec<PathBuf>>;
}

/// [`FileProbe`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn files_in(&self, dir: &Path) -> FileResult<Vec<PathBuf>> {
        Ok(files::list_dir(dir)?
            .into_iter()
            .filter(|path| path.is_file())
            .collect())
    }
}

fn is_fragment(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == FRAGMENT_EXTENSION)
}

/// Decides whether `dir` is a system directory.
///
/// # Return
///
/// The descriptor when all [`REQUIRED_INPUTS`] and the final configuration are present,
/// `None` otherwise.
///
/// # Errors
///
/// Returns [`EngineError::File`] if a qualifying directory cannot be listed.
pub fn assess<P: FileProbe + ?Sized>(
    dir: &Path,
    probe: &P,
) -> Result<Option<SystemDescriptor>, EngineError> {
    let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Ok(None);
    };

    if let Some(missing) = REQUIRED_INPUTS
        .iter()
        .find(|file| !probe.is_file(&dir.join(file)))
    {
        trace!("Skipping {:?}: missing {}", dir, missing);
        return Ok(None);
    }

    let final_configuration = dir.join(FINAL_OUTPUT_DIR).join(FINAL_CONFIGURATION);
    if !probe.is_file(&final_configuration) {
        trace!("Skipping {:?}: no {}/{}", dir, FINAL_OUTPUT_DIR, FINAL_CONFIGURATION);
        return Ok(None);
    }

    let fragments = probe
        .files_in(dir)?
        .into_iter()
        .filter(|path| is_fragment(path))
        .collect();

    Ok(Some(SystemDescriptor {
        name,
        dir: dir.to_path_buf(),
        final_configuration,
        fragments,
    }))
}

/// Walks every directory below `root` (sorted, symlinks not followed) and yields the
/// qualifying ones lazily. Directories listed in `exclude` are pruned with their
/// subtrees. A walk error on `root` itself is yielded; deeper ones are logged and
/// skipped.
pub fn discover_systems<'a>(
    root: &Path,
    exclude: &'a [PathBuf],
) -> impl Iterator<Item = Result<SystemDescriptor, EngineError>> + 'a {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| !exclude.iter().any(|ex| ex == entry.path()))
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => assess(entry.path(), &FsProbe).transpose(),
            Ok(_) => None,
            Err(e) if e.depth() == 0 => Some(Err(EngineError::from(e))),
            Err(e) => {
                warn!("Skipping unreadable entry during discovery: {}", e);
                None
            }
        })
}
