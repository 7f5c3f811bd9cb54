use crate::{
    errors::{FileOperation, IoError},
    skeleton::{EntryKind, Skeleton, SkeletonEntry},
    utils::{default_target, DEFAULT_PREFIX},
};
use miette::Diagnostic;
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error, Diagnostic)]
pub enum ReplicationError {
    #[error("Source directory not found: '{path}'")]
    #[diagnostic(
        code(emptycopy::replicate::source_not_found),
        help("Make sure the source path exists")
    )]
    SourceNotFound { path: PathBuf },

    #[error("Source is not a directory: '{path}'")]
    #[diagnostic(
        code(emptycopy::replicate::source_not_a_directory),
        help("Only directories can be replicated")
    )]
    SourceNotADirectory { path: PathBuf },

    #[error("Unable to derive a default target for '{path}'")]
    #[diagnostic(
        code(emptycopy::replicate::no_default_target),
        help("Pass the target directory explicitly")
    )]
    NoDefaultTarget { path: PathBuf },

    #[error("I/O error within replicate domain")]
    #[diagnostic(code(emptycopy::replicate::io))]
    Filesystem(#[from] IoError),
}

/// Inputs of a single replication run.
#[derive(Debug, Clone)]
pub struct ReplicateOptions {
    pub source: PathBuf,
    /// Defaults to `<parent of source>/<prefix><source name>` when `None`.
    pub target: Option<PathBuf>,
    /// Levels below the source that are replicated; `None` means unlimited.
    pub depth_limit: Option<usize>,
    pub prefix: String,
}
impl ReplicateOptions {
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        Self {
            source: source.into(),
            target: None,
            depth_limit: None,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_target<P: Into<PathBuf>>(mut self, target: Option<P>) -> Self {
        self.target = target.map(Into::into);
        self
    }

    pub fn with_depth_limit(mut self, depth_limit: Option<usize>) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Counts of what a run newly created beneath the target root (the root itself excluded).
/// Directories and empty files that were already in place are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub dirs_created: usize,
    pub files_created: usize,
}
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} directories, {} empty files",
            self.dirs_created, self.files_created
        )
    }
}

/// Checks that `source` exists and is a directory, returning its canonical form.
fn validate_source(source: &Path) -> Result<PathBuf, ReplicationError> {
    let metadata = match fs::metadata(source) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(ReplicationError::SourceNotFound {
                path: source.to_path_buf(),
            })
        }
        Err(error) => Err(IoError::new(
            FileOperation::ReadDir,
            source.to_path_buf(),
            error,
        ))?,
    };

    if !metadata.is_dir() {
        return Err(ReplicationError::SourceNotADirectory {
            path: source.to_path_buf(),
        });
    }

    let canonical = fs::canonicalize(source)
        .map_err(|error| IoError::new(FileOperation::ReadDir, source.to_path_buf(), error))?;

    Ok(canonical)
}

/// Symlinks are never descended into; one that resolves to a directory still
/// becomes an (empty) directory.
fn entry_kind(entry: &DirEntry) -> EntryKind {
    if entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir()) {
        EntryKind::Dir
    } else {
        EntryKind::File
    }
}

/// Walks `options.source` and stages every entry within the depth limit into a
/// [`Skeleton`] without touching the filesystem.
///
/// The walk is iterative (walkdir keeps its own stack of open directories), visits
/// siblings in file-name order and never descends below `depth_limit`. A directory
/// sitting exactly at the limit is staged, but its children are not.
///
/// # Errors
///
/// Returns a [`ReplicationError`] if:
///
/// - The source does not exist or is not a directory.
/// - No target was given and none can be derived from the source name.
/// - A directory of the source tree cannot be read.
pub fn plan(options: &ReplicateOptions) -> Result<Skeleton, ReplicationError> {
    let source = validate_source(&options.source)?;

    let target = match &options.target {
        Some(target) => target.clone(),
        // named after the path as typed; the resolved path only when that has no name (`.`)
        None => default_target(&options.source, &options.prefix)
            .or_else(|| default_target(&source, &options.prefix))
            .ok_or_else(|| ReplicationError::NoDefaultTarget {
                path: source.clone(),
            })?,
    };

    log::debug!(
        "planning skeleton of {} into {}",
        source.display(),
        target.display()
    );

    // a target nested inside the source must not be copied into itself on reruns
    let existing_target = fs::canonicalize(&target).ok();

    let mut walker = WalkDir::new(&source).sort_by_file_name();
    if let Some(limit) = options.depth_limit {
        walker = walker.max_depth(limit);
    }

    let mut skeleton = Skeleton::new(source.clone(), target);

    let entries = walker.into_iter().filter_entry(|entry| {
        existing_target
            .as_deref()
            .map_or(true, |existing| entry.path() != existing)
    });

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(error) => {
                let path = error
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| source.clone());

                Err(IoError::new(FileOperation::ReadDir, path, error.into()))?
            }
        };

        // the root maps onto the target as a whole
        if entry.depth() == 0 {
            continue;
        }

        let relative = match entry.path().strip_prefix(&source) {
            Ok(r) => r.to_path_buf(),
            Err(error) => Err(IoError::new(
                FileOperation::ReadDir,
                entry.path().to_path_buf(),
                io::Error::other(error),
            ))?,
        };

        let kind = entry_kind(&entry);

        log::debug!("staging {:?} {}", kind, relative.display());

        skeleton.entries.push(SkeletonEntry { relative, kind });
    }

    Ok(skeleton)
}

/// Creates the target root and every staged entry of `skeleton`, directories first.
///
/// Existing directories and existing zero-byte files are reused. Anything else in the way
/// (a non-empty file, a file where a directory belongs, or the reverse) aborts the run and
/// is left untouched. Entries created before a failure are left on disk.
///
/// # Errors
///
/// Returns [`ReplicationError::Filesystem`] for the first directory or file that cannot be
/// created.
pub fn apply(skeleton: &Skeleton) -> Result<Report, ReplicationError> {
    let mut report = Report::default();

    create_directory(&skeleton.target)?;

    for entry in skeleton.dirs() {
        if create_directory(&skeleton.target.join(&entry.relative))? {
            report.dirs_created += 1;
        }
    }

    for entry in skeleton.files() {
        if create_empty_file(&skeleton.target.join(&entry.relative))? {
            report.files_created += 1;
        }
    }

    Ok(report)
}

/// Replicates `source` into `target` (or its default sibling) with every file emptied.
///
/// # Errors
///
/// See [`plan`] and [`apply`].
pub fn replicate(
    source: &Path,
    target: Option<&Path>,
    depth_limit: Option<usize>,
) -> Result<(), ReplicationError> {
    let options = ReplicateOptions::new(source)
        .with_target(target)
        .with_depth_limit(depth_limit);

    replicate_with(&options)?;

    Ok(())
}

/// Like [`replicate`], but driven by [`ReplicateOptions`] and reporting what was created.
pub fn replicate_with(options: &ReplicateOptions) -> Result<Report, ReplicationError> {
    let skeleton = plan(options)?;

    let report = apply(&skeleton)?;

    log::info!("{} created in {}", report, skeleton.target.display());

    Ok(report)
}

/// Returns `false` when the directory was already there.
fn create_directory(path: &Path) -> Result<bool, ReplicationError> {
    if path.is_dir() {
        log::debug!("reuse dir {}", path.display());
        return Ok(false);
    }

    fs::create_dir_all(path)
        .map_err(|error| IoError::new(FileOperation::Mkdir, path.into(), error))?;

    log::debug!("create dir {}", path.display());

    Ok(true)
}

/// Never truncates: an existing zero-byte file is reused (returning `false`), anything
/// else already at `path` is an error.
fn create_empty_file(path: &Path) -> Result<bool, ReplicationError> {
    let error = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(_) => {
            log::debug!("create file {}", path.display());
            return Ok(true);
        }
        Err(error) => error,
    };

    if error.kind() != io::ErrorKind::AlreadyExists {
        return Err(IoError::new(FileOperation::CreateFile, path.into(), error).into());
    }

    let cause = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() && metadata.len() == 0 => {
            log::debug!("reuse file {}", path.display());
            return Ok(false);
        }
        Ok(metadata) if metadata.is_file() => io::Error::new(
            io::ErrorKind::AlreadyExists,
            "refusing to overwrite a non-empty file",
        ),
        Ok(_) => error,
        Err(metadata_error) => metadata_error,
    };

    Err(IoError::new(FileOperation::CreateFile, path.into(), cause).into())
}
