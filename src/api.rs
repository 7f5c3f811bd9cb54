use crate::{
    config::{ConfigError, Overrides, Settings},
    preview,
    replicate::{self, ReplicateOptions, Report},
};
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum EmptyCopyError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Replication(#[from] replicate::ReplicationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Resolves the settings of a run: built-in defaults, then the optional config file,
/// then command-line overrides.
///
/// # Errors
///
/// Returns a [`EmptyCopyError`] if the config file cannot be read or parsed.
pub fn load_settings(
    config: Option<&Path>,
    overrides: Overrides,
) -> Result<Settings, EmptyCopyError> {
    let base = match config {
        Some(path) => {
            log::debug!("loading settings from: {}", path.display());
            Settings::from_file(path)?
        }
        None => Settings::default(),
    };

    Ok(base.merge(overrides))
}

fn options(source: &Path, target: Option<&Path>, settings: &Settings) -> ReplicateOptions {
    ReplicateOptions::new(source)
        .with_target(target)
        .with_depth_limit(settings.depth)
        .with_prefix(settings.prefix.clone())
}

/// Recreates the directory layout of `source` under `target`, with every file empty.
///
/// # Errors
///
/// Returns a [`EmptyCopyError`] if:
///
/// - `source` does not exist or is not a directory.
/// - No target was given and none can be derived from `source`.
/// - A source directory cannot be read.
/// - A target directory or file cannot be created.
pub fn empty_copy(
    source: &Path,
    target: Option<&Path>,
    settings: &Settings,
) -> Result<Report, EmptyCopyError> {
    let report = replicate::replicate_with(&options(source, target, settings))?;

    Ok(report)
}

/// Prints the tree [`empty_copy`] would create, without creating it.
///
/// # Errors
///
/// Same validation and read failures as [`empty_copy`]; nothing is written.
pub fn dry_run(
    source: &Path,
    target: Option<&Path>,
    settings: &Settings,
) -> Result<(), EmptyCopyError> {
    let skeleton = replicate::plan(&options(source, target, settings))?;

    preview::preview_as_tree(&skeleton);

    Ok(())
}
