use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Prefix put in front of the source's name when no target is given.
pub const DEFAULT_PREFIX: &str = "empty_";

/// Derives the sibling directory that receives the skeleton of `source` when the caller
/// does not name a target.
///
/// For `/data/photos` and the prefix `empty_` this is `/data/empty_photos`.
/// Returns `None` when `source` has no final component (`/`, or a path ending in `..`),
/// so callers should hand in a canonicalized path.
pub fn default_target(source: &Path, prefix: &str) -> Option<PathBuf> {
    let name = source.file_name()?;

    let mut target_name = OsString::from(prefix);
    target_name.push(name);

    let parent = source.parent().unwrap_or_else(|| Path::new(""));

    Some(parent.join(target_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_a_prefixed_sibling() {
        let target = default_target(Path::new("/data/photos"), DEFAULT_PREFIX);

        assert_eq!(target, Some(PathBuf::from("/data/empty_photos")));
    }

    #[test]
    fn default_target_ignores_trailing_separator() {
        let target = default_target(Path::new("/data/photos/"), DEFAULT_PREFIX);

        assert_eq!(target, Some(PathBuf::from("/data/empty_photos")));
    }

    #[test]
    fn default_target_of_bare_name_stays_relative() {
        let target = default_target(Path::new("photos"), "skel_");

        assert_eq!(target, Some(PathBuf::from("skel_photos")));
    }

    #[test]
    fn default_target_of_root_is_none() {
        assert_eq!(default_target(Path::new("/"), DEFAULT_PREFIX), None);
    }
}
