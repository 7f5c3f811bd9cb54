use std::path::PathBuf;

/// Whether a [`SkeletonEntry`] becomes a directory or a zero-byte file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    File,
}

/// A single directory or file staged for creation under the target root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonEntry {
    /// Path relative to the source root, and equally to the target root.
    pub relative: PathBuf,
    pub kind: EntryKind,
}
impl SkeletonEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// The planned layout of an empty copy: every entry that will be created beneath
/// `target`, in walk order (a directory always precedes its contents).
///
/// Nothing is written to disk until the skeleton is handed to
/// [`crate::replicate::apply`].
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub source: PathBuf,
    pub target: PathBuf,
    pub entries: Vec<SkeletonEntry>,
}
impl Skeleton {
    pub fn new(source: PathBuf, target: PathBuf) -> Self {
        Self {
            source,
            target,
            entries: Vec::new(),
        }
    }

    pub fn dirs(&self) -> impl Iterator<Item = &SkeletonEntry> {
        self.entries.iter().filter(|e| !e.is_file())
    }

    pub fn files(&self) -> impl Iterator<Item = &SkeletonEntry> {
        self.entries.iter().filter(|e| e.is_file())
    }
}
