//! The transformation contract shared by both output strategies
//!
//! A [`Transformator`] is a live handle over exactly one output file and one
//! open output stream. It is created by the builder in an open state, mutated
//! by `add_file`/`add_path` calls, and released exactly once by `finish`,
//! which flushes and closes the stream. `finish` consumes the handle, so
//! adding input after finalization is impossible by construction.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SpliceError;

/// A stateful handle that accepts input RDF files and writes one output file
pub trait Transformator {
    /// Add a single input file to the output. The content type, if given,
    /// takes precedence over file-name-based format inference.
    fn add_file(&mut self, path: &Path, content_type: Option<&str>) -> Result<(), SpliceError>;

    /// The output file path; fixed at creation, valid at any point in the
    /// lifecycle
    fn output_file(&self) -> &Path;

    /// Flush and release the output stream
    fn finish(self: Box<Self>) -> Result<(), SpliceError>;

    /// Add a file or a directory tree. Directories are expanded recursively;
    /// the contained files are added without an explicit content type.
    fn add_path(&mut self, path: &Path, content_type: Option<&str>) -> Result<(), SpliceError> {
        if path.is_dir() {
            for file in collect_files(path)? {
                self.add_file(&file, None)?;
            }
            Ok(())
        } else {
            self.add_file(path, content_type)
        }
    }
}

/// Recursively collect the files of a directory tree
///
/// Entries are sorted lexicographically by name at every level so that the
/// traversal order, and with it the statement order of streamed output, is
/// deterministic across platforms. Symbolic links to directories are not
/// followed (guards against link cycles); links to regular files are.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, SpliceError> {
    let mut files = Vec::new();
    collect_into(dir, &mut files)?;
    Ok(files)
}

fn collect_into(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), SpliceError> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_into(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        } else if file_type.is_symlink() && path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_collect_files_sorted_and_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("b.nt")).unwrap();
        File::create(dir.path().join("a.nt")).unwrap();
        File::create(dir.path().join("sub").join("c.nt")).unwrap();

        let files = collect_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("a.nt"),
                dir.path().join("b.nt"),
                dir.path().join("sub").join("c.nt"),
            ]
        );
    }

    #[test]
    fn test_collect_files_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_files(dir.path()).unwrap().is_empty());
    }
}
