//! Filesystem operations
//!
//! Directory primitives plus the prompting directory remover used by clean
//! actions.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::FilesystemError;

/// Create a directory, requiring its parent to exist
///
/// Deliberately non-recursive: a missing parent signals a misconfigured
/// root and must fail rather than be papered over.
pub fn create_dir(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// List the immediate subdirectories of `root`, in scan order
pub fn list_subdirectories(root: &Path) -> Result<Vec<PathBuf>, FilesystemError> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| FilesystemError::Scan {
            path: root.to_path_buf(),
            error: e.to_string(),
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

/// Outcome of a removal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The user declined; the cleanup step is skipped, not failed
    Declined,
}

/// Removes directories, optionally confirming with the user first
pub trait DirectoryRemover {
    /// Remove `path` recursively. When `prompt` is set the user is asked
    /// for confirmation; declining is not an error.
    fn remove_dir(&mut self, path: &Path, prompt: bool)
        -> Result<RemoveOutcome, FilesystemError>;
}

/// Remover that confirms destructive operations on the controlling terminal
#[derive(Debug, Default)]
pub struct InteractiveRemover;

impl DirectoryRemover for InteractiveRemover {
    fn remove_dir(
        &mut self,
        path: &Path,
        prompt: bool,
    ) -> Result<RemoveOutcome, FilesystemError> {
        if prompt && !confirm_removal(path)? {
            tracing::info!(path = %path.display(), "removal declined by user");
            return Ok(RemoveOutcome::Declined);
        }
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "removed directory");
        Ok(RemoveOutcome::Removed)
    }
}

fn confirm_removal(path: &Path) -> Result<bool, FilesystemError> {
    print!("Remove '{}' and all of its contents? [y/N] ", path.display());
    io::stdout().flush().map_err(|e| FilesystemError::Prompt {
        error: e.to_string(),
    })?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| FilesystemError::Prompt {
            error: e.to_string(),
        })?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
}
