//! Destination directory preparation.

use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

use crate::error::PrepareError;
use crate::runtime::Runtime;

/// Ensures `path` exists as an empty directory and returns it.
///
/// A missing path is created with its parents. An existing directory is
/// deleted and recreated, after asking through [`Runtime::confirm`] unless
/// `force` is set. Declining returns [`PrepareError::Declined`] without
/// touching the filesystem.
#[tracing::instrument(skip(runtime))]
pub fn prepare_destination<R: Runtime>(runtime: &R, path: &Path, force: bool) -> Result<PathBuf> {
    if runtime.exists(path) {
        if !runtime.is_dir(path) {
            return Err(PrepareError::NotADirectory {
                path: path.to_path_buf(),
            }
            .into());
        }

        if !force {
            let prompt = format!(
                "Directory {} already exists. Delete it and everything in it?",
                path.display()
            );
            if !runtime.confirm(&prompt)? {
                return Err(PrepareError::Declined {
                    path: path.to_path_buf(),
                }
                .into());
            }
        }

        info!("Removing existing directory {}", path.display());
        runtime.remove_dir_all(path)?;
    }

    runtime.create_dir_all(path)?;
    Ok(path.to_path_buf())
}
