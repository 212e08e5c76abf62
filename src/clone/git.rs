//! `git` subprocess cloner.

use async_trait::async_trait;
use log::debug;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::Cloner;
use crate::error::CloneError;
use crate::github::Repository;

/// Clones with `git clone --recurse-submodules`.
pub struct GitCloner {
    program: String,
}

impl Default for GitCloner {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCloner {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Uses another executable in place of `git`.
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

#[async_trait]
impl Cloner for GitCloner {
    #[tracing::instrument(skip(self, repository), fields(repository = %repository.name))]
    async fn clone_repository(
        &self,
        repository: &Repository,
        target: &Path,
    ) -> Result<(), CloneError> {
        debug!(
            "{} clone --recurse-submodules -- {} {}",
            self.program,
            repository.clone_url,
            target.display()
        );

        let output = Command::new(&self.program)
            .arg("clone")
            .arg("--recurse-submodules")
            .arg("--")
            .arg(&repository.clone_url)
            .arg(target)
            // Never block a worker on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(CloneError::GitFailed {
            exit: output.status.to_string(),
            stderr: last_line(&stderr).to_string(),
        })
    }
}

/// git prints progress before the actual error; the last line is the useful one.
fn last_line(stderr: &str) -> &str {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .unwrap_or("no error output")
}
