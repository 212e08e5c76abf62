//! Bounded-concurrency batch cloning.
//!
//! [`clone_all`] runs a fixed pool of workers over a shared job queue. Every
//! repository yields exactly one [`CloneOutcome`]; a failed or panicking clone
//! is recorded and never stops the other workers.

mod git;

use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

use crate::error::CloneError;
use crate::github::{Repository, is_directory_name};

pub use git::GitCloner;

/// Clones one repository into a target directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Cloner: Send + Sync {
    async fn clone_repository(
        &self,
        repository: &Repository,
        target: &Path,
    ) -> Result<(), CloneError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneStatus {
    Cloned,
    Failed(String),
}

/// Result of cloning one repository.
#[derive(Debug, Clone)]
pub struct CloneOutcome {
    pub repository: Repository,
    pub target: PathBuf,
    pub status: CloneStatus,
}

impl CloneOutcome {
    pub fn is_success(&self) -> bool {
        self.status == CloneStatus::Cloned
    }
}

struct Job {
    index: usize,
    repository: Repository,
    target: PathBuf,
}

/// Clones every repository into `destination/<name>` using exactly
/// `concurrency` workers (at least one), and waits for all of them.
///
/// A repository whose name is not a plain directory name is never cloned and
/// gets a failed outcome, so no clone lands outside `destination`.
///
/// Outcomes are returned in the order of `repositories`, whatever order the
/// clones complete in. Partially written directories of failed clones are left
/// in place.
#[tracing::instrument(skip(cloner, repositories))]
pub async fn clone_all<C: Cloner + 'static>(
    cloner: Arc<C>,
    repositories: Vec<Repository>,
    destination: &Path,
    concurrency: usize,
) -> Vec<CloneOutcome> {
    let total = repositories.len();
    let mut slots: Vec<Option<CloneOutcome>> = vec![None; total];

    let mut queue = VecDeque::with_capacity(total);
    for (index, repository) in repositories.into_iter().enumerate() {
        if !is_directory_name(&repository.name) {
            let e = CloneError::UnsafeName(repository.name.clone());
            warn!("Skipping {}: {}", repository.name, e);
            slots[index] = Some(CloneOutcome {
                target: destination.to_path_buf(),
                status: CloneStatus::Failed(e.to_string()),
                repository,
            });
            continue;
        }
        queue.push_back(Job {
            index,
            target: destination.join(&repository.name),
            repository,
        });
    }
    let queue = Arc::new(Mutex::new(queue));

    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<(usize, CloneOutcome)>();

    let mut workers = JoinSet::new();
    for worker in 0..concurrency.max(1) {
        let queue = Arc::clone(&queue);
        let cloner = Arc::clone(&cloner);
        let outcomes = outcome_tx.clone();

        workers.spawn(async move {
            loop {
                let Some(job) = queue.lock().await.pop_front() else {
                    break;
                };

                let outcome = run_job(Arc::clone(&cloner), job.repository, job.target).await;
                if outcomes.send((job.index, outcome)).is_err() {
                    break;
                }
            }
            debug!("Clone worker {} finished", worker);
        });
    }
    drop(outcome_tx);

    while let Some((index, outcome)) = outcome_rx.recv().await {
        slots[index] = Some(outcome);
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            warn!("Clone worker exited abnormally: {}", e);
        }
    }

    slots.into_iter().flatten().collect()
}

/// Runs one clone on its own task so a panic becomes a failed outcome
/// instead of taking the worker down.
async fn run_job<C: Cloner + 'static>(
    cloner: Arc<C>,
    repository: Repository,
    target: PathBuf,
) -> CloneOutcome {
    info!("Cloning {} into {}", repository.name, target.display());

    let task = {
        let repository = repository.clone();
        let target = target.clone();
        tokio::spawn(async move { cloner.clone_repository(&repository, &target).await })
    };

    let status = match task.await {
        Ok(Ok(())) => {
            info!("Cloned {}", repository.name);
            CloneStatus::Cloned
        }
        Ok(Err(e)) => {
            warn!("Failed to clone {}: {}", repository.name, e);
            CloneStatus::Failed(e.to_string())
        }
        Err(join_error) => {
            let e = CloneError::Aborted(join_error.to_string());
            warn!("Failed to clone {}: {}", repository.name, e);
            CloneStatus::Failed(e.to_string())
        }
    };

    CloneOutcome {
        repository,
        target,
        status,
    }
}
