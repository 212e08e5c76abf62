//! Run orchestration: list, prepare, clone, report.

use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;

use crate::{
    clone::{CloneOutcome, CloneStatus, Cloner, GitCloner, clone_all},
    config::{Config, Options},
    github::{GitHub, ListRepositories, list_top_repositories},
    prepare::prepare_destination,
    runtime::Runtime,
};

/// Counts of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub cloned: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[CloneOutcome]) -> Self {
        let cloned = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            cloned,
            failed: outcomes.len() - cloned,
        }
    }

    pub fn total(&self) -> usize {
        self.cloned + self.failed
    }
}

/// Builds the real GitHub lister and git cloner and runs the batch.
#[tracing::instrument(skip(runtime, options))]
pub async fn execute<R: Runtime>(runtime: R, options: Options) -> Result<Summary> {
    let config = Config::new(&runtime, options)?;
    debug!("Running with {:?}", config);

    let github = GitHub::new(config.http_client()?, &config.api_url);
    let cloner = Arc::new(GitCloner::new());

    run(&runtime, &github, cloner, &config).await
}

/// Lists, prepares the destination, clones and prints one line per outcome.
///
/// Listing and preparation errors abort the run before anything is cloned.
/// Clone failures are reported and counted but do not make the run fail.
pub async fn run<R, L, C>(
    runtime: &R,
    lister: &L,
    cloner: Arc<C>,
    config: &Config,
) -> Result<Summary>
where
    R: Runtime,
    L: ListRepositories,
    C: Cloner + 'static,
{
    println!(
        "Fetching top {} repositories from {} in {}...",
        config.top_n, config.org, config.language
    );
    let repositories =
        list_top_repositories(lister, &config.org, &config.language, config.top_n).await?;

    for (rank, repo) in repositories.iter().enumerate() {
        println!("  {}. {} ({} stars)", rank + 1, repo.name, repo.stars);
    }

    let destination = prepare_destination(runtime, &config.destination, config.force)?;

    println!(
        "Cloning {} repositories into {} with {} threads...",
        repositories.len(),
        destination.display(),
        config.threads
    );
    let outcomes = clone_all(cloner, repositories, &destination, config.threads).await;

    report(&outcomes);
    let summary = Summary::from_outcomes(&outcomes);
    println!(
        "Cloned {}/{} repositories ({} failed)",
        summary.cloned,
        summary.total(),
        summary.failed
    );
    info!("Batch finished: {:?}", summary);

    Ok(summary)
}

fn report(outcomes: &[CloneOutcome]) {
    for outcome in outcomes {
        match &outcome.status {
            CloneStatus::Cloned => {
                println!("  ok     {} -> {}", outcome.repository.name, outcome.target.display())
            }
            CloneStatus::Failed(reason) => {
                eprintln!("  FAILED {}: {}", outcome.repository.name, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clone::MockCloner;
    use crate::error::{CloneError, ListError, PrepareError};
    use crate::github::{MockListRepositories, Repository};
    use crate::runtime::MockRuntime;
    use std::path::PathBuf;

    fn config(force: bool) -> Config {
        Config {
            org: "acme".to_string(),
            language: "Go".to_string(),
            top_n: 2,
            force,
            threads: 2,
            destination: PathBuf::from("/work/acme-go"),
            api_url: "http://unused".to_string(),
            token: "token".to_string(),
        }
    }

    fn repo(name: &str, language: &str, stars: u64) -> Repository {
        Repository {
            name: name.to_string(),
            clone_url: format!("https://github.com/acme/{}.git", name),
            language: Some(language.to_string()),
            stars,
        }
    }

    fn acme_lister() -> MockListRepositories {
        let mut lister = MockListRepositories::new();
        lister.expect_list_org_repositories().returning(|_| {
            Ok(vec![
                repo("ten", "Go", 10),
                repo("snake", "Python", 1000),
                repo("fifty", "go", 50),
            ])
        });
        lister
    }

    fn fresh_destination() -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
    }

    #[test]
    fn test_summary_counts() {
        let outcome = |status| CloneOutcome {
            repository: repo("r", "Go", 1),
            target: PathBuf::from("/x/r"),
            status,
        };
        let outcomes = vec![
            outcome(CloneStatus::Cloned),
            outcome(CloneStatus::Failed("boom".to_string())),
            outcome(CloneStatus::Cloned),
        ];

        let summary = Summary::from_outcomes(&outcomes);
        assert_eq!(summary, Summary { cloned: 2, failed: 1 });
        assert_eq!(summary.total(), 3);
    }

    #[tokio::test]
    async fn test_run_clones_ranked_repositories_into_destination() {
        let runtime = fresh_destination();
        let mut cloner = MockCloner::new();
        cloner
            .expect_clone_repository()
            .withf(|repository, target| {
                repository.name != "snake"
                    && target == PathBuf::from("/work/acme-go").join(&repository.name).as_path()
            })
            .times(2)
            .returning(|_, _| Ok(()));

        let summary = run(&runtime, &acme_lister(), Arc::new(cloner), &config(false))
            .await
            .unwrap();

        assert_eq!(summary, Summary { cloned: 2, failed: 0 });
    }

    #[tokio::test]
    async fn test_run_succeeds_with_failed_clones() {
        let runtime = fresh_destination();
        let mut cloner = MockCloner::new();
        cloner.expect_clone_repository().returning(|repository, _| {
            if repository.name == "fifty" {
                Err(CloneError::GitFailed {
                    exit: "exit status: 128".to_string(),
                    stderr: "fatal: unable to access".to_string(),
                })
            } else {
                Ok(())
            }
        });

        let summary = run(&runtime, &acme_lister(), Arc::new(cloner), &config(false))
            .await
            .unwrap();

        assert_eq!(summary, Summary { cloned: 1, failed: 1 });
    }

    #[tokio::test]
    async fn test_listing_failure_aborts_before_filesystem() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().never();
        runtime.expect_create_dir_all().never();
        runtime.expect_remove_dir_all().never();

        let mut lister = MockListRepositories::new();
        lister.expect_list_org_repositories().returning(|_| {
            Err(ListError::Upstream {
                status: 500,
                body: "oops".to_string(),
            })
        });

        let mut cloner = MockCloner::new();
        cloner.expect_clone_repository().never();

        let err = run(&runtime, &lister, Arc::new(cloner), &config(true))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ListError>(),
            Some(ListError::Upstream { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_declined_confirmation_aborts_before_cloning() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime.expect_is_dir().returning(|_| true);
        runtime.expect_confirm().returning(|_| Ok(false));
        runtime.expect_remove_dir_all().never();
        runtime.expect_create_dir_all().never();

        let mut cloner = MockCloner::new();
        cloner.expect_clone_repository().never();

        let err = run(&runtime, &acme_lister(), Arc::new(cloner), &config(false))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PrepareError>(),
            Some(PrepareError::Declined { .. })
        ));
    }

    #[tokio::test]
    async fn test_execute_without_token_fails_fast() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .returning(|_| Err(std::env::VarError::NotPresent));
        runtime.expect_exists().never();

        let options = Options {
            org: "acme".to_string(),
            language: "Go".to_string(),
            top_n: 2,
            force: false,
            threads: 2,
            dest: None,
            api_url: Some("http://127.0.0.1:9".to_string()),
        };

        let err = execute(runtime, options).await.unwrap_err();
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }
}
