//! Organization repository listing and ranking.

mod client;
mod types;

use async_trait::async_trait;
use log::info;

use crate::error::ListError;

pub use client::GitHub;
pub use types::{Repository, is_directory_name};

/// Source of an organization's full repository list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListRepositories: Send + Sync {
    /// Returns every repository of `org`, in API order.
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<Repository>, ListError>;
}

/// Lists `org`'s repositories and returns the `top_n` most starred ones in
/// `language`, most stars first.
///
/// Returns fewer than `top_n` entries when fewer match, and
/// [`ListError::NotFound`] when none do.
#[tracing::instrument(skip(lister))]
pub async fn list_top_repositories<L: ListRepositories + ?Sized>(
    lister: &L,
    org: &str,
    language: &str,
    top_n: usize,
) -> Result<Vec<Repository>, ListError> {
    let all = lister.list_org_repositories(org).await?;
    let fetched = all.len();

    let ranked = rank(all, language, top_n);
    if ranked.is_empty() {
        return Err(ListError::NotFound {
            org: org.to_string(),
            language: language.to_string(),
        });
    }

    info!(
        "Selected {} of {} repositories in {} for language {}",
        ranked.len(),
        fetched,
        org,
        language
    );
    Ok(ranked)
}

/// Keeps repositories in `language`, sorts by stars descending and truncates
/// to `top_n`. The sort is stable, so ties keep their API order.
pub fn rank(repositories: Vec<Repository>, language: &str, top_n: usize) -> Vec<Repository> {
    let mut matching: Vec<Repository> = repositories
        .into_iter()
        .filter(|repo| repo.matches_language(language))
        .collect();

    matching.sort_by(|a, b| b.stars.cmp(&a.stars));
    matching.truncate(top_n);
    matching
}
