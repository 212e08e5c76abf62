use async_trait::async_trait;
use log::{debug, warn};

use super::ListRepositories;
use super::types::Repository;
use crate::error::ListError;
use crate::http::HttpClient;

/// Largest page size the repository listing endpoint accepts.
pub const PER_PAGE: usize = 100;

/// Upper bound on followed `next` links, in case a server keeps returning one.
pub const MAX_PAGES: usize = 100;

/// GitHub REST API repository lister.
///
/// Reads every page of `/orgs/{org}/repos` by following `Link: rel="next"`,
/// so no matching repository is lost to pagination. Filtering and ranking
/// happen client-side in [`super::list_top_repositories`].
pub struct GitHub {
    http_client: HttpClient,
    api_url: String,
}

impl GitHub {
    pub fn new(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn first_page_url(&self, org: &str) -> String {
        format!(
            "{}/orgs/{}/repos?per_page={}&type=all",
            self.api_url, org, PER_PAGE
        )
    }
}

#[async_trait]
impl ListRepositories for GitHub {
    #[tracing::instrument(skip(self))]
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<Repository>, ListError> {
        let mut repositories = Vec::new();
        let mut url = self.first_page_url(org);

        for page in 1..=MAX_PAGES {
            debug!("Fetching repositories page {} from {}...", page, url);

            let fetched = self.http_client.get_page::<Repository>(&url).await?;
            repositories.extend(fetched.items);

            match fetched.next {
                Some(next) => url = next,
                None => {
                    debug!(
                        "Fetched {} repositories of {} in {} page(s)",
                        repositories.len(),
                        org,
                        page
                    );
                    return Ok(repositories);
                }
            }
        }

        warn!(
            "Stopped after {} pages of {} repositories; the listing may be incomplete",
            MAX_PAGES, org
        );
        Ok(repositories)
    }
}
