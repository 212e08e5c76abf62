use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::PathBuf;

use crate::{error::ConfigError, http::HttpClient, runtime::Runtime};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable holding the API bearer token.
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Options as given on the command line.
#[derive(Debug, Clone)]
pub struct Options {
    pub org: String,
    pub language: String,
    pub top_n: usize,
    pub force: bool,
    pub threads: usize,
    pub dest: Option<PathBuf>,
    pub api_url: Option<String>,
}

/// Settings for one run, built once at startup and passed to every stage.
#[derive(Clone)]
pub struct Config {
    pub org: String,
    pub language: String,
    pub top_n: usize,
    pub force: bool,
    pub threads: usize,
    pub destination: PathBuf,
    pub api_url: String,
    pub token: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("org", &self.org)
            .field("language", &self.language)
            .field("top_n", &self.top_n)
            .field("force", &self.force)
            .field("threads", &self.threads)
            .field("destination", &self.destination)
            .field("api_url", &self.api_url)
            .field("token", &mask_token(&self.token))
            .finish()
    }
}

impl Config {
    /// Fails with [`ConfigError::MissingToken`] when `GITHUB_TOKEN` is unset or empty.
    pub fn new<R: Runtime>(runtime: &R, options: Options) -> Result<Self> {
        let token = runtime
            .env_var(TOKEN_VAR)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        debug!("Using {} for authentication: {}", TOKEN_VAR, mask_token(&token));

        let destination = options
            .dest
            .unwrap_or_else(|| default_destination(&options.org, &options.language));

        Ok(Self {
            org: options.org,
            language: options.language,
            top_n: options.top_n,
            force: options.force,
            threads: options.threads,
            destination,
            api_url: options
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token,
        })
    }

    /// Builds the API client with the bearer token as a default header.
    pub fn http_client(&self) -> Result<HttpClient> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", self.token))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = Client::builder()
            .user_agent(concat!("topclone/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(HttpClient::new(client))
    }
}

/// `./<org>-<language>`, lowercased.
fn default_destination(org: &str, language: &str) -> PathBuf {
    PathBuf::from(format!("{}-{}", org, language).to_lowercase())
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
