//! HTTP client for paginated GitHub API listings.

mod client;
mod link;
mod retry;

pub use client::{HttpClient, Page};
pub use link::parse_next_link;
