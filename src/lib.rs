//! Clone the most starred repositories of a GitHub organization in a given
//! language.

pub mod app;
pub mod clone;
pub mod config;
pub mod error;
pub mod github;
pub mod http;
pub mod prepare;
pub mod runtime;
