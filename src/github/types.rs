use serde::{Deserialize, Deserializer, de};
use std::path::{Component, Path};

/// A repository as returned by `GET /orgs/{org}/repos`.
///
/// Only the fields needed for ranking and cloning are decoded; a page missing
/// any of `name`, `clone_url` or `stargazers_count` is rejected as malformed,
/// and so is a `name` that is not a plain directory name.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    #[serde(deserialize_with = "directory_name")]
    pub name: String,
    pub clone_url: String,
    pub language: Option<String>,
    #[serde(rename = "stargazers_count")]
    pub stars: u64,
}

impl Repository {
    /// Case-insensitive language match. A repository without a declared
    /// language never matches.
    pub fn matches_language(&self, language: &str) -> bool {
        self.language
            .as_deref()
            .is_some_and(|own| own.to_lowercase() == language.to_lowercase())
    }
}

/// True when `name` is a single normal path component, so that joining it
/// onto a directory stays inside that directory.
pub fn is_directory_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn directory_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = String::deserialize(deserializer)?;
    if is_directory_name(&name) {
        Ok(name)
    } else {
        Err(de::Error::custom(format!(
            "repository name {:?} is not a plain directory name",
            name
        )))
    }
}
