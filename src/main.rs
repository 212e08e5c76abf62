use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use topclone::config::Options;

/// topclone - clone an organization's most starred repositories
///
/// Lists every repository of a GitHub organization, keeps the ones written in
/// the requested language, and clones the most starred of them (with
/// submodules) in parallel.
///
/// The GITHUB_TOKEN environment variable must hold an API token. A `.env`
/// file in the working directory is read first; variables already set in the
/// environment take precedence over it.
///
/// Examples:
///   topclone --org microsoft --language C --top_n 5
///   topclone --org rust-lang --language rust --threads 8 --force
#[derive(Parser, Debug)]
#[command(author, version = env!("TOPCLONE_VERSION"), about)]
struct Cli {
    /// GitHub organization to list
    #[arg(long, default_value = "microsoft")]
    org: String,

    /// Repository language to keep (case-insensitive)
    #[arg(long, default_value = "C")]
    language: String,

    /// Number of repositories to clone
    #[arg(
        long = "top_n",
        visible_alias = "top-n",
        value_name = "N",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    top_n: u32,

    /// Delete an existing destination directory without asking
    #[arg(long)]
    force: bool,

    /// Number of clones to run at the same time
    #[arg(
        long,
        value_name = "N",
        default_value_t = 4,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    threads: u32,

    /// Destination directory (defaults to ./<org>-<language>)
    #[arg(long, value_name = "PATH")]
    dest: Option<PathBuf>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", env = "TOPCLONE_API_URL")]
    api_url: Option<String>,
}

impl From<Cli> for Options {
    fn from(cli: Cli) -> Self {
        Options {
            org: cli.org,
            language: cli.language,
            top_n: cli.top_n as usize,
            force: cli.force,
            threads: cli.threads as usize,
            dest: cli.dest,
            api_url: cli.api_url,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; only the process environment is used then
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring unreadable .env file: {}", e),
    }
    let cli = Cli::parse();

    topclone::app::execute(topclone::runtime::RealRuntime, cli.into()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["topclone"]).unwrap();
        assert_eq!(cli.org, "microsoft");
        assert_eq!(cli.language, "C");
        assert_eq!(cli.top_n, 5);
        assert_eq!(cli.threads, 4);
        assert!(!cli.force);
        assert_eq!(cli.dest, None);
    }

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::try_parse_from([
            "topclone",
            "--org",
            "acme",
            "--language",
            "Go",
            "--top_n",
            "2",
            "--force",
            "--threads",
            "8",
            "--dest",
            "/tmp/out",
        ])
        .unwrap();

        let options = Options::from(cli);
        assert_eq!(options.org, "acme");
        assert_eq!(options.language, "Go");
        assert_eq!(options.top_n, 2);
        assert!(options.force);
        assert_eq!(options.threads, 8);
        assert_eq!(options.dest, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn test_cli_top_n_dash_alias() {
        let cli = Cli::try_parse_from(["topclone", "--top-n", "3"]).unwrap();
        assert_eq!(cli.top_n, 3);
    }

    #[test]
    fn test_cli_rejects_zero() {
        assert!(Cli::try_parse_from(["topclone", "--top_n", "0"]).is_err());
        assert!(Cli::try_parse_from(["topclone", "--threads", "0"]).is_err());
        assert!(Cli::try_parse_from(["topclone", "--threads", "-1"]).is_err());
    }
}
