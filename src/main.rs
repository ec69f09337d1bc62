//! Command line entry point for the blog's tooling.

use anyhow::Context;
use blog::{
    backup::{Backup, github},
    frontmatter,
    like::{self, Source, client::DEFAULT_SERVICE_URL},
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Where the site keeps its articles.
const ARTICLES_DIR: &str = "content/posts";

#[derive(Debug, Parser)]
#[command(name = "blog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read or increment like counters.
    Like {
        /// Base URL of the like service.
        #[arg(long, global = true, default_value = DEFAULT_SERVICE_URL)]
        service: Url,

        #[command(subcommand)]
        command: LikeCommand,
    },
    /// Back up articles to a remote target.
    Backup {
        #[command(subcommand)]
        target: Target,
    },
    /// Rewrite YAML front matter as TOML, in place.
    Frontmatter {
        /// Directory holding the markdown articles.
        #[arg(long, default_value = ARTICLES_DIR)]
        dir: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum LikeCommand {
    /// Print the like count of a source.
    Count { source: String },
    /// Register one like for a source.
    Submit { source: String },
}

#[derive(Debug, Subcommand)]
enum Target {
    /// Replace every issue of a GitHub repository with the articles.
    Github {
        /// Repository, owned by the token's user, to back up to.
        #[arg(short, long, default_value = "blog")]
        repo: String,

        /// GitHub access token.
        #[arg(short, long, env = github::TOKEN_ENV, hide_env_values = true)]
        token: String,

        /// Directory holding the markdown articles.
        #[arg(long, default_value = ARTICLES_DIR)]
        dir: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Like { service, command } => {
            let client = like::Client::builder()
                .service(service.as_str())
                .https_only(service.scheme() != "http")
                .build()
                .context("invalid like service configuration")?;

            match command {
                LikeCommand::Count { source } => {
                    let count = client.count(&Source::from(source)).await?;
                    println!("{count}");
                }
                LikeCommand::Submit { source } => {
                    let source = Source::from(source);
                    client.like(&source).await?;
                    println!("liked `{source}`");
                }
            }
        }
        Command::Backup {
            target: Target::Github { repo, token, dir },
        } => {
            let dir = std::path::absolute(&dir)
                .with_context(|| format!("failed to resolve `{}`", dir.display()))?;

            let client = github::Client::builder().token(&token).build()?;
            let report = Backup::new(client).to_github(&repo, &dir).await?;

            println!(
                "backed up {} article(s) to `{repo}`, replacing {} issue(s)",
                report.created, report.deleted
            );
        }
        Command::Frontmatter { dir } => {
            for path in frontmatter::convert_dir(&dir).await? {
                println!("converted {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn backup_defaults_to_blog_repo() {
        let cli = Cli::try_parse_from(["blog", "backup", "github", "--token", "t"]).unwrap();
        let Command::Backup {
            target: Target::Github { repo, token, dir },
        } = cli.command
        else {
            panic!("expected backup command");
        };

        assert_eq!("blog", repo);
        assert_eq!("t", token);
        assert_eq!(PathBuf::from(ARTICLES_DIR), dir);
    }

    #[test]
    fn like_service_can_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "blog",
            "like",
            "count",
            "posts/rust",
            "--service",
            "http://localhost:8080/",
        ])
        .unwrap();

        let Command::Like { service, command } = cli.command else {
            panic!("expected like command");
        };

        assert_eq!("http://localhost:8080/", service.as_str());
        assert!(matches!(command, LikeCommand::Count { source } if source == "posts/rust"));
    }

    #[test]
    fn like_service_scheme_is_case_insensitive() {
        let cli = Cli::try_parse_from([
            "blog",
            "like",
            "--service",
            "HTTP://localhost:8080/",
            "submit",
            "posts/rust",
        ])
        .unwrap();

        let Command::Like { service, .. } = cli.command else {
            panic!("expected like command");
        };

        assert_eq!("http", service.scheme());
    }

    #[test]
    fn like_service_must_be_a_url() {
        let result = Cli::try_parse_from(["blog", "like", "--service", "not a url", "count", "x"]);
        assert!(result.is_err());
    }
}
