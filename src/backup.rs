//! Mirrors the blog's markdown articles into the issues of a GitHub repository.
//!
//! A backup is destructive on the GitHub side: every existing issue of the
//! repository is deleted, then one issue is created per article, titled after
//! the article's file name.

pub mod article;
pub mod errors;
pub mod github;

pub use article::Article;
pub use errors::{BackupError, Stage};

use anyhow::Context;
use futures::future::join_all;
use std::path::Path;
use tokio::sync::Semaphore;

/// How many GitHub mutations run at the same time by default.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Summary of a finished backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Issues deleted from the repository.
    pub deleted: usize,
    /// Issues created from articles.
    pub created: usize,
}

/// Backs up articles to GitHub issues.
///
/// # Example
///
/// ```no_run
/// # use blog::backup::{Backup, github};
/// # #[tokio::main]
/// # async fn main() -> Result<(), blog::backup::BackupError> {
/// let client = github::Client::builder().token("ghp_...").build()?;
/// let report = Backup::new(client)
///     .to_github("blog", "content/posts".as_ref())
///     .await?;
/// println!("deleted {}, created {}", report.deleted, report.created);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Backup {
    client: github::Client,
    concurrency: usize,
}

impl Backup {
    /// Creates a backup running at most [`DEFAULT_CONCURRENCY`] mutations at once.
    #[must_use]
    pub fn new(client: github::Client) -> Self {
        Self {
            client,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many mutations may run at once. `0` is treated as `1`.
    #[must_use]
    pub fn concurrency(self, concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            ..self
        }
    }

    /// Replaces every issue of the viewer's `repo` with the articles found in `articles`.
    ///
    /// Articles are read and the repository is resolved before anything is
    /// deleted, so a bad directory or repository leaves GitHub untouched.
    /// Deletions all run before any creation. Within a stage, operations run
    /// concurrently and every failure is collected; if any operation failed the
    /// stage reports them all as [`BackupError::Partial`] and the backup stops.
    ///
    /// # Errors
    ///
    /// Fails if the token is rejected, the repository does not exist, the
    /// articles cannot be read, or any deletion or creation failed.
    pub async fn to_github(&self, repo: &str, articles: &Path) -> Result<Report, BackupError> {
        let articles = Article::read_dir(articles).await?;

        let owner = self.client.viewer_login().await?;
        let repository = &self.client.repository_id(&owner, repo).await?;
        let issues = self.client.issue_ids(&owner, repo).await?;

        tracing::info!(%owner, repo, count = issues.len(), "deleting existing issues");

        // PERF: Runs N mutations at a time. Without this it would be sequential.
        let semaphore = &Semaphore::new(self.concurrency);
        let client = &self.client;

        let deletions = issues.iter().map(|id| async move {
            let _permit = semaphore
                .acquire()
                .await
                .context("failed to acquire semaphore when deleting issues")?;
            client.delete_issue(id).await
        });

        let failures = collect_failures(join_all(deletions).await);
        if !failures.is_empty() {
            return Err(BackupError::Partial {
                stage: Stage::Delete,
                failures,
            });
        }

        tracing::info!("deleted all issues");

        tracing::info!(repo, count = articles.len(), "creating issues from articles");

        let creations = articles.iter().map(|article| async move {
            let _permit = semaphore
                .acquire()
                .await
                .context("failed to acquire semaphore when creating issues")?;
            client.create_issue(repository, article).await
        });

        let failures = collect_failures(join_all(creations).await);
        if !failures.is_empty() {
            return Err(BackupError::Partial {
                stage: Stage::Create,
                failures,
            });
        }

        tracing::info!("backup ok");

        Ok(Report {
            deleted: issues.len(),
            created: articles.len(),
        })
    }
}

fn collect_failures<T>(results: Vec<Result<T, BackupError>>) -> Vec<BackupError> {
    results.into_iter().filter_map(Result::err).collect()
}
