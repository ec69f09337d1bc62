//! Errors that can happen when backing up articles to GitHub.

use crate::stdx::error::InternalInvariant;
use reqwest::StatusCode;
use std::fmt::Display;
use thiserror::Error;

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("no github token was provided")]
    MissingToken,
    #[error("github rejected the provided token")]
    InvalidToken,
    #[error("github responded with `{0}`")]
    Status(StatusCode),
    #[error("github graphql api returned errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),
    #[error("repository `{0}` was not found")]
    RepositoryNotFound(String),
    #[error("failed to read articles: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to {stage} {} issue(s): {}", .failures.len(), summarize(.failures))]
    Partial {
        stage: Stage,
        failures: Vec<BackupError>,
    },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error(transparent)]
    Invariant(#[from] InternalInvariant),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// The stage of a backup an operation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Deleting the existing issues.
    Delete,
    /// Creating issues from articles.
    Create,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Stage::Delete => "delete",
            Stage::Create => "create",
        };

        write!(f, "{str}")
    }
}

fn summarize(failures: &[BackupError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
