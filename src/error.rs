//! Crate-wide error, for callers driving more than one part of the blog tooling.

use thiserror::Error;

pub use crate::{
    backup::errors::BackupError,
    frontmatter::FrontMatterError,
    like::errors::{ClientBuilderError, LikeError},
};

#[allow(missing_docs)]
#[allow(
    clippy::error_impl_error,
    reason = "`Error` only aggregates the per-module errors for binaries"
)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    LikeError(#[from] LikeError),
    #[error(transparent)]
    ClientBuilderError(#[from] ClientBuilderError),
    #[error(transparent)]
    BackupError(#[from] BackupError),
    #[error(transparent)]
    FrontMatterError(#[from] FrontMatterError),
}
