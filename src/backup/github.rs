//! Represents a client abstraction for the GitHub GraphQL API, limited to what a backup needs.

mod api;

use super::{article::Article, errors::BackupError};
use crate::stdx::{
    cache::Cache,
    error::{Invariant, invariant},
    http::{DEFAULT_USER_AGENT, IRetry, Retry},
};
use anyhow::Context;
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use std::{fmt::Display, sync::Arc};

/// The public GitHub GraphQL endpoint.
pub const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// Environment variable the token is conventionally read from.
pub const TOKEN_ENV: &str = "GITHUB_AUTH_TOKEN";

/// Node id of a GitHub issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct IssueId(String);

/// Node id of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(String);

impl IssueId {
    /// Returns the raw node id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl RepositoryId {
    /// Returns the raw node id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for IssueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a GraphQL request may safely be sent twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Query,
    Mutation,
}

/// A builder for configuring and creating instances of [`Client`].
///
/// # Example
///
/// ```
/// # use blog::backup::github::ClientBuilder;
/// let client = ClientBuilder::new().token("ghp_token").build()?;
/// # Ok::<(), blog::backup::BackupError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    token: Option<String>,
    endpoint: String,
    https_only: bool,
}

impl Default for ClientBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` for [`GRAPHQL_ENDPOINT`] without a token.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .brotli(true);

        Self {
            builder,
            token: None,
            endpoint: GRAPHQL_ENDPOINT.to_owned(),
            https_only: true,
        }
    }

    /// Sets the personal access token used as bearer authentication.
    #[inline]
    #[must_use]
    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.to_owned());
        self
    }

    /// Overrides the GraphQL endpoint, for GitHub Enterprise or tests.
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        endpoint.clone_into(&mut self.endpoint);
        self
    }

    /// Whether plain `http` endpoints are refused. Defaults to `true`.
    #[inline]
    #[must_use]
    pub fn https_only(self, https_only: bool) -> Self {
        Self { https_only, ..self }
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::MissingToken`] if no non-empty token was set, or
    /// [`BackupError::Request`] if the HTTP client could not be built.
    #[inline]
    pub fn build(self) -> Result<Client, BackupError> {
        let token = match self.token {
            Some(token) if !token.trim().is_empty() => token,
            _ => return Err(BackupError::MissingToken),
        };

        Ok(Client {
            http: self.builder.https_only(self.https_only).build()?,
            endpoint: self.endpoint.into(),
            token: token.into(),
            viewer: Cache::empty(),
        })
    }
}

/// An asynchronous client for the GitHub GraphQL API.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: Arc<str>,
    token: Arc<str>,
    viewer: Cache<Arc<str>>,
}

impl Client {
    /// Returns a [`ClientBuilder`].
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the login of the token's owner.
    ///
    /// The login is fetched once per client and then cached.
    pub async fn viewer_login(&self) -> Result<Arc<str>, BackupError> {
        if let Some(login) = self.viewer.get() {
            return Ok(login);
        }

        let response: api::Viewer = self.graphql(Operation::Query, api::VIEWER, json!({})).await?;
        let login: Arc<str> = response.viewer.login.into();

        self.viewer.insert(login.clone());

        Ok(login)
    }

    /// Returns the node id of `owner/name`.
    pub async fn repository_id(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryId, BackupError> {
        let response: api::Repository<api::Id<RepositoryId>> = self
            .graphql(Operation::Query, api::REPOSITORY, json!({ "owner": owner, "name": name }))
            .await?;

        let repository = response
            .repository
            .ok_or_else(|| BackupError::RepositoryNotFound(format!("{owner}/{name}")))?;

        Ok(repository.id)
    }

    /// Returns the node ids of every issue of `owner/name`, walking all pages.
    pub async fn issue_ids(&self, owner: &str, name: &str) -> Result<Vec<IssueId>, BackupError> {
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let response: api::Repository<api::RepositoryIssues> = self
                .graphql(
                    Operation::Query,
                    api::ISSUES,
                    json!({ "owner": owner, "name": name, "cursor": cursor }),
                )
                .await?;

            let issues = response
                .repository
                .ok_or_else(|| BackupError::RepositoryNotFound(format!("{owner}/{name}")))?
                .issues;

            ids.extend(issues.nodes.into_iter().map(|node| node.id));

            if !issues.page_info.has_next_page {
                break;
            }

            cursor = Some(issues.page_info.end_cursor.invariant(
                "github issues `pageInfo` had `hasNextPage` set without an `endCursor`",
            )?);
        }

        tracing::debug!(owner, name, count = ids.len(), "listed issues");

        Ok(ids)
    }

    /// Creates an issue from `article` in `repository`, returning its id.
    pub async fn create_issue(
        &self,
        repository: &RepositoryId,
        article: &Article,
    ) -> Result<IssueId, BackupError> {
        let input = json!({
            "repositoryId": repository.as_str(),
            "title": article.title,
            "body": article.content,
        });

        let response: api::CreateIssue = self
            .graphql(Operation::Mutation, api::CREATE_ISSUE, json!({ "input": input }))
            .await?;

        let id = response.create_issue.issue.id;

        invariant!(
            !id.as_str().is_empty(),
            "github created an issue for `{}` without an id",
            article.title
        );

        tracing::debug!(title = %article.title, %id, "created issue");

        Ok(id)
    }

    /// Deletes the issue `id`, returning how many issues the repository has left.
    pub async fn delete_issue(&self, id: &IssueId) -> Result<u32, BackupError> {
        let response: api::DeleteIssue = self
            .graphql(
                Operation::Mutation,
                api::DELETE_ISSUE,
                json!({ "input": { "issueId": id.as_str() } }),
            )
            .await?;

        let remaining = response.delete_issue.repository.issues.total_count;
        tracing::debug!(%id, remaining, "deleted issue");

        Ok(remaining)
    }
}

// Internal only impls
impl Client {
    async fn graphql<T>(
        &self,
        operation: Operation,
        query: &str,
        variables: Value,
    ) -> Result<T, BackupError>
    where
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(&*self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }));

        // A mutation whose response was lost may already have been applied.
        let request: Retry = match operation {
            Operation::Query => request.retry(),
            Operation::Mutation => request.retry_throttled(),
        };

        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(BackupError::InvalidToken);
        }

        if !status.is_success() {
            return Err(BackupError::Status(status));
        }

        let response: api::RawResponse<T> = serde_json::from_str(&body)
            .context(body)
            .context("failed to deserialize github graphql response")?;

        if !response.errors.is_empty() {
            let messages = response
                .errors
                .into_iter()
                .map(|error| error.message)
                .collect();
            return Err(BackupError::GraphQl(messages));
        }

        Ok(response
            .data
            .invariant("github graphql response had neither `data` nor `errors`")?)
    }
}
