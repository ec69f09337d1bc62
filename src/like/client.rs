//! Represents a client abstraction for the like service.

use super::{
    api::RawLikeCount,
    errors::{ClientBuilderError, LikeError},
};
use crate::stdx::http::DEFAULT_USER_AGENT;
use reqwest::header::CONTENT_TYPE;
use std::{fmt::Display, sync::Arc, time::Duration};
use url::Url;

/// The like service the blog is deployed against.
pub const DEFAULT_SERVICE_URL: &str = "https://ilikeit.chaojie.fun/";

/// Opaque identifier of the content being liked, usually the article slug.
///
/// No validation is done: an empty source is a valid, if meaningless, key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source(Arc<str>);

impl Source {
    /// Returns the identifier as given by the embedding page.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Source {
    fn from(source: &str) -> Self {
        Self(source.into())
    }
}

impl From<String> for Source {
    fn from(source: String) -> Self {
        Self(source.into())
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A builder for configuring and creating instances of [`Client`] with custom settings.
///
/// # Example
///
/// ```
/// # use blog::like::ClientBuilder;
/// let client = ClientBuilder::new()
///     .service("https://likes.example.com/")
///     .user_agent("custom-agent/1.0")
///     .build()?;
/// # Ok::<(), blog::like::errors::ClientBuilderError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    service: String,
    https_only: bool,
}

impl Default for ClientBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` pointed at [`DEFAULT_SERVICE_URL`].
    ///
    /// This includes a default user agent (`$CARGO_PKG_NAME/$CARGO_PKG_VERSION`) and
    /// only allows `https` connections.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .brotli(true);

        Self {
            builder,
            service: DEFAULT_SERVICE_URL.to_owned(),
            https_only: true,
        }
    }

    /// Sets the base URL of the like service. The `source` query is appended to it.
    #[inline]
    #[must_use]
    pub fn service(mut self, url: &str) -> Self {
        url.clone_into(&mut self.service);
        self
    }

    /// Sets a custom `User-Agent` header for the [`Client`].
    #[inline]
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        let builder = self.builder.user_agent(user_agent);
        Self { builder, ..self }
    }

    /// Bounds how long a single request may take, connection included.
    #[inline]
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        let builder = self.builder.timeout(timeout);
        Self { builder, ..self }
    }

    /// Whether plain `http` service URLs are refused. Defaults to `true`.
    #[inline]
    #[must_use]
    pub fn https_only(self, https_only: bool) -> Self {
        Self { https_only, ..self }
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// Returns a [`ClientBuilderError`] if the service URL is not a valid base URL,
    /// or if the underlying HTTP client could not be built.
    #[inline]
    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let service = Url::parse(&self.service)?;

        if service.cannot_be_a_base() {
            return Err(ClientBuilderError::CannotBeABase(self.service));
        }

        Ok(Client {
            http: self
                .builder
                .https_only(self.https_only)
                .build()
                .map_err(ClientBuilderError::BuildFailed)?,
            service: Arc::new(service),
        })
    }
}

/// A high-level, asynchronous client for the like service.
///
/// Cloning is cheap and shares the underlying connection pool.
///
/// # Example
///
/// ```
/// # use blog::like::Client;
/// let client = Client::new();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    service: Arc<Url>,
}

// Creation impls
impl Client {
    /// Instantiates a new [`Client`] for [`DEFAULT_SERVICE_URL`].
    ///
    /// # Panics
    ///
    /// This function will panic if the TLS backend cannot be initialized. Use the
    /// [`ClientBuilder`] to handle that case.
    #[must_use]
    #[allow(clippy::expect_used, reason = "the default service url is a known valid base url")]
    pub fn new() -> Self {
        ClientBuilder::new().build().expect("Client::new()")
    }

    /// Returns a [`ClientBuilder`] for creating a custom-configured `Client`.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

// Public facing impls
impl Client {
    /// Fetches the current like count for `source`.
    ///
    /// # Errors
    ///
    /// - [`LikeError::Request`] on transport failures and timeouts.
    /// - [`LikeError::Status`] when the service does not answer with a `2xx`.
    /// - [`LikeError::Decode`] when the body is not `{"like_count": <u32>}`.
    pub async fn count(&self, source: &Source) -> Result<u32, LikeError> {
        let response = self.http.get(self.url(source)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LikeError::Status(status));
        }

        let body = response.text().await?;
        let raw: RawLikeCount = serde_json::from_str(&body).map_err(LikeError::Decode)?;

        Ok(raw.like_count)
    }

    /// Registers one like for `source`.
    ///
    /// The response is ignored entirely; only transport failures are reported.
    /// Every call counts, there is no idempotency key.
    ///
    /// # Errors
    ///
    /// Returns [`LikeError::Request`] if the request could not be delivered.
    pub async fn like(&self, source: &Source) -> Result<(), LikeError> {
        self.http
            .post(self.url(source))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        Ok(())
    }

    /// Returns the URL identifying `source` on the service: `{service}?source={source}`.
    #[must_use]
    pub fn url(&self, source: &Source) -> Url {
        let mut url = Url::clone(&self.service);
        url.query_pairs_mut().append_pair("source", source.as_str());
        url
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_append_source_query_to_service() {
        let client = Client::new();
        let url = client.url(&Source::from("posts/hello-world"));
        assert_eq!(
            "https://ilikeit.chaojie.fun/?source=posts%2Fhello-world",
            url.as_str()
        );
    }

    #[test]
    fn should_keep_existing_service_query() {
        let client = Client::builder()
            .service("https://likes.example.com/api?site=blog")
            .build()
            .unwrap();
        let url = client.url(&Source::from("a b&c"));
        assert_eq!(
            "https://likes.example.com/api?site=blog&source=a+b%26c",
            url.as_str()
        );
    }

    #[test]
    fn empty_source_is_accepted() {
        let client = Client::new();
        assert_eq!(
            "https://ilikeit.chaojie.fun/?source=",
            client.url(&Source::from("")).as_str()
        );
    }

    #[test]
    fn should_reject_invalid_service() {
        assert!(matches!(
            Client::builder().service("not a url").build(),
            Err(ClientBuilderError::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::builder().service("mailto:likes@example.com").build(),
            Err(ClientBuilderError::CannotBeABase(_))
        ));
    }
}
