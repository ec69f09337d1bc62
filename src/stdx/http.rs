use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

pub static DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Number of extra attempts made before giving up on a request.
const MAX_RETRIES: u8 = 5;

/// Resends a request while the server is throttling it.
///
/// Transport failures are only retried when the request is safe to repeat:
/// a failure may happen after the server already acted on the request.
pub struct Retry {
    builder: RequestBuilder,
    transport: bool,
}

impl Retry {
    pub async fn send(self) -> Result<Response, reqwest::Error> {
        let mut tries = MAX_RETRIES;
        let mut wait = fastrand::u64(1..=3);

        loop {
            #[allow(clippy::expect_used, reason = "if `RequestBuilder` fails to clone, it means we are working on streams, which is not the assumption of operation!")]
            let request = self.builder.try_clone()
                .expect("`RequestBuilder` should only fail to clone when working with streams/readers, and we only send json bodies");

            match request.send().await {
                Ok(response) if is_retryable(response.status()) && tries > 0 => {
                    tracing::debug!(status = %response.status(), wait, "request throttled, retrying");
                }
                Err(err) if self.transport && tries > 0 => {
                    tracing::debug!(%err, wait, "request failed, retrying");
                }
                Ok(response) => return Ok(response),
                Err(err) => return Err(err),
            }

            tokio::time::sleep(Duration::from_secs(wait)).await;
            tries -= 1;
            wait += 2;
            wait += fastrand::u64(1..=3);
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::BAD_GATEWAY
}

pub trait IRetry {
    /// Retries on throttling statuses and on transport failures.
    fn retry(self) -> Retry;
    /// Retries on throttling statuses only, for requests with side effects.
    fn retry_throttled(self) -> Retry;
}

impl IRetry for RequestBuilder {
    fn retry(self) -> Retry {
        Retry {
            builder: self,
            transport: true,
        }
    }

    fn retry_throttled(self) -> Retry {
        Retry {
            builder: self,
            transport: false,
        }
    }
}
