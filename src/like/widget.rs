//! The interactive like control embedded on every article.

use super::{
    client::{Client, Source},
    errors::LikeError,
    state::LikeState,
    view::View,
};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;

/// The user activation handed to [`LikeWidget::activate`].
///
/// The control is rendered as a link, so the widget marks the event's default
/// navigation as prevented before anything else.
#[derive(Debug, Default)]
pub struct ActivationEvent {
    default_prevented: bool,
}

impl ActivationEvent {
    /// Creates a fresh event with its default action still pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the default navigation.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether the default navigation was cancelled.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Outcome of [`LikeWidget::activate`].
#[derive(Debug)]
pub enum Activation {
    /// State moved to liked and a submission is in flight.
    Submitted(Submission),
    /// A like was already registered from this mount; nothing was sent.
    AlreadyLiked,
}

/// Handle to a like submission running in the background.
///
/// Dropping it does not cancel the request. Failures are logged either way,
/// waiting on it is only useful to observe the outcome.
#[derive(Debug)]
pub struct Submission(JoinHandle<Result<(), LikeError>>);

impl Submission {
    /// Waits for the submission to be delivered.
    ///
    /// # Errors
    ///
    /// Returns the transport error of the `POST`, which has already been logged.
    pub async fn wait(self) -> Result<(), LikeError> {
        match self.0.await {
            Ok(result) => result,
            Err(err) => Err(LikeError::Unexpected(err.into())),
        }
    }
}

/// A mounted like control for one piece of content.
///
/// Mounting fetches the current count in the background. Until it arrives, or if
/// it fails, the count stays at `0`. Activating registers a like optimistically:
/// the state changes immediately and the `POST` runs in the background without
/// ever rolling the state back.
///
/// Dropping the widget unmounts it: an outstanding count fetch is aborted, and a
/// response racing the drop is discarded.
///
/// # Example
///
/// ```no_run
/// # use blog::like::{ActivationEvent, Client, LikeWidget};
/// # #[tokio::main]
/// # async fn main() {
/// let widget = LikeWidget::mount(&Client::new(), "posts/hello-world");
/// widget.settled().await;
///
/// let mut event = ActivationEvent::new();
/// widget.activate(&mut event);
///
/// println!("{}", widget.render().to_html(widget.source()));
/// # }
/// ```
#[derive(Debug)]
pub struct LikeWidget {
    client: Client,
    source: Source,
    state: Arc<RwLock<LikeState>>,
    fetch: Mutex<Option<JoinHandle<()>>>,
}

impl LikeWidget {
    /// Mounts a widget for `source`, spawning the initial count fetch.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn mount<S>(client: &Client, source: S) -> Self
    where
        S: Into<Source>,
    {
        let source = source.into();
        let state = Arc::new(RwLock::new(LikeState::default()));

        let fetch = tokio::spawn(fetch_count(
            client.clone(),
            source.clone(),
            Arc::downgrade(&state),
        ));

        Self {
            client: client.clone(),
            source,
            state,
            fetch: Mutex::new(Some(fetch)),
        }
    }

    /// Waits for the initial count fetch to finish, successfully or not.
    ///
    /// Returns immediately if it already finished or was awaited before.
    pub async fn settled(&self) {
        let fetch = self.fetch.lock().take();

        if let Some(fetch) = fetch {
            if let Err(err) = fetch.await {
                tracing::warn!(source = %self.source, %err, "like count fetch did not complete");
            }
        }
    }

    /// Handles a user activation of the control.
    ///
    /// The event's default navigation is always prevented. The first activation
    /// moves the state to liked with the count incremented, before the
    /// submission is even sent. Later activations are ignored and send nothing.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn activate(&self, event: &mut ActivationEvent) -> Activation {
        event.prevent_default();

        if !self.state.write().like() {
            tracing::debug!(source = %self.source, "ignoring repeated like");
            return Activation::AlreadyLiked;
        }

        let client = self.client.clone();
        let source = self.source.clone();

        let submission = tokio::spawn(async move {
            let result = client.like(&source).await;
            if let Err(err) = &result {
                tracing::error!(%source, %err, "failed to submit like");
            }
            result
        });

        Activation::Submitted(Submission(submission))
    }

    /// Returns what the control currently displays.
    #[must_use]
    pub fn render(&self) -> View {
        View::from(*self.state.read())
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> LikeState {
        *self.state.read()
    }

    /// Returns the content identifier this widget was mounted for.
    #[must_use]
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Tears the widget down. Equivalent to dropping it.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for LikeWidget {
    fn drop(&mut self) {
        if let Some(fetch) = self.fetch.get_mut().take() {
            fetch.abort();
        }
    }
}

async fn fetch_count(client: Client, source: Source, state: Weak<RwLock<LikeState>>) {
    match client.count(&source).await {
        Ok(count) => {
            if !apply_fetched(&state, count) {
                tracing::debug!(%source, "widget unmounted before like count arrived");
            }
        }
        Err(err) => tracing::warn!(%source, %err, "failed to fetch like count"),
    }
}

/// Applies a fetched count if the widget is still mounted.
fn apply_fetched(state: &Weak<RwLock<LikeState>>, count: u32) -> bool {
    let Some(state) = state.upgrade() else {
        return false;
    };

    state.write().fetched(count);
    true
}
