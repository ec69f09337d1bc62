//! A client and headless widget for the `ilikeit` like counting service.
//!
//! The service keeps one integer counter per content identifier (the `source`).
//! Reading it is a `GET {base}?source={source}` answering `{"like_count": N}`,
//! and incrementing it is a `POST` to the same URL. There is no authentication
//! and no idempotency: every `POST` counts.
//!
//! [`LikeWidget`] is the interactive piece embedded on every article. It fetches
//! the count once when mounted, and applies likes optimistically, firing the
//! submission in the background.

pub mod client;
pub mod errors;
pub mod state;
pub mod view;
pub mod widget;

mod api;

pub use client::{Client, ClientBuilder, Source};
pub use state::LikeState;
pub use view::{Icon, Palette, View};
pub use widget::{Activation, ActivationEvent, LikeWidget, Submission};
