/// Per-mount like state.
///
/// The count and the liked flag only ever change together, so they live in one
/// tagged value. `Liked` is terminal for the lifetime of a mounted widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    /// No like registered yet from this mount.
    NotLiked {
        /// Displayed like count.
        count: u32,
    },
    /// A like was registered from this mount.
    Liked {
        /// Displayed like count, including this mount's like.
        count: u32,
    },
}

impl Default for LikeState {
    fn default() -> Self {
        Self::NotLiked { count: 0 }
    }
}

impl LikeState {
    /// The count to display. This is an optimistic local view and may drift
    /// from the service's counter.
    #[must_use]
    pub fn count(&self) -> u32 {
        match *self {
            Self::NotLiked { count } | Self::Liked { count } => count,
        }
    }

    /// Whether a like was registered from this mount.
    #[must_use]
    pub fn is_liked(&self) -> bool {
        matches!(self, Self::Liked { .. })
    }

    /// Applies the count fetched on mount.
    ///
    /// If a like was registered before the fetch came back, it is kept on top
    /// of the remote count.
    pub(crate) fn fetched(&mut self, remote: u32) {
        match self {
            Self::NotLiked { count } => *count = remote,
            Self::Liked { count } => *count = remote.saturating_add(1),
        }
    }

    /// Registers a like, returning `false` if one was already registered.
    pub(crate) fn like(&mut self) -> bool {
        match *self {
            Self::NotLiked { count } => {
                *self = Self::Liked {
                    count: count.saturating_add(1),
                };
                true
            }
            Self::Liked { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_not_liked_at_zero() {
        let state = LikeState::default();
        assert_eq!(0, state.count());
        assert!(!state.is_liked());
    }

    #[test]
    fn like_is_terminal() {
        let mut state = LikeState::NotLiked { count: 7 };

        assert!(state.like());
        assert_eq!(LikeState::Liked { count: 8 }, state);

        assert!(!state.like());
        assert_eq!(LikeState::Liked { count: 8 }, state);
    }

    #[test]
    fn late_fetch_keeps_local_like() {
        let mut state = LikeState::default();
        assert!(state.like());

        state.fetched(41);
        assert_eq!(LikeState::Liked { count: 42 }, state);
    }

    #[test]
    fn fetch_overwrites_count() {
        let mut state = LikeState::default();
        state.fetched(7);
        assert_eq!(LikeState::NotLiked { count: 7 }, state);
    }

    #[test]
    fn should_saturate_instead_of_overflowing() {
        let mut state = LikeState::NotLiked { count: u32::MAX };
        assert!(state.like());
        assert_eq!(u32::MAX, state.count());
    }
}
