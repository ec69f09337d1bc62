use parking_lot::RwLock;
use std::sync::Arc;

/// A shared slot holding a value that is expensive to fetch but never changes
/// for the lifetime of a client, like the login of the token's owner.
#[derive(Debug, Clone, Default)]
pub struct Cache<T>(Arc<RwLock<Option<T>>>);

impl<T> Cache<T> {
    #[inline]
    pub fn empty() -> Self {
        Self(Arc::new(RwLock::new(None)))
    }

    #[inline]
    pub fn insert(&self, item: T) {
        *self.0.write() = Some(item);
    }

    #[inline]
    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.0.read().clone()
    }
}
