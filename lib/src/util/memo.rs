use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::Result;

/// A value computed at most once and then shared.
///
/// A failed computation is not cached: the next call tries again.
#[derive(Debug)]
pub struct Memo<T>(OnceCell<Arc<T>>);

impl<T> Memo<T> {
    #[inline(always)]
    pub fn new() -> Self {
        Memo(OnceCell::new())
    }

    pub fn get_or_try_init<F>(&self, with: F) -> Result<Arc<T>>
        where F: FnOnce() -> Result<T>
    {
        self.0.get_or_try_init(|| with().map(Arc::new)).cloned()
    }

    #[inline(always)]
    pub fn get(&self) -> Option<&Arc<T>> {
        self.0.get()
    }

    /// Forgets the cached value so the next access recomputes it.
    pub fn invalidate(&mut self) {
        self.0.take();
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Memo::new()
    }
}
