//! RAII guards for page access.
//!
//! - [`PageReadGuard`] - read access to a pinned page
//! - [`PageWriteGuard`] - write access; marks the page dirty on drop
//!
//! Both guards hold the page's pin and release it when dropped. A guard
//! borrows the pool mutably, so only one guard is live at a time.

use std::ops::{Deref, DerefMut};

use crate::buffer::{BufferPool, PageHandle};
use crate::common::{FrameId, PageId};
use crate::storage::{BlockStore, Page};

/// Guard for read-only page access.
///
/// # Example
/// ```
/// use pagepool::{BufferPool, MemoryStore, PageId, ReplacementStrategy};
///
/// let mut pool =
///     BufferPool::new(MemoryStore::with_pages("mem.db", 1), 1, ReplacementStrategy::Fifo)
///         .unwrap();
/// {
///     let guard = pool.fetch_page(PageId::new(0)).unwrap();
///     assert_eq!(guard.as_slice()[0], 0);
/// }
/// assert_eq!(pool.pin_count(PageId::new(0)), Some(0));
/// ```
pub struct PageReadGuard<'a, S: BlockStore> {
    pool: &'a mut BufferPool<S>,
    handle: PageHandle,
}

impl<'a, S: BlockStore> PageReadGuard<'a, S> {
    /// Called by `BufferPool::fetch_page()` once the page is pinned.
    pub(crate) fn new(pool: &'a mut BufferPool<S>, handle: PageHandle) -> Self {
        Self { pool, handle }
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.handle.page_id()
    }

    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.handle.frame_id()
    }
}

impl<S: BlockStore> Deref for PageReadGuard<'_, S> {
    type Target = Page;

    #[inline]
    fn deref(&self) -> &Page {
        self.pool.frame_page(self.handle.frame_id())
    }
}

impl<S: BlockStore> Drop for PageReadGuard<'_, S> {
    fn drop(&mut self) {
        self.pool.unpin_frame(self.handle.frame_id(), false);
    }
}

/// Guard for write access to a page.
///
/// The page is marked dirty and unpinned when the guard is dropped, whether
/// or not anything was written.
///
/// # Example
/// ```
/// use pagepool::{BufferPool, MemoryStore, PageId, ReplacementStrategy};
///
/// let mut pool =
///     BufferPool::new(MemoryStore::with_pages("mem.db", 1), 1, ReplacementStrategy::Lru)
///         .unwrap();
/// {
///     let mut guard = pool.fetch_page_mut(PageId::new(0)).unwrap();
///     guard.as_mut_slice()[0] = 0xFF;
/// }
/// assert_eq!(pool.dirty_flags(), vec![true]);
/// ```
pub struct PageWriteGuard<'a, S: BlockStore> {
    pool: &'a mut BufferPool<S>,
    handle: PageHandle,
}

impl<'a, S: BlockStore> PageWriteGuard<'a, S> {
    /// Called by `BufferPool::fetch_page_mut()` once the page is pinned.
    pub(crate) fn new(pool: &'a mut BufferPool<S>, handle: PageHandle) -> Self {
        Self { pool, handle }
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.handle.page_id()
    }

    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.handle.frame_id()
    }
}

impl<S: BlockStore> Deref for PageWriteGuard<'_, S> {
    type Target = Page;

    #[inline]
    fn deref(&self) -> &Page {
        self.pool.frame_page(self.handle.frame_id())
    }
}

impl<S: BlockStore> DerefMut for PageWriteGuard<'_, S> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Page {
        self.pool.frame_page_mut(self.handle.frame_id())
    }
}

impl<S: BlockStore> Drop for PageWriteGuard<'_, S> {
    fn drop(&mut self) {
        self.pool.unpin_frame(self.handle.frame_id(), true);
    }
}

#[cfg(test)]
mod tests {
    use crate::buffer::{BufferPool, ReplacementStrategy};
    use crate::common::PageId;
    use crate::storage::MemoryStore;

    fn create_pool() -> BufferPool<MemoryStore> {
        BufferPool::new(
            MemoryStore::with_pages("guard.db", 4),
            2,
            ReplacementStrategy::Lru,
        )
        .unwrap()
    }

    #[test]
    fn test_read_guard_does_not_dirty() {
        let mut pool = create_pool();
        {
            let guard = pool.fetch_page(PageId::new(2)).unwrap();
            assert_eq!(guard.page_id(), PageId::new(2));
            assert_eq!(guard.frame_id().index(), 0);
        }
        assert_eq!(pool.dirty_flags(), vec![false, false]);
        assert_eq!(pool.fix_counts(), vec![0, 0]);
    }

    #[test]
    fn test_write_guard_marks_dirty_even_without_writes() {
        let mut pool = create_pool();
        {
            let _guard = pool.fetch_page_mut(PageId::new(1)).unwrap();
        }
        assert_eq!(pool.dirty_flags(), vec![true, false]);
        assert_eq!(pool.pin_count(PageId::new(1)), Some(0));
    }

    #[test]
    fn test_guard_keeps_existing_pins() {
        let mut pool = create_pool();
        pool.pin(PageId::new(0)).unwrap();
        {
            let guard = pool.fetch_page(PageId::new(0)).unwrap();
            assert_eq!(guard.page_id(), PageId::new(0));
        }
        assert_eq!(pool.pin_count(PageId::new(0)), Some(1));
    }

    #[test]
    fn test_write_then_read_through_guards() {
        let mut pool = create_pool();
        {
            let mut guard = pool.fetch_page_mut(PageId::new(3)).unwrap();
            guard.as_mut_slice()[100] = 0x9C;
        }
        let guard = pool.fetch_page(PageId::new(3)).unwrap();
        assert_eq!(guard.as_slice()[100], 0x9C);
    }
}
