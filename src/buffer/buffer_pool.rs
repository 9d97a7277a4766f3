//! Buffer pool - the core page caching layer.
//!
//! The [`BufferPool`] provides:
//! - Page caching between a block store and memory
//! - Pin-based reference counting
//! - Dirty page write-back on eviction, flush and shutdown
//! - FIFO or LRU replacement, fixed at construction

use std::path::Path;

use log::{debug, trace, warn};

use crate::buffer::replacer::{ReplacementPolicy, ReplacementStrategy, Replacer};
use crate::buffer::{BufferPoolStats, FrameTable, PageReadGuard, PageWriteGuard};
use crate::common::{Error, FrameId, PageId, Result};
use crate::storage::{BlockStore, Page, PageFile};

/// A pinned page: which page, and which frame holds it.
///
/// Handles are plain tokens. The bytes stay inside the pool and are
/// borrowed through [`BufferPool::data`] / [`BufferPool::data_mut`], which
/// refuse a handle whose frame has since been given to another page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle {
    page_id: PageId,
    frame_id: FrameId,
}

impl PageHandle {
    fn new(page_id: PageId, frame_id: FrameId) -> Self {
        Self { page_id, frame_id }
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }
}

/// Caches pages of one block store in a fixed number of frames.
///
/// # Architecture
/// ```text
/// ┌─────────────────────────────────────────────────────────────┐
/// │                        BufferPool                           │
/// │  ┌──────────────────────────────────────────────────────┐   │
/// │  │ FrameTable: [Frame0] [Frame1] [Frame2] ...           │   │
/// │  │             front ◀──── ordering ────▶ rear          │   │
/// │  └──────────────────────────────────────────────────────┘   │
/// │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
/// │  │    policy    │  │    store     │  │    stats     │      │
/// │  │  FIFO | LRU  │  │ BlockStore   │  │ reads/writes │      │
/// │  └──────────────┘  └──────────────┘  └──────────────┘      │
/// └─────────────────────────────────────────────────────────────┘
/// ```
///
/// # Ownership
/// The pool has one owner. Every operation takes `&mut self` and runs to
/// completion, I/O included, before returning. Pin counts are plain
/// reference counts that keep frames from being evicted; they are not locks.
///
/// # Usage
/// ```
/// use pagepool::{BufferPool, MemoryStore, PageId, ReplacementStrategy};
///
/// let store = MemoryStore::with_pages("mem.db", 4);
/// let mut pool = BufferPool::new(store, 2, ReplacementStrategy::Lru).unwrap();
///
/// let handle = pool.pin(PageId::new(0)).unwrap();
/// pool.data_mut(&handle).unwrap()[0] = 0xAB;
/// pool.mark_dirty(PageId::new(0)).unwrap();
/// pool.unpin(PageId::new(0)).unwrap();
///
/// pool.force_flush_pool().unwrap();
/// assert_eq!(pool.num_read_io(), 1);
/// assert_eq!(pool.num_write_io(), 1);
/// pool.shutdown().unwrap();
/// ```
#[derive(Debug)]
pub struct BufferPool<S: BlockStore = PageFile> {
    /// Fixed pool of frames and their replacement ordering.
    table: FrameTable,

    /// Strategy requested at construction.
    strategy: ReplacementStrategy,

    /// Engine for `strategy`; `None` when the strategy has no engine.
    policy: Option<ReplacementPolicy>,

    /// Handles all block I/O.
    store: S,

    /// Name of the backing file, captured at construction.
    file_name: String,

    /// Read target for misses, swapped into the frame once the read succeeds.
    scratch: Box<Page>,

    stats: BufferPoolStats,
}

impl BufferPool<PageFile> {
    /// Open the page file at `path` and build a pool over it.
    ///
    /// # Errors
    /// - `Error::FileNotFound` if the file cannot be opened
    /// - `Error::InvalidCapacity` if `capacity` is 0
    pub fn open<P: AsRef<Path>>(
        path: P,
        capacity: usize,
        strategy: ReplacementStrategy,
    ) -> Result<Self> {
        let store = PageFile::open(path)?;
        Self::new(store, capacity, strategy)
    }
}

impl<S: BlockStore> BufferPool<S> {
    /// Create a pool of `capacity` empty frames over `store`.
    ///
    /// A strategy without an engine is accepted here; pins on such a pool
    /// fail with `Error::InvalidStrategy`.
    ///
    /// # Errors
    /// Returns `Error::InvalidCapacity` if `capacity` is 0.
    pub fn new(store: S, capacity: usize, strategy: ReplacementStrategy) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        let policy = ReplacementPolicy::for_strategy(strategy);
        if policy.is_none() {
            warn!(
                "buffer pool over {} uses unsupported strategy {}; pins will fail",
                store.name(),
                strategy
            );
        }

        let file_name = store.name().to_string();
        debug!(
            "opened buffer pool over {} with {} frames ({})",
            file_name, capacity, strategy
        );

        Ok(Self {
            table: FrameTable::new(capacity),
            strategy,
            policy,
            store,
            file_name,
            scratch: Page::boxed(),
            stats: BufferPoolStats::default(),
        })
    }

    // ========================================================================
    // Public API: Pin and unpin
    // ========================================================================

    /// Pin a page, loading it if it is not resident.
    ///
    /// On a miss the page goes into an empty frame if there is one, else
    /// into the policy's victim, which is written back first if dirty.
    ///
    /// # Errors
    /// - `Error::InvalidStrategy` if the pool's strategy has no engine
    /// - `Error::FullBuffer` if every frame is pinned
    /// - `Error::WriteFailed` if the victim's write-back fails; the victim
    ///   stays resident and dirty
    /// - read errors from the store (`PageOutOfRange`, `NotOpened`, `Io`);
    ///   the requested page is not made resident
    ///
    /// A failed pin leaves hit and miss counts unchanged.
    pub fn pin(&mut self, page_id: PageId) -> Result<PageHandle> {
        let policy = self.policy.ok_or(Error::InvalidStrategy(self.strategy))?;

        if let Some(frame_id) = self.table.find_by_page(page_id) {
            let pins = self.table.frame_mut(frame_id).pin();
            policy.record_hit(&mut self.table, frame_id);
            self.stats.cache_hits += 1;
            trace!("hit {} in {} (pin count {})", page_id, frame_id, pins);
            return Ok(PageHandle::new(page_id, frame_id));
        }

        let frame_id = policy.victim(&self.table).ok_or_else(|| {
            warn!(
                "cannot load {}: all {} frames are pinned",
                page_id,
                self.table.capacity()
            );
            Error::FullBuffer
        })?;

        let evicted = self.table.frame(frame_id).page_id();
        if self.table.frame(frame_id).is_dirty() {
            self.write_frame(frame_id)?;
        }

        self.store.read_block(page_id, &mut self.scratch)?;
        self.stats.cache_misses += 1;
        self.stats.pages_read += 1;

        self.table.load(frame_id, page_id, &mut self.scratch);
        policy.record_load(&mut self.table, frame_id);

        match evicted {
            Some(old) => {
                self.stats.evictions += 1;
                debug!("evicted {} from {} to load {}", old, frame_id, page_id);
            }
            None => trace!("loaded {} into empty {}", page_id, frame_id),
        }

        Ok(PageHandle::new(page_id, frame_id))
    }

    /// Drop one pin on a resident page.
    ///
    /// # Errors
    /// - `Error::PageNotFound` if the page is not resident
    /// - `Error::PageNotPinned` if its pin count is already 0
    pub fn unpin(&mut self, page_id: PageId) -> Result<()> {
        let frame_id = self.resident_frame(page_id)?;
        let pins = self
            .table
            .frame_mut(frame_id)
            .unpin()
            .ok_or(Error::PageNotPinned(page_id))?;

        trace!("unpinned {} (pin count {})", page_id, pins);
        Ok(())
    }

    /// Record that a resident page was modified.
    ///
    /// # Errors
    /// Returns `Error::PageNotFound` if the page is not resident.
    pub fn mark_dirty(&mut self, page_id: PageId) -> Result<()> {
        let frame_id = self.resident_frame(page_id)?;
        self.table.frame_mut(frame_id).mark_dirty();
        Ok(())
    }

    // ========================================================================
    // Public API: Page access
    // ========================================================================

    /// Bytes of a pinned page.
    ///
    /// # Errors
    /// Returns `Error::PageNotFound` if the handle's frame no longer holds
    /// its page.
    pub fn data(&self, handle: &PageHandle) -> Result<&[u8]> {
        self.check_handle(handle)?;
        Ok(self.table.frame(handle.frame_id).page().as_slice())
    }

    /// Mutable bytes of a pinned page.
    ///
    /// Writing through this does not mark the page dirty; call
    /// [`mark_dirty`](Self::mark_dirty) or use a [`PageWriteGuard`].
    ///
    /// # Errors
    /// Returns `Error::PageNotFound` if the handle's frame no longer holds
    /// its page.
    pub fn data_mut(&mut self, handle: &PageHandle) -> Result<&mut [u8]> {
        self.check_handle(handle)?;
        Ok(self.table.frame_mut(handle.frame_id).page_mut().as_mut_slice())
    }

    /// Pin a page for reading; the guard unpins it on drop.
    pub fn fetch_page(&mut self, page_id: PageId) -> Result<PageReadGuard<'_, S>> {
        let handle = self.pin(page_id)?;
        Ok(PageReadGuard::new(self, handle))
    }

    /// Pin a page for writing; the guard marks it dirty and unpins it on drop.
    pub fn fetch_page_mut(&mut self, page_id: PageId) -> Result<PageWriteGuard<'_, S>> {
        let handle = self.pin(page_id)?;
        Ok(PageWriteGuard::new(self, handle))
    }

    // ========================================================================
    // Public API: Write-back
    // ========================================================================

    /// Write a resident page to the store whether or not it is dirty.
    ///
    /// # Errors
    /// - `Error::PageNotFound` if the page is not resident
    /// - `Error::WriteFailed` if the write fails
    pub fn force_page(&mut self, page_id: PageId) -> Result<()> {
        let frame_id = self.resident_frame(page_id)?;
        self.write_frame(frame_id)
    }

    /// Write back every dirty, unpinned page.
    ///
    /// # Errors
    /// Stops at the first failed write and returns `Error::WriteFailed`.
    /// Pages written before it are clean; the rest are untouched.
    pub fn force_flush_pool(&mut self) -> Result<()> {
        let frames: Vec<FrameId> = self
            .table
            .iter()
            .filter(|f| f.is_dirty() && !f.is_pinned())
            .map(|f| f.frame_id())
            .collect();

        for frame_id in frames {
            self.write_frame(frame_id)?;
        }
        Ok(())
    }

    /// Write back every dirty page and close the store.
    ///
    /// Pinned pages do not block shutdown. Their dirty bytes are written too,
    /// since nothing can reach them afterwards, and each is logged.
    ///
    /// # Errors
    /// Stops at the first failed write (`Error::WriteFailed`) or close
    /// failure. Pages written before the failure are on disk; the pool is
    /// consumed either way, so the remaining dirty pages are lost.
    pub fn shutdown(mut self) -> Result<()> {
        for frame in self.table.iter().filter(|f| f.is_pinned()) {
            if let Some(page_id) = frame.page_id() {
                warn!(
                    "shutting down {} while {} is pinned {} time(s)",
                    self.file_name,
                    page_id,
                    frame.pin_count()
                );
            }
        }

        let dirty: Vec<FrameId> = self
            .table
            .iter()
            .filter(|f| f.is_dirty())
            .map(|f| f.frame_id())
            .collect();

        for frame_id in dirty {
            self.write_frame(frame_id)?;
        }

        self.store.close()?;
        debug!("shut down buffer pool over {}: {}", self.file_name, self.stats);
        Ok(())
    }

    /// Grow the backing file to at least `num_pages` pages.
    pub fn ensure_capacity(&mut self, num_pages: u32) -> Result<()> {
        self.store.ensure_capacity(num_pages)
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Page held by each frame, by frame index; `None` for empty frames.
    pub fn frame_contents(&self) -> Vec<Option<PageId>> {
        self.table.iter().map(|f| f.page_id()).collect()
    }

    /// Dirty flag of each frame, by frame index.
    pub fn dirty_flags(&self) -> Vec<bool> {
        self.table.iter().map(|f| f.is_dirty()).collect()
    }

    /// Pin count of each frame, by frame index.
    pub fn fix_counts(&self) -> Vec<u32> {
        self.table.iter().map(|f| f.pin_count()).collect()
    }

    /// Blocks read from the store since the pool was created.
    pub fn num_read_io(&self) -> u64 {
        self.stats.pages_read
    }

    /// Blocks written to the store since the pool was created.
    pub fn num_write_io(&self) -> u64 {
        self.stats.pages_written
    }

    pub fn stats(&self) -> BufferPoolStats {
        self.stats
    }

    /// Pin count of a resident page.
    pub fn pin_count(&self, page_id: PageId) -> Option<u32> {
        self.table
            .find_by_page(page_id)
            .map(|frame_id| self.table.frame(frame_id).pin_count())
    }

    pub fn is_resident(&self, page_id: PageId) -> bool {
        self.table.find_by_page(page_id).is_some()
    }

    /// Number of frames holding a page.
    pub fn resident_count(&self) -> usize {
        self.table.filled()
    }

    /// Number of frames in the pool.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn strategy(&self) -> ReplacementStrategy {
        self.strategy
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The underlying block store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Internal: Called by page guards
    // ========================================================================

    pub(crate) fn frame_page(&self, frame_id: FrameId) -> &Page {
        self.table.frame(frame_id).page()
    }

    pub(crate) fn frame_page_mut(&mut self, frame_id: FrameId) -> &mut Page {
        self.table.frame_mut(frame_id).page_mut()
    }

    /// Unpin by frame. Guards hold their pin, so the frame is still theirs.
    pub(crate) fn unpin_frame(&mut self, frame_id: FrameId, is_dirty: bool) {
        let frame = self.table.frame_mut(frame_id);
        if is_dirty {
            frame.mark_dirty();
        }
        let unpinned = frame.unpin();
        debug_assert!(unpinned.is_some(), "guard released unpinned {}", frame_id);
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn resident_frame(&self, page_id: PageId) -> Result<FrameId> {
        self.table
            .find_by_page(page_id)
            .ok_or(Error::PageNotFound(page_id))
    }

    fn check_handle(&self, handle: &PageHandle) -> Result<()> {
        match self.table.find_by_frame(handle.frame_id) {
            Some(frame) if frame.page_id() == Some(handle.page_id) => Ok(()),
            _ => Err(Error::PageNotFound(handle.page_id)),
        }
    }

    /// Write a frame's page to the store and mark it clean.
    fn write_frame(&mut self, frame_id: FrameId) -> Result<()> {
        let frame = self.table.frame(frame_id);
        let Some(page_id) = frame.page_id() else {
            return Ok(());
        };

        self.store
            .write_block(page_id, frame.page())
            .map_err(|source| Error::WriteFailed {
                page_id,
                source: Box::new(source),
            })?;

        self.table.frame_mut(frame_id).clear_dirty();
        self.stats.pages_written += 1;
        debug!("wrote back {} from {}", page_id, frame_id);
        Ok(())
    }
}
