//! Frame - a slot in the buffer pool.
//!
//! A [`Frame`] holds a [`Page`] plus metadata needed for buffer management:
//! - Which page is loaded (if any)
//! - Pin count for reference counting
//! - Dirty flag for write-back tracking

use crate::common::{FrameId, PageId};
use crate::storage::Page;

/// A frame in the buffer pool.
///
/// Frames are the "slots" of the pool. The pool allocates all of them at
/// startup; each keeps its [`FrameId`] for life while pages come and go.
///
/// The pool has a single owner, so plain fields suffice: every mutation
/// goes through `&mut BufferPool`.
#[derive(Debug)]
pub struct Frame {
    /// Stable slot identity.
    frame_id: FrameId,

    /// The page data.
    page: Box<Page>,

    /// Which page is currently loaded, or None if frame is empty.
    page_id: Option<PageId>,

    /// Number of active references to this frame.
    pin_count: u32,

    /// Whether the page has been modified since it was last written back.
    is_dirty: bool,
}

impl Frame {
    /// Create a new empty frame.
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            page: Page::boxed(),
            page_id: None,
            pin_count: 0,
            is_dirty: false,
        }
    }

    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    // ========================================================================
    // Page access
    // ========================================================================

    #[inline]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[inline]
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Exchange the frame's buffer with `page`.
    ///
    /// Used to install a freshly read page without copying it.
    pub(crate) fn swap_page(&mut self, page: &mut Box<Page>) {
        std::mem::swap(&mut self.page, page);
    }

    /// Get the page ID of the loaded page.
    #[inline]
    pub fn page_id(&self) -> Option<PageId> {
        self.page_id
    }

    /// Make this frame hold `page_id` with one pin and a clean buffer.
    ///
    /// Whatever the frame held before is forgotten; write-back is the
    /// caller's job.
    pub(crate) fn assign(&mut self, page_id: PageId) {
        self.page_id = Some(page_id);
        self.pin_count = 1;
        self.is_dirty = false;
    }

    // ========================================================================
    // Pin count operations
    // ========================================================================

    /// Increment the pin count. Returns the new pin count.
    #[inline]
    pub fn pin(&mut self) -> u32 {
        self.pin_count += 1;
        self.pin_count
    }

    /// Decrement the pin count. Returns the new pin count, or `None` if the
    /// frame was not pinned.
    #[inline]
    pub fn unpin(&mut self) -> Option<u32> {
        self.pin_count = self.pin_count.checked_sub(1)?;
        Some(self.pin_count)
    }

    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count > 0
    }

    // ========================================================================
    // Dirty flag operations
    // ========================================================================

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.is_dirty = true;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.is_dirty = false;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    // ========================================================================
    // Frame state queries
    // ========================================================================

    /// Check if the frame is empty (no page loaded).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.page_id.is_none()
    }

    /// Check if the frame can be evicted.
    #[inline]
    pub fn is_evictable(&self) -> bool {
        self.page_id.is_some() && !self.is_pinned()
    }
}
