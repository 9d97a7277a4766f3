//! Frame table - the frame arena and its replacement ordering.
//!
//! Frames live in a fixed `Vec` indexed by [`FrameId`]. Every filled frame
//! is also linked into one doubly-linked list whose links are frame ids:
//!
//! ```text
//!   front                                            rear
//!  (newest / most recently used)            (eviction end)
//!   ┌────────┐   ┌────────┐   ┌────────┐   ┌────────┐
//!   │Frame 2 │◀─▶│Frame 0 │◀─▶│Frame 3 │◀─▶│Frame 1 │
//!   └────────┘   └────────┘   └────────┘   └────────┘
//! ```
//!
//! Empty frames are never linked. Replacers decide when frames move to the
//! front; victims are searched from the rear.

use crate::buffer::Frame;
use crate::common::{FrameId, PageId};
use crate::storage::Page;

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<FrameId>,
    next: Option<FrameId>,
    linked: bool,
}

/// Fixed-capacity arena of frames plus their replacement ordering.
#[derive(Debug)]
pub struct FrameTable {
    frames: Vec<Frame>,
    links: Vec<Link>,
    front: Option<FrameId>,
    rear: Option<FrameId>,
    /// Number of frames holding a page.
    filled: usize,
}

impl FrameTable {
    /// Allocate `capacity` empty frames.
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: (0..capacity).map(|i| Frame::new(FrameId::new(i))).collect(),
            links: vec![Link::default(); capacity],
            front: None,
            rear: None,
            filled: 0,
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Frame holding `page_id`, if resident.
    pub fn find_by_page(&self, page_id: PageId) -> Option<FrameId> {
        self.frames
            .iter()
            .find(|f| f.page_id() == Some(page_id))
            .map(Frame::frame_id)
    }

    /// Lookup by stable slot identity.
    pub fn find_by_frame(&self, frame_id: FrameId) -> Option<&Frame> {
        self.frames.get(frame_id.index())
    }

    /// # Panics
    /// Panics if `frame_id` is outside the table.
    #[inline]
    pub fn frame(&self, frame_id: FrameId) -> &Frame {
        &self.frames[frame_id.index()]
    }

    /// # Panics
    /// Panics if `frame_id` is outside the table.
    #[inline]
    pub fn frame_mut(&mut self, frame_id: FrameId) -> &mut Frame {
        &mut self.frames[frame_id.index()]
    }

    /// Frames in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.frames.iter()
    }

    /// Lowest-numbered empty frame.
    pub fn free_slot(&self) -> Option<FrameId> {
        if self.is_full() {
            return None;
        }
        self.frames
            .iter()
            .find(|f| f.is_empty())
            .map(Frame::frame_id)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn filled(&self) -> usize {
        self.filled
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.filled == self.capacity()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    // ========================================================================
    // Residency
    // ========================================================================

    /// Install `page` as the contents of `frame_id`, now holding `page_id`
    /// with one pin.
    ///
    /// `page` receives the frame's previous buffer. Ordering is untouched.
    pub(crate) fn load(&mut self, frame_id: FrameId, page_id: PageId, page: &mut Box<Page>) {
        let frame = &mut self.frames[frame_id.index()];
        if frame.is_empty() {
            self.filled += 1;
        }
        frame.swap_page(page);
        frame.assign(page_id);
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Whether the frame is part of the ordering.
    #[inline]
    pub fn is_linked(&self, frame_id: FrameId) -> bool {
        self.links[frame_id.index()].linked
    }

    /// Frame at the front (newest / most recently used end).
    #[inline]
    pub fn front(&self) -> Option<FrameId> {
        self.front
    }

    /// Frame at the rear (eviction end).
    #[inline]
    pub fn rear(&self) -> Option<FrameId> {
        self.rear
    }

    /// Link an unlinked frame at the front.
    pub fn insert_at_front(&mut self, frame_id: FrameId) {
        debug_assert!(!self.is_linked(frame_id), "{} is already linked", frame_id);

        let old_front = self.front;
        self.links[frame_id.index()] = Link {
            prev: None,
            next: old_front,
            linked: true,
        };

        match old_front {
            Some(f) => self.links[f.index()].prev = Some(frame_id),
            None => self.rear = Some(frame_id),
        }
        self.front = Some(frame_id);
    }

    /// Unlink a frame, joining its neighbours. Unlinked frames are ignored.
    pub fn remove_from_ordering(&mut self, frame_id: FrameId) {
        let link = self.links[frame_id.index()];
        if !link.linked {
            return;
        }

        match link.prev {
            Some(p) => self.links[p.index()].next = link.next,
            None => self.front = link.next,
        }
        match link.next {
            Some(n) => self.links[n.index()].prev = link.prev,
            None => self.rear = link.prev,
        }

        self.links[frame_id.index()] = Link::default();
    }

    /// Move a linked frame to the front.
    pub fn promote_to_front(&mut self, frame_id: FrameId) {
        if self.front == Some(frame_id) {
            return;
        }
        self.remove_from_ordering(frame_id);
        self.insert_at_front(frame_id);
    }

    /// Frames from the rear toward the front.
    ///
    /// Each call starts a fresh walk from the current rear.
    pub fn eviction_order(&self) -> EvictionOrder<'_> {
        EvictionOrder {
            table: self,
            cursor: self.rear,
        }
    }
}

/// Lazy walk over linked frames, eviction end first.
pub struct EvictionOrder<'a> {
    table: &'a FrameTable,
    cursor: Option<FrameId>,
}

impl<'a> Iterator for EvictionOrder<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let frame_id = self.cursor?;
        self.cursor = self.table.links[frame_id.index()].prev;
        Some(self.table.frame(frame_id))
    }
}
