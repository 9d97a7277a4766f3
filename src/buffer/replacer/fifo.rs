//! FIFO (First-In-First-Out) replacement policy.

use crate::buffer::FrameTable;
use crate::common::FrameId;

use super::Replacer;

/// Evicts pages in the order they were loaded into the pool.
///
/// The ordering only changes when a page is loaded; hits leave it alone.
/// Pinned pages are skipped during eviction, so the victim is the oldest
/// *unpinned* page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoReplacer;

impl Replacer for FifoReplacer {
    fn record_hit(&self, _table: &mut FrameTable, _frame_id: FrameId) {}
}
