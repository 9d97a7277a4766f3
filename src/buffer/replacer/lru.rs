//! LRU (Least Recently Used) replacement policy.

use crate::buffer::FrameTable;
use crate::common::FrameId;

use super::Replacer;

/// Evicts the page whose last pin is oldest.
///
/// Every hit moves the frame to the front of the ordering, so the rear
/// holds the least recently used page. Pinned frames near the rear are
/// skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LruReplacer;

impl Replacer for LruReplacer {
    fn record_hit(&self, table: &mut FrameTable, frame_id: FrameId) {
        table.promote_to_front(frame_id);
    }
}
