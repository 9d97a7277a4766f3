//! Frame identifier type.

use std::fmt;

/// Identifies a slot in the buffer pool.
///
/// Frame ids are stable for the lifetime of the pool: slot `i` keeps id `i`
/// no matter how many pages pass through it. They index the frame arena
/// directly, hence `usize`.
///
/// # Example
/// ```
/// use pagepool::FrameId;
///
/// let frame_id = FrameId::new(5);
/// assert_eq!(frame_id.index(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

impl FrameId {
    /// Create a new FrameId.
    #[inline]
    pub fn new(id: usize) -> Self {
        FrameId(id)
    }

    /// Slot index in the frame arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}
