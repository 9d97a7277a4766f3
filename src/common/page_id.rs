//! Page identifier type.

use std::fmt;

/// Identifies a block in the backing page file.
///
/// Page numbers are unsigned, so a negative page number cannot be
/// expressed. The "no page" state of a frame is `Option::<PageId>::None`
/// rather than a magic value.
///
/// # Example
/// ```
/// use pagepool::PageId;
///
/// let page_id = PageId::new(42);
/// assert_eq!(page_id.0, 42);
/// assert_eq!(page_id.offset(), 42 * 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Create a new PageId.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    /// Byte offset of this page within a page file.
    #[inline]
    pub fn offset(self) -> u64 {
        self.0 as u64 * crate::common::config::PAGE_SIZE as u64
    }
}

impl From<u32> for PageId {
    fn from(id: u32) -> Self {
        PageId(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({})", self.0)
    }
}
