//! In-memory block store.

use crate::common::{Error, PageId, Result};
use crate::storage::{BlockStore, Page};

/// A block store whose "file" is a vector of pages.
///
/// Follows the same contract as [`PageFile`](crate::storage::PageFile),
/// including the cursor and the closed state, so pools built on it behave
/// exactly like file-backed ones. Used for tests and benchmarks.
///
/// # Example
/// ```
/// use pagepool::{BlockStore, MemoryStore, Page, PageId};
///
/// let mut store = MemoryStore::with_pages("mem.db", 2);
/// let mut page = Page::new();
/// page.as_mut_slice()[0] = 9;
/// store.write_block(PageId::new(1), &page).unwrap();
/// assert_eq!(store.page(PageId::new(1)).unwrap().as_slice()[0], 9);
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    name: String,
    pages: Vec<Box<Page>>,
    cur_page_pos: u32,
    open: bool,
}

impl MemoryStore {
    /// Create an empty store with no pages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
            cur_page_pos: 0,
            open: true,
        }
    }

    /// Create a store holding `num_pages` zero-filled pages.
    pub fn with_pages(name: impl Into<String>, num_pages: u32) -> Self {
        let mut store = Self::new(name);
        store.pages = (0..num_pages).map(|_| Page::boxed()).collect();
        store
    }

    /// Direct view of a stored page, bypassing the cursor.
    pub fn page(&self, page_id: PageId) -> Option<&Page> {
        self.pages.get(page_id.0 as usize).map(|p| &**p)
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn check_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(Error::NotOpened(self.name.clone()))
        }
    }
}

impl BlockStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn total_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    fn cur_page_pos(&self) -> u32 {
        self.cur_page_pos
    }

    fn read_block(&mut self, page_id: PageId, page: &mut Page) -> Result<()> {
        self.check_open()?;
        let total_pages = self.total_pages();
        let stored = self
            .pages
            .get(page_id.0 as usize)
            .ok_or(Error::PageOutOfRange {
                page_id,
                total_pages,
            })?;

        page.copy_from(stored);
        self.cur_page_pos = page_id.0;
        Ok(())
    }

    fn write_block(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        self.check_open()?;
        let total_pages = self.total_pages();
        if page_id.0 > total_pages {
            return Err(Error::InvalidRange {
                page_id,
                total_pages,
            });
        }

        if page_id.0 == total_pages {
            self.pages.push(Page::boxed());
        }
        self.pages[page_id.0 as usize].copy_from(page);
        self.cur_page_pos = page_id.0;
        Ok(())
    }

    fn append_empty_block(&mut self) -> Result<()> {
        self.check_open()?;
        if self.total_pages() == u32::MAX {
            return Err(Error::InvalidRange {
                page_id: PageId::new(u32::MAX),
                total_pages: u32::MAX,
            });
        }
        self.pages.push(Page::boxed());
        self.cur_page_pos = self.total_pages() - 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.open = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_pages() {
        let store = MemoryStore::with_pages("mem", 3);
        assert_eq!(store.total_pages(), 3);
        assert_eq!(store.name(), "mem");
        assert!(store.page(PageId::new(2)).is_some());
        assert!(store.page(PageId::new(3)).is_none());
    }

    #[test]
    fn test_read_write_round_trip() {
        let mut store = MemoryStore::with_pages("mem", 2);

        let mut page = Page::new();
        page.as_mut_slice()[10] = 0x5A;
        store.write_block(PageId::new(1), &page).unwrap();

        let mut read = Page::new();
        store.read_block(PageId::new(1), &mut read).unwrap();
        assert_eq!(read.as_slice()[10], 0x5A);
        assert_eq!(store.cur_page_pos(), 1);
    }

    #[test]
    fn test_range_checks() {
        let mut store = MemoryStore::with_pages("mem", 1);

        assert!(matches!(
            store.read_block(PageId::new(1), &mut Page::new()),
            Err(Error::PageOutOfRange { .. })
        ));
        assert!(matches!(
            store.write_block(PageId::new(2), &Page::new()),
            Err(Error::InvalidRange { .. })
        ));

        store.write_block(PageId::new(1), &Page::new()).unwrap();
        assert_eq!(store.total_pages(), 2);
    }

    #[test]
    fn test_ensure_capacity() {
        let mut store = MemoryStore::new("mem");
        store.ensure_capacity(3).unwrap();
        assert_eq!(store.total_pages(), 3);
        assert_eq!(store.cur_page_pos(), 2);
    }

    #[test]
    fn test_closed_store_rejects_io() {
        let mut store = MemoryStore::with_pages("mem", 1);
        store.close().unwrap();

        assert!(!store.is_open());
        assert!(matches!(
            store.read_block(PageId::new(0), &mut Page::new()),
            Err(Error::NotOpened(_))
        ));
        assert!(matches!(store.append_empty_block(), Err(Error::NotOpened(_))));
        assert!(matches!(store.close(), Err(Error::NotOpened(_))));
    }
}
