//! The block I/O contract consumed by the buffer pool.

use crate::common::{Error, PageId, Result};
use crate::storage::Page;

/// Synchronous, fixed-size block I/O over a single named file.
///
/// A store tracks how many pages the file holds and a position cursor
/// that every read and write moves to the page it touched. All buffers
/// are exactly one [`Page`].
///
/// Implementations:
/// - [`PageFile`](crate::storage::PageFile) - a file on disk
/// - [`MemoryStore`](crate::storage::MemoryStore) - pages in memory
pub trait BlockStore {
    /// Name of the backing file.
    fn name(&self) -> &str;

    /// Number of pages currently in the file.
    fn total_pages(&self) -> u32;

    /// Page the cursor points at.
    fn cur_page_pos(&self) -> u32;

    /// Read one block into `page`.
    ///
    /// # Errors
    /// - `Error::NotOpened` if the store is closed
    /// - `Error::PageOutOfRange` if `page_id >= total_pages()`
    fn read_block(&mut self, page_id: PageId, page: &mut Page) -> Result<()>;

    /// Write one block from `page`.
    ///
    /// Writing page `total_pages()` extends the file by one block.
    ///
    /// # Errors
    /// - `Error::NotOpened` if the store is closed
    /// - `Error::InvalidRange` if `page_id > total_pages()`
    fn write_block(&mut self, page_id: PageId, page: &Page) -> Result<()>;

    /// Append one zero-filled block and move the cursor onto it.
    fn append_empty_block(&mut self) -> Result<()>;

    /// Close the store. Later I/O fails with `Error::NotOpened`.
    fn close(&mut self) -> Result<()>;

    /// Grow the file with zero-filled blocks until it holds at least
    /// `num_pages` pages. A file that is already large enough is untouched.
    fn ensure_capacity(&mut self, num_pages: u32) -> Result<()> {
        while self.total_pages() < num_pages {
            self.append_empty_block()?;
        }
        Ok(())
    }

    fn read_first_block(&mut self, page: &mut Page) -> Result<()> {
        self.read_block(PageId::new(0), page)
    }

    fn read_previous_block(&mut self, page: &mut Page) -> Result<()> {
        let prev = self
            .cur_page_pos()
            .checked_sub(1)
            .ok_or(Error::BeforeFirstBlock)?;
        self.read_block(PageId::new(prev), page)
    }

    fn read_current_block(&mut self, page: &mut Page) -> Result<()> {
        self.read_block(PageId::new(self.cur_page_pos()), page)
    }

    fn read_next_block(&mut self, page: &mut Page) -> Result<()> {
        self.read_block(PageId::new(self.cur_page_pos().saturating_add(1)), page)
    }

    fn read_last_block(&mut self, page: &mut Page) -> Result<()> {
        self.read_block(PageId::new(self.total_pages().saturating_sub(1)), page)
    }

    fn write_current_block(&mut self, page: &Page) -> Result<()> {
        self.write_block(PageId::new(self.cur_page_pos()), page)
    }
}
