//! Page file - a block store over a single file on disk.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, Result};
use crate::storage::{BlockStore, Page};

/// Block I/O over one file of fixed-size pages.
///
/// # File Layout
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Page 0  │ Page 1  │ Page 2  │  ...    │ Page N  │
/// │ (4KB)   │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      4096     8192    ...    N×4096
/// ```
///
/// The handle owns its file. Closing drops the file descriptor but keeps
/// the handle, so later I/O reports `Error::NotOpened` instead of touching
/// a stale descriptor.
#[derive(Debug)]
pub struct PageFile {
    path: PathBuf,
    name: String,
    file: Option<File>,
    total_pages: u32,
    cur_page_pos: u32,
}

impl PageFile {
    /// Create a page file holding a single zero-filled page.
    ///
    /// An existing file at `path` is truncated.
    ///
    /// # Errors
    /// Returns `Error::FileNotFound` if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| Error::FileNotFound {
                path: path.to_path_buf(),
                source,
            })?;

        let mut page_file = Self::from_file(path, file, 0);
        page_file.append_empty_block()?;
        page_file.cur_page_pos = 0;

        debug!("created page file {}", page_file.name);
        Ok(page_file)
    }

    /// Open an existing page file.
    ///
    /// The page count is derived from the file length; a trailing partial
    /// block is ignored.
    ///
    /// # Errors
    /// Returns `Error::FileNotFound` if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let not_found = |source| Error::FileNotFound {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(not_found)?;
        let file_size = file.metadata().map_err(not_found)?.len();
        let total_pages = u32::try_from(file_size / PAGE_SIZE as u64).unwrap_or(u32::MAX);

        debug!("opened page file {} ({} pages)", path.display(), total_pages);
        Ok(Self::from_file(path, file, total_pages))
    }

    /// Remove a page file from disk.
    ///
    /// # Errors
    /// Returns `Error::FailedRemoval` if the file cannot be removed.
    pub fn remove<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        fs::remove_file(path).map_err(|source| Error::FailedRemoval {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_file(path: &Path, file: File, total_pages: u32) -> Self {
        Self {
            path: path.to_path_buf(),
            name: path.display().to_string(),
            file: Some(file),
            total_pages,
            cur_page_pos: 0,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the handle still owns an open file.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Remove the backing file. The handle must be closed first.
    ///
    /// # Errors
    /// - `Error::FileNotClosed` if the handle is still open
    /// - `Error::FailedRemoval` if the file cannot be removed
    pub fn destroy(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::FileNotClosed(self.name.clone()));
        }
        Self::remove(&self.path)
    }

    /// Total size of the file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.total_pages as u64) * (PAGE_SIZE as u64)
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        match self.file.as_mut() {
            Some(file) => Ok(file),
            None => Err(Error::NotOpened(self.name.clone())),
        }
    }
}

impl BlockStore for PageFile {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[inline]
    fn cur_page_pos(&self) -> u32 {
        self.cur_page_pos
    }

    fn read_block(&mut self, page_id: PageId, page: &mut Page) -> Result<()> {
        let total_pages = self.total_pages;
        let file = self.file_mut()?;
        if page_id.0 >= total_pages {
            return Err(Error::PageOutOfRange {
                page_id,
                total_pages,
            });
        }

        file.seek(SeekFrom::Start(page_id.offset()))?;
        file.read_exact(page.as_mut_slice())?;

        self.cur_page_pos = page_id.0;
        Ok(())
    }

    fn write_block(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        let total_pages = self.total_pages;
        let file = self.file_mut()?;
        if page_id.0 > total_pages {
            return Err(Error::InvalidRange {
                page_id,
                total_pages,
            });
        }

        file.seek(SeekFrom::Start(page_id.offset()))?;
        file.write_all(page.as_slice())?;

        if page_id.0 == total_pages {
            self.total_pages += 1;
        }
        self.cur_page_pos = page_id.0;
        Ok(())
    }

    fn append_empty_block(&mut self) -> Result<()> {
        let page_id = PageId::new(self.total_pages);
        if self.total_pages == u32::MAX {
            return Err(Error::InvalidRange {
                page_id,
                total_pages: self.total_pages,
            });
        }

        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(page_id.offset()))?;
        file.write_all(&[0u8; PAGE_SIZE])?;

        self.total_pages += 1;
        self.cur_page_pos = page_id.0;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let file = self
            .file
            .take()
            .ok_or_else(|| Error::NotOpened(self.name.clone()))?;

        file.sync_all().map_err(|source| Error::FailedClose {
            name: self.name.clone(),
            source,
        })?;

        debug!("closed page file {} ({} pages)", self.name, self.total_pages);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_new_page_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let pf = PageFile::create(&path).unwrap();
        assert_eq!(pf.total_pages(), 1);
        assert_eq!(pf.cur_page_pos(), 0);
        assert_eq!(pf.file_size(), PAGE_SIZE as u64);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), PAGE_SIZE as u64);
    }

    #[test]
    fn test_create_truncates_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut pf = PageFile::create(&path).unwrap();
            pf.ensure_capacity(5).unwrap();
            pf.close().unwrap();
        }

        let pf = PageFile::create(&path).unwrap();
        assert_eq!(pf.total_pages(), 1);
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.db");

        assert!(matches!(
            PageFile::open(&path),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_new_page_is_zeroed() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();

        let mut page = Page::new();
        page.as_mut_slice().fill(0xEE);
        pf.read_block(PageId::new(0), &mut page).unwrap();
        assert!(page.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_and_read_block() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();

        let mut page = Page::new();
        page.as_mut_slice()[0] = 0xAB;
        page.as_mut_slice()[100] = 0xCD;
        page.as_mut_slice()[4095] = 0xEF;
        pf.write_block(PageId::new(0), &page).unwrap();

        let mut read = Page::new();
        pf.read_block(PageId::new(0), &mut read).unwrap();
        assert_eq!(read.as_slice()[0], 0xAB);
        assert_eq!(read.as_slice()[100], 0xCD);
        assert_eq!(read.as_slice()[4095], 0xEF);
    }

    #[test]
    fn test_write_at_end_extends_file() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();

        let mut page = Page::new();
        page.as_mut_slice()[0] = 7;
        pf.write_block(PageId::new(1), &page).unwrap();

        assert_eq!(pf.total_pages(), 2);
        assert_eq!(pf.cur_page_pos(), 1);
    }

    #[test]
    fn test_write_past_end_is_invalid_range() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();

        let result = pf.write_block(PageId::new(2), &Page::new());
        assert!(matches!(
            result,
            Err(Error::InvalidRange {
                total_pages: 1,
                ..
            })
        ));
        assert_eq!(pf.total_pages(), 1);
    }

    #[test]
    fn test_read_out_of_range() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();

        let result = pf.read_block(PageId::new(1), &mut Page::new());
        assert!(matches!(
            result,
            Err(Error::PageOutOfRange {
                total_pages: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut pf = PageFile::create(&path).unwrap();
            let mut page = Page::new();
            page.as_mut_slice()[0] = 0x42;
            pf.write_block(PageId::new(0), &page).unwrap();
            pf.close().unwrap();
        }

        {
            let mut pf = PageFile::open(&path).unwrap();
            assert_eq!(pf.total_pages(), 1);

            let mut page = Page::new();
            pf.read_block(PageId::new(0), &mut page).unwrap();
            assert_eq!(page.as_slice()[0], 0x42);
        }
    }

    #[test]
    fn test_ensure_capacity_and_append() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();

        pf.ensure_capacity(4).unwrap();
        assert_eq!(pf.total_pages(), 4);
        assert_eq!(pf.cur_page_pos(), 3);

        // Already large enough
        pf.ensure_capacity(2).unwrap();
        assert_eq!(pf.total_pages(), 4);

        pf.append_empty_block().unwrap();
        assert_eq!(pf.total_pages(), 5);
        assert_eq!(pf.file_size(), 5 * PAGE_SIZE as u64);
    }

    #[test]
    fn test_relative_reads_move_cursor() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();

        for i in 0..4u8 {
            let mut page = Page::new();
            page.as_mut_slice()[0] = i;
            pf.write_block(PageId::new(i as u32), &page).unwrap();
        }

        let mut page = Page::new();

        pf.read_first_block(&mut page).unwrap();
        assert_eq!(page.as_slice()[0], 0);
        assert_eq!(pf.cur_page_pos(), 0);

        assert!(matches!(
            pf.read_previous_block(&mut page),
            Err(Error::BeforeFirstBlock)
        ));

        pf.read_next_block(&mut page).unwrap();
        assert_eq!(page.as_slice()[0], 1);

        pf.read_next_block(&mut page).unwrap();
        assert_eq!(page.as_slice()[0], 2);

        pf.read_previous_block(&mut page).unwrap();
        assert_eq!(page.as_slice()[0], 1);

        pf.read_current_block(&mut page).unwrap();
        assert_eq!(page.as_slice()[0], 1);

        pf.read_last_block(&mut page).unwrap();
        assert_eq!(page.as_slice()[0], 3);
        assert_eq!(pf.cur_page_pos(), 3);

        assert!(pf.read_next_block(&mut page).is_err());
    }

    #[test]
    fn test_write_current_block() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();
        pf.ensure_capacity(3).unwrap();

        let mut page = Page::new();
        pf.read_block(PageId::new(1), &mut page).unwrap();

        page.as_mut_slice()[0] = 0x99;
        pf.write_current_block(&page).unwrap();

        let mut read = Page::new();
        pf.read_block(PageId::new(1), &mut read).unwrap();
        assert_eq!(read.as_slice()[0], 0x99);
    }

    #[test]
    fn test_io_after_close_is_not_opened() {
        let dir = tempdir().unwrap();
        let mut pf = PageFile::create(dir.path().join("test.db")).unwrap();
        pf.close().unwrap();

        assert!(!pf.is_open());
        assert!(matches!(
            pf.read_block(PageId::new(0), &mut Page::new()),
            Err(Error::NotOpened(_))
        ));
        assert!(matches!(
            pf.write_block(PageId::new(0), &Page::new()),
            Err(Error::NotOpened(_))
        ));
        assert!(matches!(pf.close(), Err(Error::NotOpened(_))));
    }

    #[test]
    fn test_destroy_requires_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let mut pf = PageFile::create(&path).unwrap();

        assert!(matches!(pf.destroy(), Err(Error::FileNotClosed(_))));
        assert!(path.exists());

        pf.close().unwrap();
        pf.destroy().unwrap();
        assert!(!path.exists());

        assert!(matches!(pf.destroy(), Err(Error::FailedRemoval { .. })));
    }
}
