//! Error types for pagepool.

use std::path::PathBuf;

use thiserror::Error;

use crate::buffer::ReplacementStrategy;
use crate::common::PageId;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by the block stores and the buffer pool.
///
/// Nothing is retried internally; every variant reaches the immediate
/// caller.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be created or opened.
    #[error("page file {} not found", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The block store has no open file.
    #[error("page file {0} is not open")]
    NotOpened(String),

    /// Syncing or closing the backing file failed.
    #[error("failed to close page file {name}")]
    FailedClose {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Removing the backing file failed.
    #[error("failed to remove page file {}", path.display())]
    FailedRemoval {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A page file can only be destroyed once it is closed.
    #[error("page file {0} must be closed before it is destroyed")]
    FileNotClosed(String),

    /// Read of a page beyond the end of the file.
    #[error("{page_id} is out of range (file has {total_pages} pages)")]
    PageOutOfRange { page_id: PageId, total_pages: u32 },

    /// Relative read of the block before the first page.
    #[error("there is no block before the first page")]
    BeforeFirstBlock,

    /// Write that would leave a hole in the file.
    #[error("cannot write {page_id}: valid range is 0..={total_pages}")]
    InvalidRange { page_id: PageId, total_pages: u32 },

    /// No frame holds the requested page.
    #[error("{0} is not resident in the buffer pool")]
    PageNotFound(PageId),

    /// Unpin of a resident page whose pin count is already zero.
    #[error("{0} is not pinned")]
    PageNotPinned(PageId),

    /// Every frame is pinned; no victim can be chosen.
    #[error("buffer pool is full: every frame is pinned")]
    FullBuffer,

    /// Writing a frame back to the page file failed.
    #[error("failed to write back {page_id}")]
    WriteFailed {
        page_id: PageId,
        #[source]
        source: Box<Error>,
    },

    /// The pool was created with a strategy that has no replacement engine.
    #[error("replacement strategy {0} is not supported")]
    InvalidStrategy(ReplacementStrategy),

    /// A strategy name that does not parse.
    #[error("unknown replacement strategy {0:?}")]
    UnknownStrategy(String),

    /// A pool needs at least one frame.
    #[error("buffer pool capacity must be greater than zero")]
    InvalidCapacity,
}
