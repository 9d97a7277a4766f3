//! pagepool - A fixed-capacity page buffer pool with FIFO and LRU replacement.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            caller                               │
//! │          pin / unpin / mark_dirty / force_page / shutdown       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                 Buffer Pool (buffer/)                    │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │   Replacement: FIFO | LRU  (fixed per pool)     │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  │      BufferPool + FrameTable + Frame + Statistics        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               Storage Layer (storage/)                   │   │
//! │  │        BlockStore: PageFile | MemoryStore + Page         │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`buffer`] - Buffer pool management and eviction policies
//! - [`storage`] - Block I/O and the page buffer type
//!
//! # Quick Start
//! ```no_run
//! use pagepool::{BufferPool, PageFile, PageId, ReplacementStrategy};
//!
//! // Create a page file and give it some pages
//! let mut file = PageFile::create("my_pages.bin").unwrap();
//! pagepool::BlockStore::ensure_capacity(&mut file, 8).unwrap();
//!
//! let mut pool = BufferPool::new(file, 4, ReplacementStrategy::Lru).unwrap();
//!
//! let handle = pool.pin(PageId::new(3)).unwrap();
//! pool.data_mut(&handle).unwrap()[0..5].copy_from_slice(b"hello");
//! pool.mark_dirty(PageId::new(3)).unwrap();
//! pool.unpin(PageId::new(3)).unwrap();
//!
//! // Writes back every dirty page and closes the file
//! pool.shutdown().unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Error, FrameId, PageId, Result};

pub use buffer::{
    BufferPool, BufferPoolStats, PageHandle, PageReadGuard, PageWriteGuard, ReplacementStrategy,
};
pub use storage::{BlockStore, MemoryStore, Page, PageFile};
