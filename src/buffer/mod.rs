//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache layer between callers and a block
//! store. It manages a fixed pool of frames, each holding one page.
//!
//! # Components
//! - [`BufferPool`] - The main page cache
//! - [`Frame`] - A slot in the buffer pool holding a page + metadata
//! - [`FrameTable`] - The frame arena and its replacement ordering
//! - [`PageReadGuard`] / [`PageWriteGuard`] - RAII guards for page access
//! - [`BufferPoolStats`] - Hit, miss and I/O counters
//! - [`replacer`] - Eviction policy implementations

mod buffer_pool;
mod frame;
mod frame_table;
mod page_guard;
pub mod replacer;
mod stats;

pub use buffer_pool::{BufferPool, PageHandle};
pub use frame::Frame;
pub use frame_table::{EvictionOrder, FrameTable};
pub use page_guard::{PageReadGuard, PageWriteGuard};
pub use replacer::{ReplacementPolicy, ReplacementStrategy, Replacer};
pub use stats::BufferPoolStats;
