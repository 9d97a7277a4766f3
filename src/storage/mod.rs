//! Storage layer - block I/O beneath the buffer pool.
//!
//! - [`BlockStore`] - The synchronous block I/O contract the pool consumes
//! - [`PageFile`] - A block store over a file on disk
//! - [`MemoryStore`] - A block store over pages held in memory
//! - [`Page`] - The fixed-size block exchanged with the pool

mod block_store;
mod memory_store;
mod page;
mod page_file;

pub use block_store::BlockStore;
pub use memory_store::MemoryStore;
pub use page::Page;
pub use page_file::PageFile;
