//! Buffer pool statistics tracking.

use std::fmt;

/// Counters kept by the buffer pool since it was created.
///
/// `pages_read` and `pages_written` are the pool's read and write I/O
/// counters: each successful block read or write adds exactly one, failed
/// I/O adds nothing.
///
/// # Example
/// ```
/// use pagepool::BufferPoolStats;
///
/// let stats = BufferPoolStats {
///     cache_hits: 3,
///     cache_misses: 1,
///     ..Default::default()
/// };
/// assert_eq!(stats.hit_rate(), 0.75);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferPoolStats {
    /// Number of pins that found the page resident.
    pub cache_hits: u64,

    /// Number of pins that had to load the page.
    pub cache_misses: u64,

    /// Number of resident pages replaced by another page.
    pub evictions: u64,

    /// Number of blocks read from the page file.
    pub pages_read: u64,

    /// Number of blocks written to the page file.
    pub pages_written: u64,
}

impl BufferPoolStats {
    /// Calculate cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

impl fmt::Display for BufferPoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ hits: {}, misses: {}, evictions: {}, reads: {}, writes: {}, hit_rate: {:.2}% }}",
            self.cache_hits,
            self.cache_misses,
            self.evictions,
            self.pages_read,
            self.pages_written,
            self.hit_rate() * 100.0
        )
    }
}
