//! Eviction policy implementations (replacers).
//!
//! - [`FifoReplacer`] - evicts in load order; hits never reorder
//! - [`LruReplacer`] - evicts the least recently pinned page
//!
//! Both work over the [`FrameTable`] ordering and share victim selection:
//! an empty slot if there is one, otherwise the first unpinned frame
//! walking from the rear.

mod fifo;
mod lru;

use std::fmt;
use std::str::FromStr;

use crate::buffer::FrameTable;
use crate::common::{Error, FrameId};

pub use fifo::FifoReplacer;
pub use lru::LruReplacer;

/// Policy hooks invoked by the buffer pool.
pub trait Replacer {
    /// A pin found its page already resident in `frame_id`.
    fn record_hit(&self, table: &mut FrameTable, frame_id: FrameId);

    /// A page was just loaded into `frame_id`.
    ///
    /// Newly loaded pages go to the front under every policy; a reused
    /// slot is unlinked from its old position first.
    fn record_load(&self, table: &mut FrameTable, frame_id: FrameId) {
        table.remove_from_ordering(frame_id);
        table.insert_at_front(frame_id);
    }

    /// Pick the frame a missing page should be loaded into.
    ///
    /// Returns `None` when every frame is filled and pinned.
    fn victim(&self, table: &FrameTable) -> Option<FrameId> {
        table.free_slot().or_else(|| {
            table
                .eviction_order()
                .find(|frame| frame.is_evictable())
                .map(|frame| frame.frame_id())
        })
    }
}

/// Replacement strategy tags accepted when creating a pool.
///
/// Only [`Fifo`](Self::Fifo) and [`Lru`](Self::Lru) have an engine. A pool
/// created with another tag is still constructed, but every pin on it
/// fails with `Error::InvalidStrategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReplacementStrategy {
    Fifo,
    #[default]
    Lru,
    Clock,
    Lfu,
    LruK,
}

impl ReplacementStrategy {
    /// Whether a replacement engine exists for this strategy.
    pub fn is_supported(self) -> bool {
        ReplacementPolicy::for_strategy(self).is_some()
    }
}

impl fmt::Display for ReplacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplacementStrategy::Fifo => "FIFO",
            ReplacementStrategy::Lru => "LRU",
            ReplacementStrategy::Clock => "CLOCK",
            ReplacementStrategy::Lfu => "LFU",
            ReplacementStrategy::LruK => "LRU-K",
        };
        f.write_str(name)
    }
}

impl FromStr for ReplacementStrategy {
    type Err = Error;

    /// Parse a strategy name, ignoring case, `-` and `_`.
    ///
    /// ```
    /// use pagepool::ReplacementStrategy;
    ///
    /// assert_eq!("fifo".parse::<ReplacementStrategy>().unwrap(), ReplacementStrategy::Fifo);
    /// assert_eq!("LRU-K".parse::<ReplacementStrategy>().unwrap(), ReplacementStrategy::LruK);
    /// assert!("random".parse::<ReplacementStrategy>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "fifo" => Ok(ReplacementStrategy::Fifo),
            "lru" => Ok(ReplacementStrategy::Lru),
            "clock" => Ok(ReplacementStrategy::Clock),
            "lfu" => Ok(ReplacementStrategy::Lfu),
            "lruk" => Ok(ReplacementStrategy::LruK),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// The replacement engine a pool runs, chosen once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    Fifo(FifoReplacer),
    Lru(LruReplacer),
}

impl ReplacementPolicy {
    /// Engine for `strategy`, or `None` if the strategy has none.
    pub fn for_strategy(strategy: ReplacementStrategy) -> Option<Self> {
        match strategy {
            ReplacementStrategy::Fifo => Some(ReplacementPolicy::Fifo(FifoReplacer)),
            ReplacementStrategy::Lru => Some(ReplacementPolicy::Lru(LruReplacer)),
            ReplacementStrategy::Clock | ReplacementStrategy::Lfu | ReplacementStrategy::LruK => {
                None
            }
        }
    }

    fn replacer(&self) -> &dyn Replacer {
        match self {
            ReplacementPolicy::Fifo(r) => r,
            ReplacementPolicy::Lru(r) => r,
        }
    }
}

impl Replacer for ReplacementPolicy {
    fn record_hit(&self, table: &mut FrameTable, frame_id: FrameId) {
        self.replacer().record_hit(table, frame_id)
    }

    fn record_load(&self, table: &mut FrameTable, frame_id: FrameId) {
        self.replacer().record_load(table, frame_id)
    }

    fn victim(&self, table: &FrameTable) -> Option<FrameId> {
        self.replacer().victim(table)
    }
}
