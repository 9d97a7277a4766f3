//! Configuration constants for pagepool.

/// Size of a page in bytes (4KB).
///
/// Both the block store and the buffer pool exchange buffers of exactly
/// this size. Every block in a page file is this size and new blocks are
/// zero-filled.
pub const PAGE_SIZE: usize = 4096;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_power_of_two() {
        assert!(PAGE_SIZE.is_power_of_two());
        assert_eq!(PAGE_SIZE, 4096);
    }
}
