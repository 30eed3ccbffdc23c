//! Memoization for block rendering
//!
//! A finished assistant message is redrawn on every conversation update, so
//! its blocks are cached by a hash of the markdown source.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};

use super::{render_blocks, RenderedBlock, BLOCK_CACHE_MAX_ENTRIES};

/// Content-hash cache of [`render_blocks`] output with oldest-first eviction.
#[derive(Debug)]
pub struct BlockCache {
    entries: HashMap<u64, Vec<RenderedBlock>>,
    order: VecDeque<u64>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for BlockCache {
    fn default() -> Self {
        Self::with_capacity(BLOCK_CACHE_MAX_ENTRIES)
    }
}

impl BlockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    fn key(content: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        hasher.finish()
    }

    /// Blocks for `content`, parsing only on a miss.
    pub fn render(&mut self, content: &str) -> Vec<RenderedBlock> {
        let key = Self::key(content);
        if let Some(blocks) = self.entries.get(&key) {
            self.hits += 1;
            return blocks.clone();
        }

        self.misses += 1;
        let blocks = render_blocks(content);

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.entries.insert(key, blocks.clone());
        self.order.push_back(key);
        blocks
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries; statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_render_hits() {
        let mut cache = BlockCache::new();
        let first = cache.render("Hello **world**");
        let second = cache.render("Hello **world**");

        assert_eq!(first, second);
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut cache = BlockCache::with_capacity(2);
        cache.render("a");
        cache.render("b");
        cache.render("c");
        assert_eq!(cache.len(), 2);

        // "a" was evicted, "c" is still cached
        cache.render("c");
        cache.render("a");
        assert_eq!(cache.stats(), (1, 4));
    }

    #[test]
    fn test_clear_keeps_stats() {
        let mut cache = BlockCache::new();
        cache.render("x");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), (0, 1));
    }
}
