//! Translation cache consulted before the page table.
//!
//! Fully associative, fixed capacity. Rows are filled through a wrapping
//! write cursor, except that a row already tracking the frame being installed
//! is rewritten in place. Since the MMU installs every frame it reuses, no row
//! can keep pointing at a frame after that frame changes hands.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlbEntry {
    pub vpn: u32,
    pub frame: usize,
    pub in_use: bool,
}

pub struct TranslationCache {
    entries: Vec<TlbEntry>,
    cursor: usize,
}

impl TranslationCache {
    pub fn new(capacity: usize) -> Self {
        TranslationCache {
            entries: vec![TlbEntry::default(); capacity],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Linear scan for `vpn` among rows in use
    pub fn lookup(&self, vpn: u32) -> Option<usize> {
        let hit = self
            .entries
            .iter()
            .find(|entry| entry.in_use && entry.vpn == vpn)
            .map(|entry| entry.frame);
        log::trace!("TLB probe vpn={} -> {:?}", vpn, hit);
        hit
    }

    pub fn install(&mut self, frame: usize, vpn: u32) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.in_use && entry.frame == frame)
        {
            log::trace!("TLB rewrite frame={} vpn {} -> {}", frame, entry.vpn, vpn);
            entry.vpn = vpn;
            return;
        }

        log::trace!("TLB install slot={} frame={} vpn={}", self.cursor, frame, vpn);
        self.entries[self.cursor] = TlbEntry { vpn, frame, in_use: true };
        self.cursor = (self.cursor + 1) % self.entries.len();
    }

    /// Every row in index order, used or not
    pub fn entries(&self) -> &[TlbEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_misses() {
        let tlb = TranslationCache::new(4);
        assert_eq!(tlb.capacity(), 4);
        assert_eq!(tlb.lookup(0), None);
        assert!(tlb.entries().iter().all(|e| !e.in_use));
    }

    #[test]
    fn test_install_then_hit() {
        let mut tlb = TranslationCache::new(4);
        tlb.install(2, 7);
        assert_eq!(tlb.lookup(7), Some(2));
        assert_eq!(tlb.lookup(8), None);
    }

    #[test]
    fn test_free_row_never_hits() {
        // A free row reads as vpn 0, frame 0 but must not match vpn 0
        let mut tlb = TranslationCache::new(2);
        tlb.install(1, 5);
        assert_eq!(tlb.lookup(0), None);
    }

    #[test]
    fn test_cursor_fills_in_index_order() {
        let mut tlb = TranslationCache::new(3);
        tlb.install(0, 10);
        tlb.install(1, 11);

        let rows = tlb.entries();
        assert_eq!(rows[0], TlbEntry { vpn: 10, frame: 0, in_use: true });
        assert_eq!(rows[1], TlbEntry { vpn: 11, frame: 1, in_use: true });
        assert!(!rows[2].in_use);
    }

    #[test]
    fn test_reinstall_same_frame_overwrites_in_place() {
        let mut tlb = TranslationCache::new(3);
        tlb.install(0, 10);
        tlb.install(1, 11);
        tlb.install(0, 12);

        assert_eq!(tlb.lookup(10), None);
        assert_eq!(tlb.lookup(12), Some(0));
        assert_eq!(tlb.entries()[0].vpn, 12);
        // Cursor did not move, slot 2 is still free
        assert!(!tlb.entries()[2].in_use);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut tlb = TranslationCache::new(2);
        tlb.install(0, 1);
        tlb.install(1, 2);
        tlb.install(5, 3);

        assert_eq!(tlb.entries()[0], TlbEntry { vpn: 3, frame: 5, in_use: true });
        assert_eq!(tlb.lookup(1), None);
        assert_eq!(tlb.lookup(2), Some(1));
    }
}
