use crate::constants::*;

/// One page table entry, packed the way the hardware would hold it:
/// flag bits at the bottom, the PFN field from `PTE_PFN_SHIFT` up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry(u32);

impl PageTableEntry {
    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn present(&self) -> bool {
        self.0 & PTE_PRESENT != 0
    }

    #[inline]
    pub fn dirty(&self) -> bool {
        self.0 & PTE_DIRTY != 0
    }

    /// Frame number. Stale unless `present()`.
    #[inline]
    pub fn frame(&self) -> usize {
        (self.0 >> PTE_PFN_SHIFT) as usize
    }

    fn set_flag(&mut self, flag: u32, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

pub struct PageTable {
    entries: Vec<PageTableEntry>,
    pfn_mask: u32,
}

impl PageTable {
    /// Create a page table with every entry not present
    pub fn new(virtual_pages: usize, pfn_bits: u32) -> Self {
        PageTable {
            entries: vec![PageTableEntry::default(); virtual_pages],
            pfn_mask: (1 << pfn_bits) - 1,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, vpn: u32) -> bool {
        (vpn as usize) < self.entries.len()
    }

    #[inline]
    pub fn entry(&self, vpn: u32) -> PageTableEntry {
        self.entries[vpn as usize]
    }

    /// Mark `vpn` present in `frame`. The frame is truncated to the PFN width.
    pub fn map(&mut self, vpn: u32, frame: usize) {
        let entry = &mut self.entries[vpn as usize];
        let pfn = frame as u32 & self.pfn_mask;
        entry.0 = (entry.0 & !(self.pfn_mask << PTE_PFN_SHIFT)) | (pfn << PTE_PFN_SHIFT);
        entry.set_flag(PTE_PRESENT, true);
    }

    /// Clear the present bit and the frame number
    pub fn unmap(&mut self, vpn: u32) {
        let entry = &mut self.entries[vpn as usize];
        entry.0 &= !(self.pfn_mask << PTE_PFN_SHIFT);
        entry.set_flag(PTE_PRESENT, false);
    }

    pub fn set_dirty(&mut self, vpn: u32, dirty: bool) {
        self.entries[vpn as usize].set_flag(PTE_DIRTY, dirty);
    }

    /// Present entries in VPN order
    pub fn present(&self) -> impl Iterator<Item = (u32, PageTableEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.present())
            .map(|(vpn, &entry)| (vpn as u32, entry))
    }

    pub fn present_count(&self) -> usize {
        self.present().count()
    }
}

/// Physical frames, each either empty or holding the VPN resident there,
/// plus the round-robin cursor that picks the next frame to hand out.
pub struct FramePool {
    slots: Vec<Option<u32>>,
    cursor: usize,
}

impl FramePool {
    pub fn new(physical_pages: usize) -> Self {
        FramePool {
            slots: vec![None; physical_pages],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn resident(&self, frame: usize) -> Option<u32> {
        self.slots[frame]
    }

    /// The frame the next fault will be assigned
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Hand the frame under the cursor to `vpn` and advance the cursor.
    /// Returns the frame and whatever VPN was resident there before.
    pub fn assign(&mut self, vpn: u32) -> (usize, Option<u32>) {
        let frame = self.cursor;
        let previous = self.slots[frame].replace(vpn);
        self.cursor = (self.cursor + 1) % self.slots.len();
        (frame, previous)
    }

    pub fn slots(&self) -> &[Option<u32>] {
        &self.slots
    }
}
