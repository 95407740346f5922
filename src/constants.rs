// Reference machine
//   pages are 2048 bytes          --- 11 bits
//   VA space is 32 pages          ---  5 bits
//   virtual addresses are         --- 16 bits
//   physical memory fits 8 pages  ---  3 bits of PFN
pub const PAGE_BITS: u32 = 11;
pub const VPN_BITS: u32 = 5;
pub const PFN_BITS: u32 = 3;

pub const PAGE_SIZE: usize = 1 << PAGE_BITS;
pub const VIRTUAL_PAGES: usize = 1 << VPN_BITS;
pub const PHYSICAL_PAGES: usize = 1 << PFN_BITS;
pub const PHYSICAL_SIZE: usize = PHYSICAL_PAGES * PAGE_SIZE;

pub const VA_BITS: u32 = VPN_BITS + PAGE_BITS;
pub const VA_SIZE: usize = 1 << VA_BITS;

pub const OFFSET_MASK: u32 = (1 << PAGE_BITS) - 1;

// Page table entry layout, low bit first
pub const PTE_DIRTY: u32 = 1 << 0;
pub const PTE_REFERENCED: u32 = 1 << 1;
pub const PTE_PRESENT: u32 = 1 << 2;
pub const PTE_VALID: u32 = 1 << 3;
pub const PTE_RW: u32 = 1 << 4;
pub const PTE_PFN_SHIFT: u32 = 5;

/// Widest PFN field a packed entry can hold.
pub const MAX_PFN_BITS: u32 = 16;

/// Widest VPN field; bounds the page table at 2^20 entries.
pub const MAX_VPN_BITS: u32 = 20;
