use crate::constants::*;

/// Represents the decomposed components of a Virtual Address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: u32,
    pub vpn: u32,
    pub offset: u32,
}

impl VirtualAddress {
    /// Decompose a raw VA using the reference page size
    pub fn from_raw(va: u32) -> Self {
        VirtualAddress {
            va,
            vpn: va >> PAGE_BITS,
            offset: va & OFFSET_MASK,
        }
    }

    /// Decompose a raw VA for a machine with `page_bits` offset bits.
    ///
    /// The VPN is everything above the offset and is not truncated to the
    /// configured VPN width, so an address past the end of the virtual address
    /// space yields a VPN the page table will reject.
    pub fn split(va: u32, page_bits: u32) -> Self {
        let mask = (1u32 << page_bits) - 1;
        VirtualAddress {
            va,
            vpn: va >> page_bits,
            offset: va & mask,
        }
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VA({}) = (vpn={}, offset={})", self.va, self.vpn, self.offset)
    }
}

/// How a single access was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    TlbHit(usize),
    TableHit(usize),
    Faulted(usize),
}

impl Resolution {
    pub fn frame(&self) -> usize {
        match *self {
            Resolution::TlbHit(frame)
            | Resolution::TableHit(frame)
            | Resolution::Faulted(frame) => frame,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Resolution::Faulted(_))
    }
}
