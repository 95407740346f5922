use crate::constants::*;
use crate::error::MmuError;

/// Shape of the simulated machine. Every size the MMU uses is derived from
/// these four numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    pub page_bits: u32,
    pub vpn_bits: u32,
    pub pfn_bits: u32,
    pub tlb_entries: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            page_bits: PAGE_BITS,
            vpn_bits: VPN_BITS,
            pfn_bits: PFN_BITS,
            tlb_entries: PHYSICAL_PAGES,
        }
    }
}

impl MachineConfig {
    #[inline]
    pub fn page_size(&self) -> usize {
        1 << self.page_bits
    }

    #[inline]
    pub fn virtual_pages(&self) -> usize {
        1 << self.vpn_bits
    }

    #[inline]
    pub fn physical_pages(&self) -> usize {
        1 << self.pfn_bits
    }

    pub fn physical_size(&self) -> usize {
        self.physical_pages() * self.page_size()
    }

    /// Saturates, so oversized widths still fail the range check in `validate`
    pub fn va_bits(&self) -> u32 {
        self.vpn_bits.saturating_add(self.page_bits)
    }

    pub fn va_size(&self) -> u64 {
        1u64 << self.va_bits()
    }

    pub fn validate(&self) -> Result<(), MmuError> {
        if self.page_bits == 0 || self.vpn_bits == 0 || self.pfn_bits == 0 {
            return Err(MmuError::InvalidConfig(format!(
                "field widths must be non-zero (page={}, vpn={}, pfn={})",
                self.page_bits, self.vpn_bits, self.pfn_bits
            )));
        }
        if self.vpn_bits > MAX_VPN_BITS {
            return Err(MmuError::InvalidConfig(format!(
                "VPN field is {} bits wide, max is {}",
                self.vpn_bits, MAX_VPN_BITS
            )));
        }
        if self.va_bits() > u32::BITS {
            return Err(MmuError::InvalidConfig(format!(
                "virtual address is {} bits wide, max is {}",
                self.va_bits(),
                u32::BITS
            )));
        }
        if self.pfn_bits > MAX_PFN_BITS {
            return Err(MmuError::InvalidConfig(format!(
                "PFN field is {} bits wide, max is {}",
                self.pfn_bits, MAX_PFN_BITS
            )));
        }
        if self.pfn_bits > self.vpn_bits {
            return Err(MmuError::InvalidConfig(format!(
                "{} physical pages cannot be backed by only {} virtual pages",
                self.physical_pages(),
                self.virtual_pages()
            )));
        }
        if self.tlb_entries == 0 {
            return Err(MmuError::InvalidConfig("TLB needs at least one entry".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Display for MachineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Machine Architecture:")?;
        writeln!(f, "Page Size (bits):{:>28}", self.page_bits)?;
        writeln!(f, "Page Size (bytes):{:>27}", self.page_size())?;
        writeln!(f, "VA Size (bits):{:>30}", self.va_bits())?;
        writeln!(f, "VA Size (bytes):{:>29}", self.va_size())?;
        writeln!(f, "Physical Memory (bytes):{:>21}", self.physical_size())?;
        write!(f, "Physical Pages:{:>30}", self.physical_pages())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_machine() {
        let config = MachineConfig::default();
        assert_eq!(config.page_size(), PAGE_SIZE);
        assert_eq!(config.virtual_pages(), 32);
        assert_eq!(config.physical_pages(), 8);
        assert_eq!(config.physical_size(), PHYSICAL_SIZE);
        assert_eq!(config.va_bits(), VA_BITS);
        assert_eq!(config.va_size(), VA_SIZE as u64);
        assert_eq!(config.tlb_entries, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_widths() {
        let config = MachineConfig { page_bits: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(MmuError::InvalidConfig(_))));

        let config = MachineConfig { tlb_entries: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(MmuError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_oversized_layouts() {
        // 20 + 13 = 33 bit addresses
        let config = MachineConfig { page_bits: 20, vpn_bits: 13, ..Default::default() };
        assert!(config.validate().is_err());

        let config = MachineConfig { pfn_bits: 6, ..Default::default() };
        assert!(config.validate().is_err());

        let config = MachineConfig { vpn_bits: 18, pfn_bits: 17, page_bits: 12, tlb_entries: 4 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_widths_that_would_overflow() {
        let config = MachineConfig { vpn_bits: u32::MAX, ..Default::default() };
        assert!(matches!(config.validate(), Err(MmuError::InvalidConfig(_))));

        // Sums past u32::MAX
        let config = MachineConfig { vpn_bits: u32::MAX - 4, ..Default::default() };
        assert!(config.validate().is_err());

        let config = MachineConfig { page_bits: u32::MAX, ..Default::default() };
        assert!(config.validate().is_err());
        assert_eq!(config.va_bits(), u32::MAX);
    }

    #[test]
    fn test_caps_page_table_size() {
        // Fits in 32 address bits but would need 2^31 page table entries
        let config = MachineConfig { vpn_bits: 31, page_bits: 1, ..Default::default() };
        assert!(matches!(config.validate(), Err(MmuError::InvalidConfig(_))));

        let config = MachineConfig { vpn_bits: MAX_VPN_BITS, page_bits: 12, ..Default::default() };
        assert!(config.validate().is_ok());
        let config = MachineConfig { vpn_bits: MAX_VPN_BITS + 1, page_bits: 11, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_banner() {
        let banner = MachineConfig::default().to_string();
        assert!(banner.starts_with("Machine Architecture:"));
        assert!(banner.contains("2048"));
        assert!(banner.contains("65536"));
        assert!(banner.contains("16384"));
        assert_eq!(banner.lines().count(), 7);

        let va_line = banner.lines().find(|line| line.starts_with("VA Size (bits):")).unwrap();
        assert!(va_line.ends_with(" 16"));
    }
}
