//! Address translation engine.
//!
//! Every access probes the TLB, then the page table, and on a double miss
//! takes a page fault: the frame under the FIFO cursor is reclaimed (its
//! page written back first if dirty), handed to the faulting page, and
//! installed in the TLB. All outcomes are reported to a caller-supplied
//! [`TraceSink`] in the order they happen.

use crate::config::MachineConfig;
use crate::error::MmuError;
use crate::memory::{FramePool, PageTable};
use crate::tlb::TranslationCache;
use crate::trace::{AccessKind, Dump, TraceEvent, TraceSink, WriteMark};
use crate::translation::{Resolution, VirtualAddress};

/// Running totals over the life of an [`Mmu`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub reads: u64,
    pub writes: u64,
    pub tlb_hits: u64,
    pub table_hits: u64,
    pub faults: u64,
    pub evictions: u64,
    pub write_backs: u64,
}

pub struct Mmu {
    config: MachineConfig,
    page_table: PageTable,
    frames: FramePool,
    tlb: TranslationCache,
    stats: Stats,
}

impl Mmu {
    pub fn new(config: MachineConfig) -> Result<Self, MmuError> {
        config.validate()?;
        log::info!(
            "MMU: {} virtual pages, {} frames of {} bytes, {} TLB entries",
            config.virtual_pages(),
            config.physical_pages(),
            config.page_size(),
            config.tlb_entries
        );

        Ok(Mmu {
            page_table: PageTable::new(config.virtual_pages(), config.pfn_bits),
            frames: FramePool::new(config.physical_pages()),
            tlb: TranslationCache::new(config.tlb_entries),
            stats: Stats::default(),
            config,
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn frames(&self) -> &FramePool {
        &self.frames
    }

    pub fn tlb(&self) -> &TranslationCache {
        &self.tlb
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    fn check_range(&self, vpn: u32) -> Result<(), MmuError> {
        if self.page_table.contains(vpn) {
            return Ok(());
        }
        log::warn!("rejecting VPN {} (only {} pages)", vpn, self.page_table.len());
        Err(MmuError::AddressOutOfRange {
            vpn,
            virtual_pages: self.page_table.len(),
        })
    }

    /// Resolve `va` through the page table, faulting it in if needed.
    ///
    /// The TLB is not probed here; callers do that first. Fails without
    /// touching any state when the VPN is past the end of the page table.
    pub fn translate(
        &mut self,
        va: VirtualAddress,
        kind: AccessKind,
        sink: &mut impl TraceSink,
    ) -> Result<Resolution, MmuError> {
        self.check_range(va.vpn)?;

        let entry = self.page_table.entry(va.vpn);
        if entry.present() {
            let frame = entry.frame();
            self.tlb.install(frame, va.vpn);
            self.stats.table_hits += 1;
            return Ok(Resolution::TableHit(frame));
        }

        sink.record(TraceEvent::PageFault { vpn: va.vpn, va: va.va });
        self.stats.faults += 1;
        let frame = self.swap_in(va, kind, sink);
        Ok(Resolution::Faulted(frame))
    }

    /// Reclaim the frame under the FIFO cursor for `va.vpn`
    fn swap_in(&mut self, va: VirtualAddress, kind: AccessKind, sink: &mut impl TraceSink) -> usize {
        let (frame, previous) = self.frames.assign(va.vpn);

        if let Some(victim) = previous {
            let dirty = self.page_table.entry(victim).dirty();
            log::debug!("evicting VPN {} from PFN {} (dirty={})", victim, frame, dirty);
            sink.record(TraceEvent::Evicted { vpn: victim, dirty });
            if dirty {
                sink.record(TraceEvent::WriteBack { vpn: victim });
                self.page_table.set_dirty(victim, false);
                self.stats.write_backs += 1;
            }
            self.page_table.unmap(victim);
            self.stats.evictions += 1;
        }

        self.page_table.map(va.vpn, frame);
        self.tlb.install(frame, va.vpn);
        log::debug!("VPN {} swapped into PFN {}", va.vpn, frame);

        sink.record(TraceEvent::Assigned { vpn: va.vpn, offset: va.offset, frame });
        sink.record(TraceEvent::SwappedIn {
            vpn: va.vpn,
            offset: va.offset,
            frame,
            newly_dirty: kind == AccessKind::Write,
        });
        frame
    }

    pub fn read(&mut self, address: u32, sink: &mut impl TraceSink) -> Result<Resolution, MmuError> {
        sink.record(TraceEvent::Request { kind: AccessKind::Read, address });
        let va = VirtualAddress::split(address, self.config.page_bits);
        self.check_range(va.vpn)?;
        self.stats.reads += 1;

        if let Some(frame) = self.tlb.lookup(va.vpn) {
            self.stats.tlb_hits += 1;
            sink.record(TraceEvent::Translated { vpn: va.vpn, va: va.va, frame, write: None });
            return Ok(Resolution::TlbHit(frame));
        }

        let resolution = self.translate(va, AccessKind::Read, sink)?;
        // Faults were already traced as they happened
        if !resolution.is_fault() {
            sink.record(TraceEvent::Translated {
                vpn: va.vpn,
                va: va.va,
                frame: resolution.frame(),
                write: None,
            });
        }
        Ok(resolution)
    }

    pub fn write(&mut self, address: u32, sink: &mut impl TraceSink) -> Result<Resolution, MmuError> {
        sink.record(TraceEvent::Request { kind: AccessKind::Write, address });
        let va = VirtualAddress::split(address, self.config.page_bits);
        self.check_range(va.vpn)?;
        self.stats.writes += 1;

        let resolution = match self.tlb.lookup(va.vpn) {
            Some(frame) => {
                self.stats.tlb_hits += 1;
                Resolution::TlbHit(frame)
            }
            None => self.translate(va, AccessKind::Write, sink)?,
        };

        if !resolution.is_fault() {
            let write = if self.page_table.entry(va.vpn).dirty() {
                WriteMark::RepeatWrite
            } else {
                WriteMark::NewlyDirty
            };
            sink.record(TraceEvent::Translated {
                vpn: va.vpn,
                va: va.va,
                frame: resolution.frame(),
                write: Some(write),
            });
        }
        self.page_table.set_dirty(va.vpn, true);
        Ok(resolution)
    }

    pub fn dump_page_table(&self, sink: &mut impl TraceSink) {
        sink.record(TraceEvent::DumpHeader(Dump::PageTable));
        let mut any = false;
        for (vpn, entry) in self.page_table.present() {
            any = true;
            sink.record(TraceEvent::PageTableRow { vpn, dirty: entry.dirty(), frame: entry.frame() });
        }
        if !any {
            sink.record(TraceEvent::NoPresentPages);
        }
    }

    pub fn dump_tlb(&self, sink: &mut impl TraceSink) {
        sink.record(TraceEvent::DumpHeader(Dump::Tlb));
        for (index, entry) in self.tlb.entries().iter().enumerate() {
            sink.record(TraceEvent::TlbRow {
                index,
                in_use: entry.in_use,
                vpn: if entry.in_use { entry.vpn } else { 0 },
            });
        }
    }
}
