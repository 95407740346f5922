use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dump {
    Tlb,
    PageTable,
}

/// Dirty state reported alongside a write that did not fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMark {
    NewlyDirty,
    RepeatWrite,
}

/// One line of the simulation trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    Request { kind: AccessKind, address: u32 },
    DumpHeader(Dump),
    Translated { vpn: u32, va: u32, frame: usize, write: Option<WriteMark> },
    PageFault { vpn: u32, va: u32 },
    Evicted { vpn: u32, dirty: bool },
    WriteBack { vpn: u32 },
    Assigned { vpn: u32, offset: u32, frame: usize },
    SwappedIn { vpn: u32, offset: u32, frame: usize, newly_dirty: bool },
    TlbRow { index: usize, in_use: bool, vpn: u32 },
    PageTableRow { vpn: u32, dirty: bool, frame: usize },
    NoPresentPages,
}

impl std::fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            TraceEvent::Request { kind: AccessKind::Read, address } => write!(f, "Read {}", address),
            TraceEvent::Request { kind: AccessKind::Write, address } => write!(f, "Write {}", address),
            TraceEvent::DumpHeader(Dump::Tlb) => write!(f, "MMU:"),
            TraceEvent::DumpHeader(Dump::PageTable) => write!(f, "PAGE TABLE:"),
            TraceEvent::Translated { vpn, va, frame, write } => {
                write!(f, "VPN:{:>2} VA:{:>2} SUCCESSFUL TRANSLATION TO PFN:{:>2}", vpn, va, frame)?;
                match write {
                    Some(WriteMark::NewlyDirty) => write!(f, " NEWLY DIRTY"),
                    Some(WriteMark::RepeatWrite) => write!(f, " REPEAT WRITE"),
                    None => Ok(()),
                }
            }
            TraceEvent::PageFault { vpn, va } => write!(f, "VPN:{:>2} VA: {:>2} PAGE FAULT", vpn, va),
            TraceEvent::Evicted { vpn, dirty } => {
                write!(f, "VPN:{:>2} SELECTED TO EJECT{}", vpn, if dirty { " DIRTY" } else { "" })
            }
            TraceEvent::WriteBack { vpn } => write!(f, "VPN:{:>2} WRITING BACK", vpn),
            TraceEvent::Assigned { vpn, offset, frame } => {
                write!(f, "VPN:{:>2} VA:{:>2} ASSIGNING TO PFN:{:>2}", vpn, offset, frame)
            }
            TraceEvent::SwappedIn { vpn, offset, frame, newly_dirty } => {
                write!(f, "VPN:{:>2} VA:{:>2} SWAPPING IN TO PFN:{:>2}", vpn, offset, frame)?;
                if newly_dirty {
                    write!(f, " NEWLY DIRTY")?;
                }
                Ok(())
            }
            TraceEvent::TlbRow { index, in_use, vpn } => write!(
                f,
                "[{:>3}] {} VPN:{:>4}",
                index,
                if in_use { "USED" } else { "FREE" },
                vpn
            ),
            TraceEvent::PageTableRow { vpn, dirty, frame } => write!(
                f,
                "[{:>3}] {} PRES IN PFN:{:>4}",
                vpn,
                if dirty { "DIRTY" } else { "CLEAN" },
                frame
            ),
            TraceEvent::NoPresentPages => write!(f, "No present pages"),
        }
    }
}

/// Receives trace events in the order the MMU produces them
pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

/// Renders each event as a line of text.
///
/// The first write error is kept and everything after it is dropped;
/// `finish` reports it.
pub struct WriterSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        WriterSink { out, error: None }
    }

    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> TraceSink for WriterSink<W> {
    fn record(&mut self, event: TraceEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", event) {
            self.error = Some(e);
        }
    }
}
