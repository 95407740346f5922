use crate::config::MachineConfig;
use crate::error::MmuError;
use crate::io::{Command, Script};
use crate::mmu::Mmu;
use crate::trace::TraceSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Feeds decoded commands to the MMU
pub struct VmManager {
    mmu: Mmu,
}

impl VmManager {
    pub fn new(config: MachineConfig) -> Result<Self, MmuError> {
        Ok(VmManager { mmu: Mmu::new(config)? })
    }

    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn dispatch(&mut self, command: Command, sink: &mut impl TraceSink) -> Result<Flow, MmuError> {
        match command {
            Command::DumpTlb => self.mmu.dump_tlb(sink),
            Command::DumpPageTable => self.mmu.dump_page_table(sink),
            Command::Read(address) => {
                self.mmu.read(address, sink)?;
            }
            Command::Write(address) => {
                self.mmu.write(address, sink)?;
            }
            Command::EndOfInput => return Ok(Flow::Stop),
        }
        Ok(Flow::Continue)
    }

    /// Run the script to its end. The first malformed line or rejected
    /// address stops the run and is returned.
    pub fn run(&mut self, script: &mut Script, sink: &mut impl TraceSink) -> Result<(), MmuError> {
        loop {
            let command = script.next_command()?;
            if self.dispatch(command, sink)? == Flow::Stop {
                return Ok(());
            }
        }
    }
}
