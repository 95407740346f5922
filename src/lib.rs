pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod mmu;
pub mod tlb;
pub mod trace;
pub mod translation;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use config::MachineConfig;
pub use error::MmuError;
pub use io::{Command, Script};
pub use mmu::{Mmu, Stats};
pub use trace::{TraceEvent, TraceSink, WriterSink};
pub use translation::{Resolution, VirtualAddress};
pub use vm_manager::{Flow, VmManager};
