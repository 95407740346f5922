use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MmuError {
    #[error("VPN {vpn} is outside the supported address space ({virtual_pages} pages)")]
    AddressOutOfRange { vpn: u32, virtual_pages: usize },
    #[error("line {line}: unrecognized command {text:?}")]
    MalformedCommand { line: usize, text: String },
    #[error("invalid machine configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read {}: {}", .path.display(), .source)]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
