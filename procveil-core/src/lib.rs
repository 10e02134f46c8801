//! procveil core library
//! Process inventory, window correlation, visibility overlay and filter/sort engine

use thiserror::Error;

/// OS process identifier as reported at snapshot time.
pub type Pid = u32;

/// Failure conditions surfaced to the command layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Process not found (PID {pid})")]
    NoSuchProcess { pid: Pid },

    #[error("Access denied (PID {pid})")]
    AccessDenied { pid: Pid },

    #[error("{operation} is not supported on this platform")]
    UnsupportedOperation { operation: &'static str },

    #[error("Window directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Refusing to terminate PID {pid} ({reason})")]
    Refused { pid: Pid, reason: &'static str },

    #[error("OS error {code} (PID {pid})")]
    Os { pid: Pid, code: u32 },
}

pub mod config;
pub mod filter;
pub mod inventory;
pub mod overlay;
pub mod phonetic;
pub mod process;
pub mod session;
pub mod snapshot;
#[cfg(windows)]
pub mod win;
pub mod window;

pub use config::InventoryConfig;
pub use filter::{FilteredView, SearchMode, SearchQuery, SortDirection, SortKey, SortState};
pub use inventory::RowRecord;
pub use overlay::VisibilityOverlay;
pub use process::{ProcessDetail, ProcessProvider, ProcessRecord, ProcessStatus};
pub use session::{BatchTermination, Session};
pub use window::{WindowDirectory, WindowInfo};

/// Get the library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
