//! Top-level window directory: which process owns which titled window

use std::collections::HashMap;

use crate::{InventoryError, Pid};

/// A titled top-level window and the process that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub pid: Pid,
    pub title: String,
}

/// Read access to the session's top-level windows.
pub trait WindowDirectory {
    /// All titled top-level windows, in enumeration order.
    ///
    /// Fails with [`InventoryError::DirectoryUnavailable`] when the platform
    /// call fails; callers fall back to an empty list.
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>, InventoryError>;

    /// Show or hide every top-level window owned by `pid`.
    /// Returns the number of windows touched.
    fn set_process_windows_visible(&self, pid: Pid, visible: bool)
        -> Result<usize, InventoryError>;
}

/// Directory backed by the desktop window manager on Windows.
/// Elsewhere there is no notion of a process-owned window and it is always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWindowDirectory;

impl WindowDirectory for SystemWindowDirectory {
    #[cfg(windows)]
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>, InventoryError> {
        crate::win::window_enum::enumerate_top_level_windows()
            .map_err(|e| InventoryError::DirectoryUnavailable(e.to_string()))
    }

    #[cfg(not(windows))]
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>, InventoryError> {
        Ok(Vec::new())
    }

    #[cfg(windows)]
    fn set_process_windows_visible(
        &self,
        pid: Pid,
        visible: bool,
    ) -> Result<usize, InventoryError> {
        crate::win::window_enum::set_process_windows_visible(pid, visible)
            .map_err(|e| InventoryError::DirectoryUnavailable(e.to_string()))
    }

    #[cfg(not(windows))]
    fn set_process_windows_visible(
        &self,
        _pid: Pid,
        _visible: bool,
    ) -> Result<usize, InventoryError> {
        Err(InventoryError::UnsupportedOperation {
            operation: "window visibility",
        })
    }
}

/// Group window titles by owning PID, keeping enumeration order within each group.
/// Empty titles are dropped.
pub fn titles_by_pid(windows: &[WindowInfo]) -> HashMap<Pid, Vec<String>> {
    let mut map: HashMap<Pid, Vec<String>> = HashMap::new();
    for window in windows {
        if window.title.is_empty() {
            continue;
        }
        map.entry(window.pid).or_default().push(window.title.clone());
    }
    map
}
