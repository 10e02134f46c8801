//! Windows-specific implementations

pub mod process_control;
pub mod process_enum;
pub mod window_enum;

use windows::Win32::Foundation::{CloseHandle, HANDLE};

/// RAII wrapper for Windows HANDLEs. Closes the handle on Drop.
pub struct HandleGuard(HANDLE);

impl HandleGuard {
    pub fn new(h: HANDLE) -> Self {
        Self(h)
    }

    /// Get the raw HANDLE value (by copy).
    pub fn raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for HandleGuard {
    fn drop(&mut self) {
        unsafe {
            if !self.0.is_invalid() && !self.0 .0.is_null() {
                let _ = CloseHandle(self.0);
            }
        }
    }
}
