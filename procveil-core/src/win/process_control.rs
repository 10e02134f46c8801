//! Terminate / suspend / resume via kernel32 and ntdll

use windows::core::{HRESULT, PCSTR};
use windows::Win32::Foundation::{ERROR_ACCESS_DENIED, ERROR_INVALID_PARAMETER, HANDLE};
use windows::Win32::System::LibraryLoader::{GetModuleHandleA, GetProcAddress};
use windows::Win32::System::Threading::{
    OpenProcess, TerminateProcess, PROCESS_SUSPEND_RESUME, PROCESS_TERMINATE,
};

use crate::win::HandleGuard;
use crate::{InventoryError, Pid};

const STATUS_ACCESS_DENIED: i32 = 0xC000_0022_u32 as i32;

const FACILITY_WIN32_MASK: u32 = 0xFFFF_0000;
const FACILITY_WIN32_PREFIX: u32 = 0x8007_0000;

fn map_os_error(pid: Pid, err: &windows::core::Error) -> InventoryError {
    map_hresult(pid, err.code())
}

/// Win32 failures arrive wrapped as `HRESULT_FROM_WIN32`; report the bare code.
fn map_hresult(pid: Pid, hr: HRESULT) -> InventoryError {
    if hr == ERROR_ACCESS_DENIED.to_hresult() {
        return InventoryError::AccessDenied { pid };
    }
    if hr == ERROR_INVALID_PARAMETER.to_hresult() {
        return InventoryError::NoSuchProcess { pid };
    }
    let raw = hr.0 as u32;
    let code = if raw & FACILITY_WIN32_MASK == FACILITY_WIN32_PREFIX {
        raw & !FACILITY_WIN32_MASK
    } else {
        raw
    };
    InventoryError::Os { pid, code }
}

/// Terminate a single process by PID.
///
/// Blocks PID 0 (System Idle) and PID 4 (System).
pub fn terminate_process(pid: Pid) -> Result<(), InventoryError> {
    if pid == 0 {
        return Err(InventoryError::Refused {
            pid,
            reason: "System Idle",
        });
    }
    if pid == 4 {
        return Err(InventoryError::Refused {
            pid,
            reason: "System",
        });
    }

    // SAFETY: OpenProcess with a plain PID; the handle is closed by the guard.
    let handle =
        unsafe { OpenProcess(PROCESS_TERMINATE, false, pid) }.map_err(|e| map_os_error(pid, &e))?;
    let guard = HandleGuard::new(handle);

    // SAFETY: handle was opened with PROCESS_TERMINATE.
    unsafe { TerminateProcess(guard.raw(), 1) }.map_err(|e| map_os_error(pid, &e))?;

    Ok(())
}

/// Suspend every thread of a process using NtSuspendProcess.
pub fn suspend_process(pid: Pid) -> Result<(), InventoryError> {
    call_ntdll_process_fn(pid, b"NtSuspendProcess\0", "suspend")
}

/// Resume a process suspended with [`suspend_process`].
pub fn resume_process(pid: Pid) -> Result<(), InventoryError> {
    call_ntdll_process_fn(pid, b"NtResumeProcess\0", "resume")
}

fn call_ntdll_process_fn(
    pid: Pid,
    symbol: &'static [u8],
    operation: &'static str,
) -> Result<(), InventoryError> {
    unsafe {
        let ntdll = GetModuleHandleA(PCSTR(b"ntdll.dll\0".as_ptr()))
            .map_err(|_| InventoryError::UnsupportedOperation { operation })?;
        let Some(addr) = GetProcAddress(ntdll, PCSTR(symbol.as_ptr())) else {
            return Err(InventoryError::UnsupportedOperation { operation });
        };

        // SAFETY: both exports take a single process handle and return an NTSTATUS.
        let nt_fn: unsafe extern "system" fn(HANDLE) -> i32 = std::mem::transmute(addr);

        let handle = OpenProcess(PROCESS_SUSPEND_RESUME, false, pid)
            .map_err(|e| map_os_error(pid, &e))?;
        let guard = HandleGuard::new(handle);

        let status = nt_fn(guard.raw());
        match status {
            0 => Ok(()),
            STATUS_ACCESS_DENIED => Err(InventoryError::AccessDenied { pid }),
            _ => Err(InventoryError::Os {
                pid,
                code: status as u32,
            }),
        }
    }
}
