//! Toolhelp process snapshot, used for per-process thread counts
//!
//! sysinfo does not expose thread counts on Windows; PROCESSENTRY32 does.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use windows::Win32::Foundation::INVALID_HANDLE_VALUE;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32First, Process32Next, PROCESSENTRY32, TH32CS_SNAPPROCESS,
};

use crate::win::HandleGuard;
use crate::Pid;

/// Thread count for every process in a fresh Toolhelp snapshot
pub fn thread_counts() -> Result<HashMap<Pid, usize>> {
    let mut counts = HashMap::new();

    // SAFETY: the returned handle is owned by the guard and closed on every path.
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)? };
    if snapshot == INVALID_HANDLE_VALUE {
        return Err(anyhow!("Failed to create process snapshot"));
    }
    let guard = HandleGuard::new(snapshot);

    let mut entry = PROCESSENTRY32 {
        dwSize: std::mem::size_of::<PROCESSENTRY32>() as u32,
        ..Default::default()
    };

    // SAFETY: entry.dwSize is initialised as Process32First requires.
    if unsafe { Process32First(guard.raw(), &mut entry) }.is_err() {
        return Err(anyhow!("Failed to get first process"));
    }

    loop {
        counts.insert(entry.th32ProcessID, entry.cntThreads as usize);

        // SAFETY: same snapshot handle and entry buffer as above.
        if unsafe { Process32Next(guard.raw(), &mut entry) }.is_err() {
            break;
        }
    }

    Ok(counts)
}

pub fn thread_count(pid: Pid) -> Option<usize> {
    match thread_counts() {
        Ok(counts) => counts.get(&pid).copied(),
        Err(e) => {
            log::debug!("Thread count for PID {} unavailable: {}", pid, e);
            None
        }
    }
}
