//! Top-level window enumeration (EnumWindows) and per-process show/hide
//!
//! The EnumWindows callback only collects HWNDs; titles and owners are read
//! afterwards.

use anyhow::Result;
use windows::Win32::Foundation::{BOOL, HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, ShowWindow,
    SW_HIDE, SW_SHOW,
};

use crate::window::WindowInfo;
use crate::Pid;

unsafe extern "system" fn collect_hwnd(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam carries the &mut Vec<HWND> passed to EnumWindows below,
    // which outlives the synchronous enumeration.
    let out = &mut *(lparam.0 as *mut Vec<HWND>);
    out.push(hwnd);
    BOOL(1)
}

fn top_level_hwnds() -> Result<Vec<HWND>> {
    let mut hwnds: Vec<HWND> = Vec::new();
    // SAFETY: see collect_hwnd.
    unsafe {
        EnumWindows(
            Some(collect_hwnd),
            LPARAM(&mut hwnds as *mut Vec<HWND> as isize),
        )?;
    }
    Ok(hwnds)
}

fn window_pid(hwnd: HWND) -> Pid {
    let mut pid: u32 = 0;
    // SAFETY: pid is a valid out pointer for the duration of the call.
    unsafe {
        GetWindowThreadProcessId(hwnd, Some(&mut pid as *mut u32));
    }
    pid
}

fn window_title(hwnd: HWND) -> String {
    // SAFETY: buffer is sized from GetWindowTextLengthW plus the terminator.
    unsafe {
        let len = GetWindowTextLengthW(hwnd);
        if len <= 0 {
            return String::new();
        }
        let mut buf = vec![0u16; len as usize + 1];
        let copied = GetWindowTextW(hwnd, &mut buf);
        if copied <= 0 {
            return String::new();
        }
        String::from_utf16_lossy(&buf[..copied as usize])
    }
}

/// All titled top-level windows in enumeration order
pub fn enumerate_top_level_windows() -> Result<Vec<WindowInfo>> {
    let windows: Vec<WindowInfo> = top_level_hwnds()?
        .into_iter()
        .filter_map(|hwnd| {
            let title = window_title(hwnd);
            if title.is_empty() {
                return None;
            }
            Some(WindowInfo {
                pid: window_pid(hwnd),
                title,
            })
        })
        .collect();

    log::debug!("Enumerated {} titled top-level windows", windows.len());
    Ok(windows)
}

/// Show or hide every top-level window owned by `pid`
pub fn set_process_windows_visible(pid: Pid, visible: bool) -> Result<usize> {
    let cmd = if visible { SW_SHOW } else { SW_HIDE };
    let mut touched = 0;
    for hwnd in top_level_hwnds()? {
        if window_pid(hwnd) != pid {
            continue;
        }
        // SAFETY: hwnd came from EnumWindows; ShowWindow tolerates stale handles.
        // The return value is the previous visibility, not an error.
        let _ = unsafe { ShowWindow(hwnd, cmd) };
        touched += 1;
    }
    Ok(touched)
}
