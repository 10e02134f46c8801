#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use procveil_core::{
    InventoryError, Pid, ProcessDetail, ProcessProvider, ProcessRecord, ProcessStatus,
    WindowDirectory, WindowInfo,
};

pub fn record(pid: Pid, name: &str) -> ProcessRecord {
    ProcessRecord {
        pid,
        name: name.to_string(),
        user: "tester".to_string(),
        status: ProcessStatus::Running,
        hidden: false,
    }
}

pub fn window(pid: Pid, title: &str) -> WindowInfo {
    WindowInfo {
        pid,
        title: title.to_string(),
    }
}

/// In-memory process table. Terminated processes disappear from later listings.
#[derive(Debug, Default)]
pub struct FakeProvider {
    pub processes: Vec<ProcessRecord>,
    pub denied: HashSet<Pid>,
    pub list_calls: usize,
    /// PIDs that exited outside the session's control
    pub exited: Rc<RefCell<HashSet<Pid>>>,
}

impl FakeProvider {
    pub fn new(processes: Vec<ProcessRecord>) -> Self {
        Self {
            processes,
            ..Default::default()
        }
    }

    pub fn deny(mut self, pid: Pid) -> Self {
        self.denied.insert(pid);
        self
    }

    fn check(&self, pid: Pid) -> Result<(), InventoryError> {
        if !self.processes.iter().any(|p| p.pid == pid) {
            return Err(InventoryError::NoSuchProcess { pid });
        }
        if self.denied.contains(&pid) {
            return Err(InventoryError::AccessDenied { pid });
        }
        Ok(())
    }
}

impl ProcessProvider for FakeProvider {
    fn list_processes(&mut self) -> Vec<ProcessRecord> {
        self.list_calls += 1;
        let exited = self.exited.borrow();
        self.processes.retain(|p| !exited.contains(&p.pid));
        self.processes.clone()
    }

    fn terminate(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.check(pid)?;
        self.processes.retain(|p| p.pid != pid);
        Ok(())
    }

    fn suspend(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.check(pid)?;
        if let Some(p) = self.processes.iter_mut().find(|p| p.pid == pid) {
            p.status = ProcessStatus::Stopped;
        }
        Ok(())
    }

    fn resume(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.check(pid)?;
        if let Some(p) = self.processes.iter_mut().find(|p| p.pid == pid) {
            p.status = ProcessStatus::Running;
        }
        Ok(())
    }

    fn describe(&mut self, pid: Pid) -> Result<ProcessDetail, InventoryError> {
        let proc = self
            .processes
            .iter()
            .find(|p| p.pid == pid)
            .ok_or(InventoryError::NoSuchProcess { pid })?;
        Ok(ProcessDetail {
            pid,
            name: proc.name.clone(),
            status: proc.status.clone(),
            user: Some(proc.user.clone()),
            cpu_percent: 0.0,
            resident_bytes: 4096,
            virtual_bytes: 8192,
            thread_count: Some(1),
            exe_path: None,
            command_line: Vec::new(),
            working_dir: None,
            created_at: None,
            hidden: false,
        })
    }
}

/// Window list with an optional forced failure; records show/hide requests.
#[derive(Debug, Default, Clone)]
pub struct FakeDirectory {
    pub windows: Vec<WindowInfo>,
    pub fail: bool,
    pub visibility_calls: Rc<RefCell<Vec<(Pid, bool)>>>,
}

impl FakeDirectory {
    pub fn new(windows: Vec<WindowInfo>) -> Self {
        Self {
            windows,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

impl WindowDirectory for FakeDirectory {
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>, InventoryError> {
        if self.fail {
            return Err(InventoryError::DirectoryUnavailable(
                "EnumWindows failed".to_string(),
            ));
        }
        Ok(self.windows.clone())
    }

    fn set_process_windows_visible(
        &self,
        pid: Pid,
        visible: bool,
    ) -> Result<usize, InventoryError> {
        self.visibility_calls.borrow_mut().push((pid, visible));
        Ok(self.windows.iter().filter(|w| w.pid == pid).count())
    }
}

/// chrome (100, "Inbox") and notepad (200, no windows)
pub fn browser_and_editor() -> (FakeProvider, FakeDirectory) {
    (
        FakeProvider::new(vec![record(100, "chrome.exe"), record(200, "notepad.exe")]),
        FakeDirectory::new(vec![window(100, "Inbox")]),
    )
}
