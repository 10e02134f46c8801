//! Process enumeration, control and detail queries

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, Users};

use crate::config::InventoryConfig;
use crate::{InventoryError, Pid};

/// Scheduler state of a process at snapshot time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessStatus {
    Running,
    Sleeping,
    Idle,
    Stopped,
    Zombie,
    Dead,
    Other(String),
}

impl From<sysinfo::ProcessStatus> for ProcessStatus {
    fn from(status: sysinfo::ProcessStatus) -> Self {
        match status {
            sysinfo::ProcessStatus::Run => Self::Running,
            sysinfo::ProcessStatus::Sleep => Self::Sleeping,
            sysinfo::ProcessStatus::Idle => Self::Idle,
            sysinfo::ProcessStatus::Stop => Self::Stopped,
            sysinfo::ProcessStatus::Zombie => Self::Zombie,
            sysinfo::ProcessStatus::Dead => Self::Dead,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Sleeping => f.write_str("sleeping"),
            Self::Idle => f.write_str("idle"),
            Self::Stopped => f.write_str("stopped"),
            Self::Zombie => f.write_str("zombie"),
            Self::Dead => f.write_str("dead"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// One entry of a process snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: Pid,
    /// Image name (e.g., "notepad.exe")
    pub name: String,
    /// Owning account, empty when it cannot be resolved
    pub user: String,
    pub status: ProcessStatus,
    /// Filled from the visibility overlay when the snapshot is built
    pub hidden: bool,
}

/// Detail view of a single process.
///
/// Fields that could not be read (permissions, platform limits) are `None`
/// or empty rather than failing the whole query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessDetail {
    pub pid: Pid,
    pub name: String,
    pub status: ProcessStatus,
    pub user: Option<String>,
    /// CPU percentage over the sampling window (may exceed 100 on multi-core)
    pub cpu_percent: f32,
    pub resident_bytes: u64,
    pub virtual_bytes: u64,
    pub thread_count: Option<usize>,
    pub exe_path: Option<PathBuf>,
    pub command_line: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub created_at: Option<DateTime<Utc>>,
    pub hidden: bool,
}

/// Source of process snapshots and process control
pub trait ProcessProvider {
    /// Best-effort list of live processes; unreadable entries are skipped.
    fn list_processes(&mut self) -> Vec<ProcessRecord>;

    fn terminate(&mut self, pid: Pid) -> Result<(), InventoryError>;

    /// Freeze a process. Semantics are platform-defined.
    fn suspend(&mut self, pid: Pid) -> Result<(), InventoryError>;

    fn resume(&mut self, pid: Pid) -> Result<(), InventoryError>;

    /// Blocks for the CPU sampling interval.
    fn describe(&mut self, pid: Pid) -> Result<ProcessDetail, InventoryError>;
}

/// Live provider backed by `sysinfo`, with Windows-native control calls.
pub struct SystemProcessProvider {
    system: System,
    users: Users,
    sample_interval: Duration,
    protect_self: bool,
}

impl SystemProcessProvider {
    pub fn new(config: &InventoryConfig) -> Self {
        Self {
            system: System::new(),
            users: Users::new_with_refreshed_list(),
            sample_interval: config.cpu_sample_interval(),
            protect_self: config.protect_self,
        }
    }

    /// Refresh a single PID; returns whether it is still alive.
    /// Thread IDs do not count as processes.
    fn refresh_one(&mut self, pid: Pid) -> bool {
        let sys_pid = sysinfo::Pid::from_u32(pid);
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        self.system
            .process(sys_pid)
            .is_some_and(|process| process.thread_kind().is_none())
    }

    fn user_name(&self, process: &sysinfo::Process) -> Option<String> {
        process
            .user_id()
            .and_then(|uid| self.users.get_user_by_id(uid))
            .map(|user| user.name().to_string())
    }

    fn check_protected(&self, pid: Pid) -> Result<(), InventoryError> {
        if self.protect_self && pid == std::process::id() {
            return Err(InventoryError::Refused {
                pid,
                reason: "procveil",
            });
        }
        Ok(())
    }
}

#[cfg(windows)]
impl SystemProcessProvider {
    fn platform_terminate(&mut self, pid: Pid) -> Result<(), InventoryError> {
        crate::win::process_control::terminate_process(pid)
    }

    fn platform_suspend(&mut self, pid: Pid) -> Result<(), InventoryError> {
        crate::win::process_control::suspend_process(pid)
    }

    fn platform_resume(&mut self, pid: Pid) -> Result<(), InventoryError> {
        crate::win::process_control::resume_process(pid)
    }
}

#[cfg(not(windows))]
impl SystemProcessProvider {
    fn platform_terminate(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.send_signal(pid, sysinfo::Signal::Term, "terminate")
    }

    fn platform_suspend(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.send_signal(pid, sysinfo::Signal::Stop, "suspend")
    }

    fn platform_resume(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.send_signal(pid, sysinfo::Signal::Continue, "resume")
    }

    fn send_signal(
        &mut self,
        pid: Pid,
        signal: sysinfo::Signal,
        operation: &'static str,
    ) -> Result<(), InventoryError> {
        if !self.refresh_one(pid) {
            return Err(InventoryError::NoSuchProcess { pid });
        }
        let process = self
            .system
            .process(sysinfo::Pid::from_u32(pid))
            .ok_or(InventoryError::NoSuchProcess { pid })?;

        match process.kill_with(signal) {
            Some(true) => Ok(()),
            // The target existed a moment ago, so a refused signal is a permission problem.
            Some(false) => Err(InventoryError::AccessDenied { pid }),
            None => Err(InventoryError::UnsupportedOperation { operation }),
        }
    }
}

impl ProcessProvider for SystemProcessProvider {
    fn list_processes(&mut self) -> Vec<ProcessRecord> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );
        self.users.refresh_list();

        let mut records: Vec<ProcessRecord> = self
            .system
            .processes()
            .iter()
            // Linux reports every task of a process as its own entry.
            .filter(|(_, process)| process.thread_kind().is_none())
            .map(|(pid, process)| ProcessRecord {
                pid: pid.as_u32(),
                name: lossy(process.name()).trim().to_string(),
                user: self.user_name(process).unwrap_or_default(),
                status: process.status().into(),
                hidden: false,
            })
            .collect();

        // sysinfo keys processes by hash; PID order keeps repeated snapshots stable.
        records.sort_by_key(|r| r.pid);
        log::debug!("Enumerated {} processes", records.len());
        records
    }

    fn terminate(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.check_protected(pid)?;
        self.platform_terminate(pid)
    }

    fn suspend(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.platform_suspend(pid)
    }

    fn resume(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.platform_resume(pid)
    }

    fn describe(&mut self, pid: Pid) -> Result<ProcessDetail, InventoryError> {
        if !self.refresh_one(pid) {
            return Err(InventoryError::NoSuchProcess { pid });
        }

        // CPU usage is the delta between two refreshes of the same process.
        std::thread::sleep(self.sample_interval);
        if !self.refresh_one(pid) {
            return Err(InventoryError::NoSuchProcess { pid });
        }

        let process = self
            .system
            .process(sysinfo::Pid::from_u32(pid))
            .ok_or(InventoryError::NoSuchProcess { pid })?;

        Ok(ProcessDetail {
            pid,
            name: lossy(process.name()),
            status: process.status().into(),
            user: self.user_name(process),
            cpu_percent: process.cpu_usage(),
            resident_bytes: process.memory(),
            virtual_bytes: process.virtual_memory(),
            thread_count: thread_count(pid, process),
            exe_path: process.exe().map(Path::to_path_buf),
            command_line: process.cmd().iter().map(lossy).collect(),
            working_dir: process.cwd().map(Path::to_path_buf),
            created_at: created_at(process.start_time()),
            hidden: false,
        })
    }
}

fn lossy<S: AsRef<OsStr> + ?Sized>(s: &S) -> String {
    s.as_ref().to_string_lossy().into_owned()
}

fn created_at(start_time_secs: u64) -> Option<DateTime<Utc>> {
    if start_time_secs == 0 {
        return None;
    }
    DateTime::from_timestamp(i64::try_from(start_time_secs).ok()?, 0)
}

#[cfg(windows)]
fn thread_count(pid: Pid, _process: &sysinfo::Process) -> Option<usize> {
    crate::win::process_enum::thread_count(pid)
}

#[cfg(not(windows))]
fn thread_count(_pid: Pid, process: &sysinfo::Process) -> Option<usize> {
    process.tasks().map(|tasks| tasks.len())
}

/// Get a list of all running processes
pub fn enumerate_processes() -> Vec<ProcessRecord> {
    SystemProcessProvider::new(&InventoryConfig::default()).list_processes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_is_lowercase() {
        assert_eq!(ProcessStatus::Running.to_string(), "running");
        assert_eq!(ProcessStatus::Zombie.to_string(), "zombie");
        assert_eq!(ProcessStatus::Other("tracing".into()).to_string(), "tracing");
    }

    #[test]
    fn zero_start_time_is_unknown() {
        assert_eq!(created_at(0), None);
        let ts = created_at(1_700_000_000).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn enumerate_processes_includes_current_pid() {
        let me = std::process::id();
        let processes = enumerate_processes();
        assert!(!processes.is_empty());
        assert!(processes.iter().any(|p| p.pid == me));
    }

    #[test]
    fn enumeration_is_sorted_by_pid() {
        let processes = enumerate_processes();
        assert!(processes.windows(2).all(|w| w[0].pid < w[1].pid));
    }

    #[test]
    fn terminate_refuses_self() {
        let mut provider = SystemProcessProvider::new(&InventoryConfig::default());
        let pid = std::process::id();
        assert_eq!(
            provider.terminate(pid),
            Err(InventoryError::Refused {
                pid,
                reason: "procveil"
            })
        );
    }

    #[test]
    fn describe_unknown_pid_is_no_such_process() {
        let mut provider = SystemProcessProvider::new(&InventoryConfig::default());
        assert_eq!(
            provider.describe(u32::MAX - 1),
            Err(InventoryError::NoSuchProcess { pid: u32::MAX - 1 })
        );
    }

    #[test]
    fn every_process_entry_is_listed_once() {
        let mut provider = SystemProcessProvider::new(&InventoryConfig::default());
        let records = provider.list_processes();
        let expected = provider
            .system
            .processes()
            .values()
            .filter(|p| p.thread_kind().is_none())
            .count();
        assert_eq!(records.len(), expected);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn threads_are_not_listed_as_processes() {
        use std::sync::{Arc, Barrier};

        let me = std::process::id();
        let barrier = Arc::new(Barrier::new(5));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    barrier.wait();
                })
            })
            .collect();
        barrier.wait();

        let task_ids: Vec<Pid> = std::fs::read_dir(format!("/proc/{}/task", me))
            .unwrap()
            .filter_map(|entry| entry.ok()?.file_name().to_str()?.parse().ok())
            .filter(|tid| *tid != me)
            .collect();
        let listed = enumerate_processes();

        barrier.wait();
        for worker in workers {
            worker.join().unwrap();
        }

        assert!(task_ids.len() >= 4);
        assert!(listed.iter().any(|p| p.pid == me));
        let leaked: Vec<Pid> = listed
            .iter()
            .map(|p| p.pid)
            .filter(|pid| task_ids.contains(pid))
            .collect();
        assert!(leaked.is_empty(), "thread IDs listed as processes: {:?}", leaked);

        let mut provider = SystemProcessProvider::new(&InventoryConfig {
            cpu_sample_interval_ms: 1,
            ..InventoryConfig::default()
        });
        let tid = task_ids[0];
        assert_eq!(
            provider.describe(tid),
            Err(InventoryError::NoSuchProcess { pid: tid })
        );
    }
}
