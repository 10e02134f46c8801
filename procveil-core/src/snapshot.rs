//! Process snapshot functionality

use crate::overlay::VisibilityOverlay;
use crate::process::{ProcessProvider, ProcessRecord};
use crate::Pid;
use std::collections::HashMap;
use std::time::Instant;

/// A snapshot of processes at a specific point in time
#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    /// When the snapshot was taken
    pub taken_at: Instant,
    /// All processes in the snapshot, in enumeration order
    pub processes: Vec<ProcessRecord>,
    /// Quick lookup map: PID -> index into `processes`
    index: HashMap<Pid, usize>,
}

impl ProcessSnapshot {
    /// Take a new snapshot from the provider
    pub fn capture<P: ProcessProvider + ?Sized>(provider: &mut P) -> Self {
        Self::from_records(provider.list_processes())
    }

    pub fn from_records(processes: Vec<ProcessRecord>) -> Self {
        let index = processes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.pid, i))
            .collect();

        Self {
            taken_at: Instant::now(),
            processes,
            index,
        }
    }

    /// Copy hidden flags from the overlay onto each record
    pub fn apply_overlay(&mut self, overlay: &VisibilityOverlay) {
        for process in &mut self.processes {
            process.hidden = overlay.is_hidden(process.pid);
        }
    }

    /// Get a process by PID
    pub fn get_process(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.index.get(&pid).map(|&i| &self.processes[i])
    }

    /// Check if a PID exists in this snapshot
    pub fn has_pid(&self, pid: Pid) -> bool {
        self.index.contains_key(&pid)
    }

    /// Get all PIDs in this snapshot, in enumeration order
    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.processes.iter().map(|p| p.pid)
    }

    /// Get the number of processes
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Check if snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

impl Default for ProcessSnapshot {
    fn default() -> Self {
        Self::from_records(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessStatus;

    fn record(pid: Pid, name: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            user: String::new(),
            status: ProcessStatus::Running,
            hidden: false,
        }
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = ProcessSnapshot::from_records(vec![record(4, "a"), record(2, "b")]);

        for process in &snapshot.processes {
            assert_eq!(snapshot.get_process(process.pid), Some(process));
            assert!(snapshot.has_pid(process.pid));
        }

        assert!(!snapshot.has_pid(u32::MAX));
        assert_eq!(snapshot.get_process(u32::MAX), None);
    }

    #[test]
    fn test_snapshot_pids_keep_enumeration_order() {
        let snapshot =
            ProcessSnapshot::from_records(vec![record(9, "a"), record(3, "b"), record(5, "c")]);
        assert_eq!(snapshot.pids().collect::<Vec<_>>(), vec![9, 3, 5]);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn test_apply_overlay_marks_hidden() {
        let mut snapshot = ProcessSnapshot::from_records(vec![record(1, "a"), record(2, "b")]);
        let mut overlay = VisibilityOverlay::new();
        overlay.set_hidden(2, true);
        overlay.set_hidden(77, true);

        snapshot.apply_overlay(&overlay);
        assert!(!snapshot.processes[0].hidden);
        assert!(snapshot.processes[1].hidden);
    }

    #[test]
    fn test_default_is_empty() {
        assert!(ProcessSnapshot::default().is_empty());
    }
}
