//! Session-scoped hide/show flags keyed by PID

use std::collections::HashMap;

use crate::Pid;

/// Hidden flags that outlive any single snapshot.
///
/// Unknown PIDs are visible. Entries are only added or removed by explicit
/// commands; exited processes leave stale entries until [`retain_live`] is
/// called.
///
/// [`retain_live`]: VisibilityOverlay::retain_live
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityOverlay {
    hidden: HashMap<Pid, bool>,
}

impl VisibilityOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `pid` hidden or visible. Making a PID visible drops its entry.
    pub fn set_hidden(&mut self, pid: Pid, hidden: bool) {
        if hidden {
            self.hidden.insert(pid, true);
        } else {
            self.hidden.remove(&pid);
        }
    }

    pub fn is_hidden(&self, pid: Pid) -> bool {
        self.hidden.get(&pid).copied().unwrap_or(false)
    }

    /// All hidden PIDs, ascending.
    pub fn all_hidden(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self
            .hidden
            .iter()
            .filter(|(_, hidden)| **hidden)
            .map(|(pid, _)| *pid)
            .collect();
        pids.sort_unstable();
        pids
    }

    pub fn clear(&mut self, pid: Pid) {
        self.hidden.remove(&pid);
    }

    /// Drop entries whose PID is not in `live`. Returns the number removed.
    pub fn retain_live(&mut self, live: &[Pid]) -> usize {
        let before = self.hidden.len();
        self.hidden.retain(|pid, _| live.contains(pid));
        before - self.hidden.len()
    }

    pub fn len(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }
}
