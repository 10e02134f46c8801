//! Command surface consumed by a UI: refresh, visibility, control, search, sort

use crate::config::InventoryConfig;
use crate::filter::{
    self, FilteredView, SearchMode, SearchQuery, SortDirection, SortKey, SortState,
};
use crate::inventory::{self, RowRecord};
use crate::overlay::VisibilityOverlay;
use crate::process::{ProcessDetail, ProcessProvider, SystemProcessProvider};
use crate::snapshot::ProcessSnapshot;
use crate::window::{SystemWindowDirectory, WindowDirectory};
use crate::{InventoryError, Pid};

/// Outcome of terminating every hidden process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTermination {
    pub terminated: Vec<Pid>,
    pub failed: Vec<(Pid, InventoryError)>,
}

/// Owns the overlay, sort state and current query for one application session.
///
/// Every mutation takes `&mut self`, so a build always sees a single overlay
/// state. Hosts that share a session across threads must wrap it in a mutex.
pub struct Session<P, W> {
    provider: P,
    directory: W,
    config: InventoryConfig,
    overlay: VisibilityOverlay,
    snapshot: ProcessSnapshot,
    rows: Vec<RowRecord>,
    view: FilteredView,
    query: SearchQuery,
    sort: SortState,
    show_hidden: bool,
    directory_error: Option<InventoryError>,
}

impl Session<SystemProcessProvider, SystemWindowDirectory> {
    /// Session against the live OS
    pub fn system(config: InventoryConfig) -> Self {
        let provider = SystemProcessProvider::new(&config);
        Self::new(provider, SystemWindowDirectory, config)
    }
}

impl<P: ProcessProvider, W: WindowDirectory> Session<P, W> {
    pub fn new(provider: P, directory: W, config: InventoryConfig) -> Self {
        Self {
            provider,
            directory,
            config,
            overlay: VisibilityOverlay::new(),
            snapshot: ProcessSnapshot::default(),
            rows: Vec::new(),
            view: FilteredView::default(),
            query: SearchQuery::default(),
            sort: SortState::default(),
            show_hidden: false,
            directory_error: None,
        }
    }

    /// Re-snapshot and rebuild the view with the current query and sort.
    pub fn refresh(&mut self, show_hidden: bool) -> &FilteredView {
        self.show_hidden = show_hidden;
        let built = inventory::build(
            &mut self.provider,
            &self.directory,
            &self.overlay,
            show_hidden,
            &self.config,
        );
        self.snapshot = built.snapshot;
        self.rows = built.rows;
        self.directory_error = built.directory_error;
        self.reapply()
    }

    fn reapply(&mut self) -> &FilteredView {
        self.view = filter::apply(&self.rows, &self.query, self.sort);
        &self.view
    }

    /// Hide or show a process, flip its OS windows, and rebuild.
    ///
    /// Hiding requires the PID to be in the last snapshot. Window changes are
    /// best effort and never fail the command.
    pub fn set_visibility(&mut self, pid: Pid, hidden: bool) -> Result<(), InventoryError> {
        if hidden && !self.snapshot.has_pid(pid) {
            return Err(InventoryError::NoSuchProcess { pid });
        }

        match self.directory.set_process_windows_visible(pid, !hidden) {
            Ok(count) => log::debug!("Toggled {} window(s) for PID {}", count, pid),
            Err(e) => log::debug!("Windows of PID {} left unchanged: {}", pid, e),
        }

        self.overlay.set_hidden(pid, hidden);
        log::info!(
            "{} PID {}",
            if hidden { "Hid" } else { "Unhid" },
            pid
        );

        let show_hidden = self.show_hidden;
        self.refresh(show_hidden);
        Ok(())
    }

    /// Request termination. The row stays until the next refresh.
    pub fn terminate(&mut self, pid: Pid) -> Result<(), InventoryError> {
        match self.provider.terminate(pid) {
            Ok(()) => {
                self.overlay.clear(pid);
                log::info!("Terminated PID {}", pid);
                Ok(())
            }
            Err(e) => {
                log::warn!("Terminate PID {} failed: {}", pid, e);
                Err(e)
            }
        }
    }

    pub fn suspend(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.provider.suspend(pid).inspect_err(|e| {
            log::warn!("Suspend PID {} failed: {}", pid, e);
        })
    }

    pub fn resume(&mut self, pid: Pid) -> Result<(), InventoryError> {
        self.provider.resume(pid).inspect_err(|e| {
            log::warn!("Resume PID {} failed: {}", pid, e);
        })
    }

    /// Detail query; blocks for the configured CPU sampling interval.
    pub fn describe(&mut self, pid: Pid) -> Result<ProcessDetail, InventoryError> {
        let mut detail = self.provider.describe(pid)?;
        detail.hidden = self.overlay.is_hidden(pid);
        Ok(detail)
    }

    /// Terminate every hidden process. Individual failures do not stop the batch.
    pub fn terminate_all_hidden(&mut self) -> BatchTermination {
        let mut report = BatchTermination::default();
        for pid in self.overlay.all_hidden() {
            match self.provider.terminate(pid) {
                Ok(()) => {
                    self.overlay.clear(pid);
                    report.terminated.push(pid);
                }
                Err(e) => {
                    log::warn!("Terminate hidden PID {} failed: {}", pid, e);
                    report.failed.push((pid, e));
                }
            }
        }
        log::info!(
            "Terminated {} hidden process(es), {} failed",
            report.terminated.len(),
            report.failed.len()
        );
        report
    }

    /// Drop overlay entries for PIDs missing from the last snapshot.
    pub fn prune_overlay(&mut self) -> usize {
        let live: Vec<Pid> = self.snapshot.pids().collect();
        self.overlay.retain_live(&live)
    }

    pub fn search(&mut self, text: &str, mode: SearchMode) -> &FilteredView {
        self.query = SearchQuery::new(text, mode);
        self.reapply()
    }

    pub fn sort(&mut self, key: SortKey, direction: SortDirection) -> &FilteredView {
        self.sort = SortState::new(key, direction);
        self.reapply()
    }

    /// Header-click sorting: same key toggles direction, new key sorts ascending.
    pub fn click_sort(&mut self, key: SortKey) -> &FilteredView {
        self.sort.toggle_or_set(key);
        self.reapply()
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    /// Rows of the last build in snapshot order, before sorting and filtering
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn snapshot(&self) -> &ProcessSnapshot {
        &self.snapshot
    }

    pub fn overlay(&self) -> &VisibilityOverlay {
        &self.overlay
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Window enumeration failure from the last refresh, if any
    pub fn directory_error(&self) -> Option<&InventoryError> {
        self.directory_error.as_ref()
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }
}
