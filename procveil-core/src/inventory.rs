//! Joins the process snapshot with window titles and the visibility overlay

use std::collections::HashMap;

use crate::config::InventoryConfig;
use crate::overlay::VisibilityOverlay;
use crate::process::{ProcessProvider, ProcessRecord, ProcessStatus};
use crate::snapshot::ProcessSnapshot;
use crate::window::{titles_by_pid, WindowDirectory};
use crate::{InventoryError, Pid};

/// Display-ready row for one process in the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub pid: Pid,
    /// Raw image name, without the hidden marker
    pub name: String,
    /// Name as shown, prefixed with the hidden marker when hidden
    pub display_name: String,
    /// All window titles of the process joined by the configured separator
    pub window_titles: String,
    pub hidden: bool,
    pub user: String,
    pub status: ProcessStatus,
}

/// Result of one inventory build
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub snapshot: ProcessSnapshot,
    pub rows: Vec<RowRecord>,
    /// Set when window enumeration failed; rows then carry no titles
    pub directory_error: Option<InventoryError>,
}

/// Build rows from already-collected inputs.
///
/// Rows follow `processes` order. Hidden processes are dropped unless
/// `show_hidden` is set.
pub fn build_rows(
    processes: &[ProcessRecord],
    titles: &HashMap<Pid, Vec<String>>,
    overlay: &VisibilityOverlay,
    show_hidden: bool,
    config: &InventoryConfig,
) -> Vec<RowRecord> {
    processes
        .iter()
        .filter_map(|proc| {
            let hidden = overlay.is_hidden(proc.pid);
            if hidden && !show_hidden {
                return None;
            }

            let display_name = if hidden {
                format!("{}{}", config.hidden_marker, proc.name)
            } else {
                proc.name.clone()
            };
            let window_titles = titles
                .get(&proc.pid)
                .map(|t| t.join(&config.title_separator))
                .unwrap_or_default();

            Some(RowRecord {
                pid: proc.pid,
                name: proc.name.clone(),
                display_name,
                window_titles,
                hidden,
                user: proc.user.clone(),
                status: proc.status.clone(),
            })
        })
        .collect()
}

/// Poll the window directory and the process provider once each and join them.
///
/// A failing directory does not abort the build: the error is returned in
/// [`Inventory::directory_error`] and every row gets an empty title summary.
pub fn build<P, W>(
    provider: &mut P,
    directory: &W,
    overlay: &VisibilityOverlay,
    show_hidden: bool,
    config: &InventoryConfig,
) -> Inventory
where
    P: ProcessProvider + ?Sized,
    W: WindowDirectory + ?Sized,
{
    let (titles, directory_error) = match directory.enumerate_windows() {
        Ok(windows) => (titles_by_pid(&windows), None),
        Err(e) => {
            log::warn!("Window enumeration failed, continuing without titles: {}", e);
            (HashMap::new(), Some(e))
        }
    };

    let mut snapshot = ProcessSnapshot::capture(provider);
    snapshot.apply_overlay(overlay);

    let rows = build_rows(
        &snapshot.processes,
        &titles,
        overlay,
        show_hidden,
        config,
    );
    log::debug!(
        "Built {} rows from {} processes (show_hidden={})",
        rows.len(),
        snapshot.len(),
        show_hidden
    );

    Inventory {
        snapshot,
        rows,
        directory_error,
    }
}
