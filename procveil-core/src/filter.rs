//! Search filtering and column sorting over inventory rows.
//!
//! Both operations are pure: they take rows by reference and return a new
//! ordering plus a visibility mask. Masked rows stay in the view so a later
//! query can reveal them without a rebuild.

use std::cmp::Reverse;

use crate::inventory::RowRecord;
use crate::phonetic::initials_contain;
use crate::Pid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Substring of name, titles, or pinyin initials
    #[default]
    Fuzzy,
    /// Whole name or whole title summary
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub text: String,
    pub mode: SearchMode,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    /// Case-insensitive match. A blank query matches every row.
    pub fn matches(&self, row: &RowRecord) -> bool {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let name = row.name.to_lowercase();
        let titles = row.window_titles.to_lowercase();

        match self.mode {
            SearchMode::Exact => needle == name || needle == titles,
            SearchMode::Fuzzy => {
                name.contains(&needle)
                    || titles.contains(&needle)
                    || initials_contain(&row.name, &needle)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Pid,
    Name,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Column-header click: same key flips direction, a new key starts ascending.
    pub fn toggle_or_set(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.reversed();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Pid(Pid),
    Text(String),
}

fn sort_value(row: &RowRecord, key: SortKey) -> SortValue {
    match key {
        SortKey::Pid => SortValue::Pid(row.pid),
        SortKey::Name => SortValue::Text(row.name.to_lowercase()),
        SortKey::Title => SortValue::Text(row.window_titles.to_lowercase()),
    }
}

/// Stable sort: rows with equal keys keep their relative order in both directions.
pub fn sort_rows(rows: &mut [RowRecord], sort: SortState) {
    match sort.direction {
        SortDirection::Ascending => rows.sort_by_cached_key(|r| sort_value(r, sort.key)),
        SortDirection::Descending => rows.sort_by_cached_key(|r| Reverse(sort_value(r, sort.key))),
    }
}

/// Ordered rows plus a parallel mask of which rows pass the current query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    pub rows: Vec<RowRecord>,
    pub visible: Vec<bool>,
}

impl FilteredView {
    pub fn visible_rows(&self) -> impl Iterator<Item = &RowRecord> + '_ {
        self.rows
            .iter()
            .zip(&self.visible)
            .filter(|(_, visible)| **visible)
            .map(|(row, _)| row)
    }

    pub fn visible_pids(&self) -> Vec<Pid> {
        self.visible_rows().map(|r| r.pid).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Sort a copy of `rows` and mask the ones that fail `query`.
pub fn apply(rows: &[RowRecord], query: &SearchQuery, sort: SortState) -> FilteredView {
    let mut ordered = rows.to_vec();
    sort_rows(&mut ordered, sort);
    let visible = ordered.iter().map(|r| query.matches(r)).collect();
    FilteredView {
        rows: ordered,
        visible,
    }
}
