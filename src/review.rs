//! Page-facing side of the core: what the modal shows and which "viewed"
//! checkboxes a bulk action flips.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matcher::{Matcher, any_matches, compile_selected, count_pattern};
use crate::model::PatternRecord;

/// Paths of the changed files the page currently renders.
pub trait FilePathSource {
    fn current_file_paths(&self) -> Vec<String>;
}

/// Per-file "viewed" checkboxes.
pub trait ViewedToggles {
    /// `(path, viewed)` for every file with a checkbox, in page order.
    fn viewed_files(&self) -> Vec<(String, bool)>;
    fn toggle_viewed(&mut self, path: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkAction {
    MarkViewed,
    UnmarkViewed,
}

impl BulkAction {
    fn wants_toggle(self, viewed: bool) -> bool {
        match self {
            BulkAction::MarkViewed => !viewed,
            BulkAction::UnmarkViewed => viewed,
        }
    }
}

/// One modal row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    #[serde(flatten)]
    pub record: PatternRecord,
    pub matches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn summarize<P: AsRef<str>>(paths: &[P], patterns: &[PatternRecord]) -> Vec<PatternSummary> {
    patterns
        .iter()
        .map(|record| {
            let (matches, error) = match count_pattern(paths, record) {
                Ok(count) => (count, None),
                Err(err) => (0, Some(err.message)),
            };
            PatternSummary {
                record: record.clone(),
                matches,
                error,
            }
        })
        .collect()
}

/// Paths whose checkbox `action` should flip, in page order. A path listed
/// more than once is planned once, from its first entry.
pub fn plan_toggles(
    files: &[(String, bool)],
    matchers: &[Matcher],
    action: BulkAction,
) -> Vec<String> {
    let mut seen = HashSet::new();
    files
        .iter()
        .filter(|(path, _)| seen.insert(path.as_str()))
        .filter(|(path, viewed)| action.wants_toggle(*viewed) && any_matches(path, matchers))
        .map(|(path, _)| path.clone())
        .collect()
}

/// Flips the checkbox of every file matched by a selected pattern and
/// returns the toggled paths.
pub fn apply_bulk_action<T: ViewedToggles + ?Sized>(
    page: &mut T,
    patterns: &[PatternRecord],
    action: BulkAction,
) -> Vec<String> {
    let matchers = compile_selected(patterns);
    if matchers.is_empty() {
        return Vec::new();
    }
    let planned = plan_toggles(&page.viewed_files(), &matchers, action);
    for path in &planned {
        page.toggle_viewed(path);
    }
    debug!(?action, toggled = planned.len(), "applied bulk action");
    planned
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFile {
    pub path: String,
    #[serde(default)]
    pub viewed: bool,
}

/// A captured page: the changed files and their viewed state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSnapshot {
    pub files: Vec<PageFile>,
}

impl PageSnapshot {
    pub fn new(files: Vec<PageFile>) -> Self {
        Self { files }
    }

    pub fn is_viewed(&self, path: &str) -> Option<bool> {
        self.files.iter().find(|f| f.path == path).map(|f| f.viewed)
    }
}

impl FilePathSource for PageSnapshot {
    fn current_file_paths(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.files
            .iter()
            .filter(|f| seen.insert(f.path.as_str()))
            .map(|f| f.path.clone())
            .collect()
    }
}

impl ViewedToggles for PageSnapshot {
    fn viewed_files(&self) -> Vec<(String, bool)> {
        self.files.iter().map(|f| (f.path.clone(), f.viewed)).collect()
    }

    /// Every entry for `path` is the same checkbox, so all of them flip.
    fn toggle_viewed(&mut self, path: &str) {
        for file in self.files.iter_mut().filter(|f| f.path == path) {
            file.viewed = !file.viewed;
        }
    }
}

#[cfg(test)]
#[path = "tests/review/review_tests.rs"]
mod tests;
