use serde::{Deserialize, Serialize};

use super::PatternId;

const DEFAULT_LABELS: [&str; 4] = [
    "/^capnp/.*.capnp.go$/",
    "/^capnp/.*.capnp.map.go$/",
    "/^capnp/.*.handler.go$/",
    "/^common/testtransport//",
];

/// A stored regular expression with its selection flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    /// Usually wrapped in `/.../`; the delimiters are stripped before compiling.
    pub label: String,

    /// Included in bulk mark/unmark actions.
    #[serde(default, alias = "checked")]
    pub selected: bool,

    pub id: PatternId,
}

impl PatternRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            selected: false,
            id: PatternId::generate(),
        }
    }

    pub fn apply(&mut self, update: &PatternUpdate) {
        if let Some(label) = &update.label {
            self.label = label.clone();
        }
        if let Some(selected) = update.selected {
            self.selected = selected;
        }
    }
}

/// Fields to merge into an existing record; `None` leaves the field alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternUpdate {
    pub label: Option<String>,
    pub selected: Option<bool>,
}

impl PatternUpdate {
    pub fn selected(selected: bool) -> Self {
        Self {
            label: None,
            selected: Some(selected),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            selected: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.selected.is_none()
    }
}

/// Built-in examples, all unselected. Their ids are fixed so a default
/// listed by one process can be addressed by the next.
pub fn default_patterns() -> Vec<PatternRecord> {
    DEFAULT_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| PatternRecord {
            label: label.to_string(),
            selected: false,
            id: PatternId(format!("default-{}", i + 1)),
        })
        .collect()
}
