use serde::{Deserialize, Serialize};

/// One text example with an optional sentiment label (`true` = positive).
///
/// Records are immutable once built; inference inputs carry no label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    text: String,
    label: Option<bool>,
}

impl Record {
    /// Build a training or evaluation record.
    pub fn labeled(text: impl Into<String>, label: bool) -> Self {
        Self {
            text: text.into(),
            label: Some(label),
        }
    }

    /// Build an inference-only record.
    pub fn unlabeled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> Option<bool> {
        self.label
    }
}
