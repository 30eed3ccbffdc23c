//! Tool activity tracking for a single turn.
//!
//! A [`ToolPanel`] groups the backend's tool work (searches, lookups, playlist
//! edits) under one collapsible conversation entry. Activities are appended or
//! re-marked, never removed.

use serde::{Deserialize, Serialize};

/// Status of a tool activity, also used for the panel rollup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Active,
    Completed,
    Error,
}

impl ActivityStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ActivityStatus::Active)
    }
}

/// One line item under the tool panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolActivity {
    /// Opaque, unique within the panel
    pub id: String,
    pub label: String,
    pub status: ActivityStatus,
}

/// Aggregate of a turn's tool activities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolPanel {
    activities: Vec<ToolActivity>,
    expanded: bool,
}

impl Default for ToolPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolPanel {
    /// Create an empty, expanded panel.
    pub fn new() -> Self {
        Self {
            activities: Vec::new(),
            expanded: true,
        }
    }

    pub fn activities(&self) -> &[ToolActivity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Record a tool start.
    ///
    /// Appends a new active activity unless the most recent one carries the
    /// same label, in which case that one is re-marked active.
    pub fn start(&mut self, label: &str) -> &ToolActivity {
        let repeat = matches!(self.activities.last(), Some(last) if last.label == label);

        if repeat {
            if let Some(last) = self.activities.last_mut() {
                last.status = ActivityStatus::Active;
            }
        } else {
            let id = format!("activity-{}", self.activities.len() + 1);
            self.activities.push(ToolActivity {
                id,
                label: label.to_string(),
                status: ActivityStatus::Active,
            });
        }

        &self.activities[self.activities.len() - 1]
    }

    /// Complete the newest activity that is still active.
    ///
    /// Returns false when nothing was active.
    pub fn end_latest_active(&mut self) -> bool {
        match self
            .activities
            .iter_mut()
            .rev()
            .find(|a| a.status == ActivityStatus::Active)
        {
            Some(activity) => {
                activity.status = ActivityStatus::Completed;
                true
            }
            None => false,
        }
    }

    /// Force every still-active activity to completed.
    pub fn complete_all_active(&mut self) {
        for activity in &mut self.activities {
            if activity.status == ActivityStatus::Active {
                activity.status = ActivityStatus::Completed;
            }
        }
    }

    /// Mark the most recent activity as failed.
    pub fn mark_last_error(&mut self) {
        if let Some(last) = self.activities.last_mut() {
            last.status = ActivityStatus::Error;
        }
    }

    /// Rollup status: `Error` beats `Active`, which beats `Completed`.
    ///
    /// An empty panel rolls up to `Completed`.
    pub fn rollup(&self) -> ActivityStatus {
        let statuses = || self.activities.iter().map(|a| a.status);
        if statuses().any(|s| s == ActivityStatus::Error) {
            ActivityStatus::Error
        } else if statuses().any(|s| s == ActivityStatus::Active) {
            ActivityStatus::Active
        } else {
            ActivityStatus::Completed
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn collapse(&mut self) {
        self.expanded = false;
    }

    /// Flip the expanded flag. Allowed at any time, even while streaming.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }
}
