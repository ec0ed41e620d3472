//! Four-stage progress tracking for one search.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Model,
    Manuals,
    Part,
    Suppliers,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Model, Stage::Manuals, Stage::Part, Stage::Suppliers];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Model => "model",
            Stage::Manuals => "manuals",
            Stage::Part => "part",
            Stage::Suppliers => "suppliers",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stage::Model => "Equipment",
            Stage::Manuals => "Manuals",
            Stage::Part => "Part",
            Stage::Suppliers => "Suppliers",
        }
    }

    fn index(self) -> usize {
        match self {
            Stage::Model => 0,
            Stage::Manuals => 1,
            Stage::Part => 2,
            Stage::Suppliers => 3,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Loading,
    Completed,
    Error,
}

impl StageStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Pending => "pending",
            StageStatus::Loading => "loading",
            StageStatus::Completed => "completed",
            StageStatus::Error => "error",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Error)
    }

    fn rank(self) -> u8 {
        match self {
            StageStatus::Pending => 0,
            StageStatus::Loading => 1,
            StageStatus::Completed | StageStatus::Error => 2,
        }
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-stage status with forward-only transitions.
///
/// A stage moves `pending → loading → completed|error` (steps may be skipped,
/// never repeated or reversed). `suppliers` cannot start loading before `part`
/// has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    statuses: [StageStatus; 4],
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self {
            statuses: [StageStatus::Pending; 4],
        }
    }
}

impl ProgressTracker {
    #[must_use]
    pub fn status(&self, stage: Stage) -> StageStatus {
        self.statuses[stage.index()]
    }

    /// Moves `stage` to `next` if that is a forward transition. Returns
    /// whether the tracker changed.
    pub fn advance(&mut self, stage: Stage, next: StageStatus) -> bool {
        let current = self.status(stage);
        if next.rank() <= current.rank() {
            tracing::debug!(%stage, %current, %next, "ignoring non-forward stage transition");
            return false;
        }
        if stage == Stage::Suppliers
            && next == StageStatus::Loading
            && self.status(Stage::Part) != StageStatus::Completed
        {
            tracing::debug!("suppliers cannot load before the part stage completes");
            return false;
        }
        self.statuses[stage.index()] = next;
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, StageStatus)> + '_ {
        Stage::ALL.iter().map(|s| (*s, self.status(*s)))
    }

    /// `true` once every stage is completed or errored.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.statuses.iter().all(|s| s.is_terminal())
    }
}
