//! The seam between the orchestrator and whatever displays its results.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Mutex, PoisonError};

use mpa_core::SearchQuery;

use crate::progress::{Stage, StageStatus};

/// A named display region. Each renderer owns exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Progress,
    Status,
    Equipment,
    Manuals,
    Part,
    Suppliers,
    Generic,
}

impl Region {
    pub const ALL: [Region; 7] = [
        Region::Progress,
        Region::Status,
        Region::Equipment,
        Region::Manuals,
        Region::Part,
        Region::Suppliers,
        Region::Generic,
    ];

    /// Element id of the region on the results page.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Region::Progress => "search-progress",
            Region::Status => "search-status",
            Region::Equipment => "equipment-info",
            Region::Manuals => "manuals-list",
            Region::Part => "part-details",
            Region::Suppliers => "suppliers-list",
            Region::Generic => "generic-alternatives",
        }
    }
}

/// Receives stage transitions and region markup from the orchestrator.
///
/// Calls arrive while the orchestrator holds its state lock; implementations
/// must not call back into the orchestrator.
pub trait SearchView: Send + Sync {
    /// A new search replaced whatever was shown before.
    fn search_started(&self, _query: &SearchQuery) {}

    fn stage_changed(&self, stage: Stage, status: StageStatus);

    /// Replaces the full contents of `region`.
    fn render(&self, region: Region, markup: &str);
}

#[derive(Default)]
struct MemoryViewState {
    regions: HashMap<Region, String>,
    history: Vec<(Stage, StageStatus)>,
}

/// Keeps the latest markup per region and the stage history of the current search.
#[derive(Default)]
pub struct MemoryView {
    state: Mutex<MemoryViewState>,
}

impl MemoryView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn region(&self, region: Region) -> Option<String> {
        self.lock().regions.get(&region).cloned()
    }

    /// Every transition since the current search started, in order.
    #[must_use]
    pub fn history(&self) -> Vec<(Stage, StageStatus)> {
        self.lock().history.clone()
    }

    /// The statuses `stage` went through since the current search started.
    #[must_use]
    pub fn stage_history(&self, stage: Stage) -> Vec<StageStatus> {
        self.lock()
            .history
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, status)| *status)
            .collect()
    }

    /// A standalone HTML page with every region in display order.
    #[must_use]
    pub fn page_html(&self) -> String {
        let state = self.lock();
        let mut page = String::from(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Manual Purchase Agent</title></head>\n<body>\n",
        );
        for region in Region::ALL {
            let markup = state.regions.get(&region).map_or("", String::as_str);
            let _ = writeln!(page, "<section id=\"{}\">{markup}</section>", region.id());
        }
        page.push_str("</body>\n</html>\n");
        page
    }
}

impl SearchView for MemoryView {
    fn search_started(&self, _query: &SearchQuery) {
        let mut state = self.lock();
        state.history.clear();
        state.regions.clear();
    }

    fn stage_changed(&self, stage: Stage, status: StageStatus) {
        self.lock().history.push((stage, status));
    }

    fn render(&self, region: Region, markup: &str) {
        self.lock().regions.insert(region, markup.to_string());
    }
}
