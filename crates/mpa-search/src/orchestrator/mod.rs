//! Drives one search through the model, manuals, part and suppliers stages.
//!
//! Each submit starts a new search id; a selection after the part stage
//! finished starts a new part generation. Every async result carries the
//! token it was started under and is applied only if that token is still
//! current, so late responses from a superseded search or part are dropped
//! instead of overwriting newer results. The state lock is never held across
//! an `.await`.

mod part;
mod suppliers;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mpa_client::{ApiClient, EnrichmentRequest, ManualSearchRequest};
use mpa_core::{
    EquipmentInfo, GenericAlternative, ManualEntry, PartRef, ResolvedPart, SearchQuery,
    SupplierListing,
};

use crate::generic::GenericService;
use crate::merge;
use crate::progress::{ProgressTracker, Stage, StageStatus};
use crate::render::{self, StatusKind};
use crate::view::{Region, SearchView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchToken {
    search_id: u64,
    part_generation: u64,
}

/// Which results a late callback is allowed to overwrite.
#[derive(Debug, Clone, Copy)]
enum Scope {
    /// Model and manuals: stale only once a new search starts.
    Search,
    /// Part and suppliers: also stale once another part is selected.
    Part,
}

#[derive(Debug, Default)]
struct SearchState {
    search_id: u64,
    part_generation: u64,
    query: Option<SearchQuery>,
    progress: ProgressTracker,
    equipment: Option<EquipmentInfo>,
    manuals: Vec<ManualEntry>,
    part: Option<ResolvedPart>,
    similar_parts: Vec<PartRef>,
    awaiting_selection: bool,
    suppliers: Vec<SupplierListing>,
    generic_alternatives: Vec<GenericAlternative>,
    /// Error shown in the status region once the search finishes.
    notice: Option<String>,
}

impl SearchState {
    fn token(&self) -> SearchToken {
        SearchToken {
            search_id: self.search_id,
            part_generation: self.part_generation,
        }
    }
}

/// A copy of everything the current search has produced so far.
#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub query: Option<SearchQuery>,
    pub progress: ProgressTracker,
    pub equipment: Option<EquipmentInfo>,
    pub manuals: Vec<ManualEntry>,
    pub part: Option<ResolvedPart>,
    pub similar_parts: Vec<PartRef>,
    /// The part stage is paused on a similar-parts selection.
    pub awaiting_selection: bool,
    pub suppliers: Vec<SupplierListing>,
    pub generic_alternatives: Vec<GenericAlternative>,
}

/// Advances `stage` and mirrors the change to the view. Returns whether the
/// transition was applied.
fn set_stage(
    state: &mut SearchState,
    view: &dyn SearchView,
    stage: Stage,
    status: StageStatus,
) -> bool {
    if !state.progress.advance(stage, status) {
        return false;
    }
    view.stage_changed(stage, status);
    view.render(Region::Progress, &render::progress(&state.progress));
    if state.progress.is_finished() {
        render_final_status(state, view);
    }
    true
}

fn render_final_status(state: &SearchState, view: &dyn SearchView) {
    let status_markup = match &state.notice {
        Some(notice) => render::status_message(StatusKind::Error, notice),
        None => render::status_message(StatusKind::Info, "Search complete."),
    };
    view.render(Region::Status, &status_markup);
}

pub struct SearchOrchestrator {
    client: ApiClient,
    generic: GenericService,
    view: Arc<dyn SearchView>,
    max_manuals: usize,
    state: Mutex<SearchState>,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(client: ApiClient, view: Arc<dyn SearchView>, max_manuals: usize) -> Self {
        Self {
            generic: GenericService::new(client.clone()),
            client,
            view,
            max_manuals,
            state: Mutex::new(SearchState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the state if `token` is still current for `scope`.
    fn apply<R>(
        &self,
        token: SearchToken,
        scope: Scope,
        f: impl FnOnce(&mut SearchState, &dyn SearchView) -> R,
    ) -> Option<R> {
        let mut state = self.lock();
        let current = state.search_id == token.search_id
            && (matches!(scope, Scope::Search) || state.part_generation == token.part_generation);
        if !current {
            tracing::debug!(
                search_id = token.search_id,
                part_generation = token.part_generation,
                ?scope,
                "dropping stale result"
            );
            return None;
        }
        Some(f(&mut state, self.view.as_ref()))
    }

    /// Runs a full search. Returns once every stage is finished or the part
    /// stage is waiting on [`Self::select_part`].
    ///
    /// A query with any blank field is ignored and returns `false`.
    pub async fn submit(&self, query: SearchQuery) -> bool {
        if !query.is_complete() {
            tracing::debug!("ignoring search submit with a blank field");
            return false;
        }

        let token = self.begin(&query);
        tracing::info!(
            search_id = token.search_id,
            make = %query.make,
            model = %query.model,
            part = %query.part_description,
            "search started"
        );

        tokio::join!(
            self.load_model(token, &query),
            self.load_manuals(token, &query),
            self.load_part(token, &query),
        );
        true
    }

    fn begin(&self, query: &SearchQuery) -> SearchToken {
        let mut state = self.lock();
        let search_id = state.search_id + 1;
        *state = SearchState {
            search_id,
            query: Some(query.clone()),
            ..SearchState::default()
        };

        let view = self.view.as_ref();
        view.search_started(query);
        view.render(
            Region::Status,
            &render::status_message(
                StatusKind::Info,
                &format!(
                    "Searching for \"{}\" on {} {}…",
                    query.part_description, query.make, query.model
                ),
            ),
        );
        view.render(Region::Equipment, &render::loading("equipment details"));
        view.render(Region::Manuals, &render::loading("manuals"));
        view.render(Region::Part, &render::loading("part details"));
        view.render(
            Region::Suppliers,
            &render::status_message(StatusKind::Info, "Suppliers load once the part is identified."),
        );
        view.render(Region::Generic, "");
        view.render(Region::Progress, &render::progress(&state.progress));

        for stage in [Stage::Model, Stage::Manuals, Stage::Part] {
            set_stage(&mut state, view, stage, StageStatus::Loading);
        }
        state.token()
    }

    async fn load_model(&self, token: SearchToken, query: &SearchQuery) {
        let response = self
            .client
            .enrich(&EnrichmentRequest {
                make: &query.make,
                model: &query.model,
                part_number: None,
            })
            .await;
        let info = merge::equipment(&response, &query.make, &query.model);

        self.apply(token, Scope::Search, |state, view| {
            view.render(Region::Equipment, &render::equipment(&info));
            state.equipment = Some(info);
            set_stage(state, view, Stage::Model, StageStatus::Completed);
        });
    }

    async fn load_manuals(&self, token: SearchToken, query: &SearchQuery) {
        let response = self
            .client
            .search_manuals(&ManualSearchRequest {
                make: &query.make,
                model: &query.model,
            })
            .await;
        let manuals = merge::manuals(&response, self.max_manuals);
        tracing::debug!(search_id = token.search_id, count = manuals.len(), "manuals loaded");

        self.apply(token, Scope::Search, |state, view| {
            view.render(Region::Manuals, &render::manuals(&manuals));
            state.manuals = manuals;
            set_stage(state, view, Stage::Manuals, StageStatus::Completed);
        });
    }

    /// Looks up aftermarket alternatives for the resolved part and validates
    /// each one's compatibility. Returns an empty list when no part has
    /// resolved yet.
    pub async fn load_generic_alternatives(&self) -> Vec<GenericAlternative> {
        let Some((token, query, part)) = self.begin_generic() else {
            tracing::debug!("no resolved part; skipping generic alternatives");
            return Vec::new();
        };

        let mut alternatives = self.generic.find(&query, &part).await;
        self.generic
            .refresh_compatibility(&query, &part, &mut alternatives)
            .await;

        self.apply(token, Scope::Part, |state, view| {
            view.render(Region::Generic, &render::generic_alternatives(&alternatives));
            state.generic_alternatives.clone_from(&alternatives);
        });
        alternatives
    }

    fn begin_generic(&self) -> Option<(SearchToken, SearchQuery, ResolvedPart)> {
        let state = self.lock();
        if state.progress.status(Stage::Part) != StageStatus::Completed {
            return None;
        }
        let query = state.query.clone()?;
        let part = state.part.clone()?;
        self.view
            .render(Region::Generic, &render::loading("generic alternatives"));
        Some((state.token(), query, part))
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        let state = self.lock();
        SearchSnapshot {
            query: state.query.clone(),
            progress: state.progress.clone(),
            equipment: state.equipment.clone(),
            manuals: state.manuals.clone(),
            part: state.part.clone(),
            similar_parts: state.similar_parts.clone(),
            awaiting_selection: state.awaiting_selection,
            suppliers: state.suppliers.clone(),
            generic_alternatives: state.generic_alternatives.clone(),
        }
    }
}
