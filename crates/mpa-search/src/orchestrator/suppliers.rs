use mpa_client::SupplierSearchRequest;
use mpa_core::SearchQuery;

use super::{render_final_status, set_stage, Scope, SearchOrchestrator, SearchToken};
use crate::merge;
use crate::progress::{Stage, StageStatus};
use crate::render;
use crate::view::Region;

impl SearchOrchestrator {
    /// One supplier search for `part_number`, joined with the recordings
    /// lookup that decides which listings are purchasable. Completes the
    /// suppliers stage whether or not the search succeeded.
    pub(super) async fn load_suppliers(
        &self,
        token: SearchToken,
        query: &SearchQuery,
        part_number: &str,
    ) {
        if part_number.trim().is_empty() {
            tracing::warn!(search_id = token.search_id, "refusing supplier search without a part number");
            return;
        }

        // After an alternate selection the stage is already past loading and
        // stays there; only the region shows the new lookup.
        let started = self.apply(token, Scope::Part, |state, view| {
            set_stage(state, view, Stage::Suppliers, StageStatus::Loading);
            view.render(Region::Suppliers, &render::loading("suppliers"));
        });
        if started.is_none() {
            return;
        }

        let request = SupplierSearchRequest {
            part_number,
            make: &query.make,
            model: &query.model,
        };
        let (response, recordings) = tokio::join!(
            self.client.search_suppliers(&request),
            self.client.available_recordings(),
        );

        if !response.success {
            tracing::warn!(
                search_id = token.search_id,
                part_number,
                status = response.status,
                error = response.error.as_deref().unwrap_or(""),
                "supplier search failed; showing an empty list"
            );
        }
        let domains = merge::recording_domains(&recordings);
        let listings = merge::suppliers(&response, &domains);
        tracing::info!(
            search_id = token.search_id,
            part_number,
            count = listings.len(),
            purchasable = listings.iter().filter(|l| l.purchasable).count(),
            "suppliers loaded"
        );

        self.apply(token, Scope::Part, |state, view| {
            view.render(Region::Suppliers, &render::suppliers(&listings));
            state.suppliers = listings;
            if !set_stage(state, view, Stage::Suppliers, StageStatus::Completed)
                && state.progress.is_finished()
            {
                render_final_status(state, view);
            }
        });
    }
}
