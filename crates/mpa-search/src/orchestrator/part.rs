use mpa_client::{EnrichmentRequest, PartResolveRequest, SimilarPartsRequest};
use mpa_core::{ResolvedPart, SearchQuery};

use super::{set_stage, Scope, SearchOrchestrator, SearchToken};
use crate::merge;
use crate::progress::{Stage, StageStatus};
use crate::render::{self, StatusKind};
use crate::view::Region;

impl SearchOrchestrator {
    /// Resolves the described part. Falls back to the similar-parts search
    /// when no OEM part number comes back.
    pub(super) async fn load_part(&self, token: SearchToken, query: &SearchQuery) {
        let response = self
            .client
            .resolve_part(&PartResolveRequest::full(
                &query.part_description,
                &query.make,
                &query.model,
            ))
            .await;

        if let Some(part) = merge::resolved_part(&response, &query.part_description) {
            tracing::info!(
                search_id = token.search_id,
                oem_part_number = %part.oem_part_number,
                verified = part.verified,
                "part resolved"
            );
            self.finish_part(token, query, part).await;
            return;
        }

        tracing::info!(
            search_id = token.search_id,
            "no OEM part number resolved; looking for similar parts"
        );
        let similar = self
            .client
            .find_similar_parts(&SimilarPartsRequest {
                description: &query.part_description,
                make: &query.make,
                model: &query.model,
            })
            .await;
        let candidates = merge::similar_parts(&similar);

        self.apply(token, Scope::Part, |state, view| {
            if candidates.is_empty() {
                let notice = format!(
                    "No part number could be identified for \"{}\". Try a more specific description.",
                    query.part_description
                );
                view.render(
                    Region::Part,
                    &render::status_message(StatusKind::Error, &notice),
                );
                view.render(Region::Suppliers, &render::suppliers(&[]));
                state.notice = Some(notice.clone());
                set_stage(state, view, Stage::Part, StageStatus::Completed);
                set_stage(state, view, Stage::Suppliers, StageStatus::Completed);
                view.render(
                    Region::Status,
                    &render::status_message(StatusKind::Error, &notice),
                );
            } else {
                view.render(Region::Part, &render::similar_parts(&candidates));
                view.render(
                    Region::Status,
                    &render::status_message(
                        StatusKind::Info,
                        "Select the matching part to look up suppliers.",
                    ),
                );
                state.similar_parts = candidates;
                state.awaiting_selection = true;
            }
        });
    }

    /// Continues the search with a part chosen from the similar-parts list
    /// or from the resolved part's alternates.
    ///
    /// Returns `false` when the number is not among the offered candidates,
    /// or when the part stage is still busy with an earlier lookup.
    pub async fn select_part(&self, part_number: &str) -> bool {
        let Some((token, query, part)) = self.begin_selection(part_number.trim()) else {
            return false;
        };
        tracing::info!(
            search_id = token.search_id,
            part_generation = token.part_generation,
            part_number = %part.oem_part_number,
            "part selected"
        );
        self.finish_part(token, &query, part).await;
        true
    }

    fn begin_selection(&self, number: &str) -> Option<(SearchToken, SearchQuery, ResolvedPart)> {
        let mut state = self.lock();
        let query = state.query.clone()?;
        let view = self.view.as_ref();

        if state.awaiting_selection {
            let Some(candidate) = state.similar_parts.iter().find(|p| p.part_number == number)
            else {
                tracing::warn!(part_number = number, "selection is not among the similar parts");
                return None;
            };
            let mut part = ResolvedPart::from_selection(candidate);
            part.similar_parts = state.similar_parts.clone();
            state.awaiting_selection = false;
            view.render(Region::Part, &render::loading("part details"));
            return Some((state.token(), query, part));
        }

        if state.progress.status(Stage::Part) != StageStatus::Completed {
            tracing::debug!(part_number = number, "part stage busy; ignoring selection");
            return None;
        }
        let Some(current) = state.part.as_ref() else {
            tracing::warn!(part_number = number, "no resolved part to choose an alternate for");
            return None;
        };
        let Some(candidate) = current.alternates.iter().find(|p| p.part_number == number) else {
            tracing::warn!(part_number = number, "selection is not among the alternates");
            return None;
        };

        let mut part = ResolvedPart::from_selection(candidate);
        part.alternates = merge::dedup_part_refs(
            std::iter::once(current.as_ref_with_kind("original"))
                .chain(current.alternates.iter().cloned())
                .filter(|p| p.part_number != part.oem_part_number),
        );
        part.similar_parts.clone_from(&current.similar_parts);

        // Anything still in flight for the previous part is now stale. The
        // stage trackers stay where they are; the regions show the new lookup.
        state.part_generation += 1;
        state.suppliers.clear();
        state.generic_alternatives.clear();
        state.notice = None;
        view.render(Region::Part, &render::loading("part details"));
        view.render(
            Region::Suppliers,
            &render::status_message(StatusKind::Info, "Suppliers load once the part is identified."),
        );
        view.render(Region::Generic, "");
        view.render(
            Region::Status,
            &render::status_message(
                StatusKind::Info,
                &format!("Looking up {}…", part.oem_part_number),
            ),
        );

        Some((state.token(), query, part))
    }

    /// Merges the per-part enrichment, completes the part stage and moves on
    /// to suppliers.
    async fn finish_part(&self, token: SearchToken, query: &SearchQuery, mut part: ResolvedPart) {
        let enrichment = self
            .client
            .enrich(&EnrichmentRequest {
                make: &query.make,
                model: &query.model,
                part_number: Some(&part.oem_part_number),
            })
            .await;
        merge::merge_part_enrichment(&mut part, &enrichment);

        let part_number = part.oem_part_number.clone();
        let applied = self.apply(token, Scope::Part, |state, view| {
            view.render(Region::Part, &render::resolved_part(&part));
            state.part = Some(part);
            set_stage(state, view, Stage::Part, StageStatus::Completed);
        });

        if applied.is_some() {
            self.load_suppliers(token, query, &part_number).await;
        }
    }
}
