//! Aftermarket alternatives for a resolved OEM part.

use futures::stream::{self, StreamExt};
use mpa_client::{ApiClient, CompatibilityRequest, GenericSearchRequest};
use mpa_core::{GenericAlternative, ResolvedPart, SearchQuery};

use crate::merge;

/// Compatibility checks in flight at once.
const COMPATIBILITY_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct GenericService {
    client: ApiClient,
}

impl GenericService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Generic alternatives for `part`. A failed lookup yields an empty list.
    pub async fn find(&self, query: &SearchQuery, part: &ResolvedPart) -> Vec<GenericAlternative> {
        let response = self
            .client
            .find_generic_alternatives(&GenericSearchRequest {
                oem_part_number: &part.oem_part_number,
                description: &part.description,
                make: &query.make,
                model: &query.model,
            })
            .await;
        let alternatives = merge::generic_alternatives(&response);
        tracing::info!(
            oem_part_number = %part.oem_part_number,
            count = alternatives.len(),
            "generic alternatives loaded"
        );
        alternatives
    }

    /// Replaces each alternative's confidence (and compatibility verdict)
    /// with the validated one. Alternatives whose check fails keep their
    /// original values.
    pub async fn refresh_compatibility(
        &self,
        query: &SearchQuery,
        part: &ResolvedPart,
        alternatives: &mut [GenericAlternative],
    ) {
        let verdicts = stream::iter(alternatives.iter().map(|alt| {
            let client = &self.client;
            let generic_part_number = alt.part_number.as_str();
            async move {
                let response = client
                    .validate_compatibility(&CompatibilityRequest {
                        oem_part_number: &part.oem_part_number,
                        generic_part_number,
                        make: &query.make,
                        model: &query.model,
                    })
                    .await;
                merge::compatibility(&response)
            }
        }))
        .buffered(COMPATIBILITY_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;

        for (alt, verdict) in alternatives.iter_mut().zip(verdicts) {
            match verdict {
                Some((compatible, confidence)) => {
                    alt.confidence = confidence;
                    alt.compatible = compatible.or(alt.compatible);
                }
                None => {
                    tracing::warn!(
                        generic_part_number = %alt.part_number,
                        "compatibility check failed; keeping original confidence"
                    );
                }
            }
        }
    }
}
