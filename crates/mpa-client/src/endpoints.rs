//! Typed request bodies and one method per API endpoint.
//!
//! Responses stay as [`NormalizedResponse`]; decoding into domain types is the
//! caller's concern so a shape mismatch can degrade one UI stage at a time.

use serde::Serialize;

use crate::client::ApiClient;
use crate::response::NormalizedResponse;

#[derive(Debug, Clone, Serialize)]
pub struct ManualSearchRequest<'a> {
    pub make: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartResolveRequest<'a> {
    pub description: &'a str,
    pub make: &'a str,
    pub model: &'a str,
    pub use_database: bool,
    pub use_manual_search: bool,
    pub use_web_search: bool,
    pub save_results: bool,
}

impl<'a> PartResolveRequest<'a> {
    /// A resolution request with every lookup strategy enabled.
    #[must_use]
    pub fn full(description: &'a str, make: &'a str, model: &'a str) -> Self {
        Self {
            description,
            make,
            model,
            use_database: true,
            use_manual_search: true,
            use_web_search: true,
            save_results: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarPartsRequest<'a> {
    pub description: &'a str,
    pub make: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentRequest<'a> {
    pub make: &'a str,
    pub model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_number: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierSearchRequest<'a> {
    pub part_number: &'a str,
    pub make: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenericSearchRequest<'a> {
    pub oem_part_number: &'a str,
    pub description: &'a str,
    pub make: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompatibilityRequest<'a> {
    pub oem_part_number: &'a str,
    pub generic_part_number: &'a str,
    pub make: &'a str,
    pub model: &'a str,
}

/// Automation knobs forwarded verbatim to the purchase service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseOptions {
    pub speed_ms: u64,
    pub headless: bool,
    pub max_attempts: u32,
    pub capture_screenshots: bool,
    pub timeout_ms: u64,
    /// `true` unless real purchases were explicitly enabled.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRequest<'a> {
    pub part_number: &'a str,
    pub supplier_url: &'a str,
    pub supplier_name: &'a str,
    pub quantity: u32,
    pub billing_profile_id: i64,
    pub options: &'a PurchaseOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordingCloneRequest<'a> {
    /// Domain whose recording is replayed.
    pub recording: &'a str,
    pub url: &'a str,
    pub part_number: &'a str,
    pub quantity: u32,
    pub billing_profile_id: i64,
    pub options: &'a PurchaseOptions,
}

impl ApiClient {
    pub async fn search_manuals(&self, req: &ManualSearchRequest<'_>) -> NormalizedResponse {
        self.post("/api/manuals/search", req).await
    }

    pub async fn resolve_part(&self, req: &PartResolveRequest<'_>) -> NormalizedResponse {
        self.post("/api/parts/resolve", req).await
    }

    pub async fn find_similar_parts(&self, req: &SimilarPartsRequest<'_>) -> NormalizedResponse {
        self.post("/api/parts/find-similar", req).await
    }

    /// Images, videos and articles for a model, or for one part when
    /// `part_number` is set.
    pub async fn enrich(&self, req: &EnrichmentRequest<'_>) -> NormalizedResponse {
        self.post("/api/enrichment", req).await
    }

    pub async fn search_suppliers(&self, req: &SupplierSearchRequest<'_>) -> NormalizedResponse {
        self.post("/api/suppliers/search", req).await
    }

    pub async fn find_generic_alternatives(
        &self,
        req: &GenericSearchRequest<'_>,
    ) -> NormalizedResponse {
        self.post("/api/parts/find-generic", req).await
    }

    pub async fn validate_compatibility(
        &self,
        req: &CompatibilityRequest<'_>,
    ) -> NormalizedResponse {
        self.post("/api/parts/validate-compatibility", req).await
    }

    /// Lists billing profiles. Card and CVV fields are only returned when
    /// `include_sensitive` is set.
    pub async fn list_profiles(&self, include_sensitive: bool) -> NormalizedResponse {
        if include_sensitive {
            self.get("/api/profiles?include_sensitive=true").await
        } else {
            self.get("/api/profiles").await
        }
    }

    pub async fn get_profile(&self, id: i64) -> NormalizedResponse {
        self.get(&format!("/api/profiles/{id}")).await
    }

    pub async fn create_profile<P: Serialize + ?Sized>(&self, profile: &P) -> NormalizedResponse {
        self.post("/api/profiles", profile).await
    }

    pub async fn update_profile<P: Serialize + ?Sized>(
        &self,
        id: i64,
        profile: &P,
    ) -> NormalizedResponse {
        self.put(&format!("/api/profiles/{id}"), profile).await
    }

    pub async fn delete_profile(&self, id: i64) -> NormalizedResponse {
        self.delete(&format!("/api/profiles/{id}")).await
    }

    pub async fn create_purchase(&self, req: &PurchaseRequest<'_>) -> NormalizedResponse {
        self.post("/api/purchases", req).await
    }

    pub async fn clone_recording(&self, req: &RecordingCloneRequest<'_>) -> NormalizedResponse {
        self.post("/api/recordings/clone", req).await
    }

    pub async fn available_recordings(&self) -> NormalizedResponse {
        self.get("/api/recordings/available").await
    }
}
