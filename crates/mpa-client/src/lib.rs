//! Typed HTTP client for the Manual Purchase Agent REST API.
//!
//! Every call returns a [`NormalizedResponse`] instead of a `Result`:
//! transport failures and API-level `error` payloads both surface as
//! `success == false`, so callers degrade their own UI state without
//! handling transport errors separately.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod response;

pub use client::ApiClient;
pub use endpoints::{
    CompatibilityRequest, EnrichmentRequest, GenericSearchRequest, ManualSearchRequest,
    PartResolveRequest, PurchaseOptions, PurchaseRequest, RecordingCloneRequest,
    SimilarPartsRequest, SupplierSearchRequest,
};
pub use error::ClientError;
pub use response::NormalizedResponse;
