//! The billing profile remembered for delegated purchases.
//!
//! Profiles live in the remote profile service; this keeps only the copy
//! most recently loaded or saved.

use std::sync::{Mutex, PoisonError};

use mpa_client::ApiClient;
use mpa_core::BillingProfile;
use serde::Deserialize;

use crate::error::SearchError;

/// `{"profiles": [...]}`; a bare JSON array arrives under `data`.
#[derive(Debug, Deserialize)]
struct ProfileList {
    #[serde(default, alias = "data")]
    profiles: Vec<BillingProfile>,
}

/// `{"profile": {...}}` as returned by create and update.
#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    #[serde(alias = "data")]
    profile: BillingProfile,
}

pub struct ProfileStore {
    client: ApiClient,
    current: Mutex<Option<BillingProfile>>,
}

impl ProfileStore {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current: Mutex::new(None),
        }
    }

    /// The cached profile, if one was loaded or saved.
    #[must_use]
    pub fn current(&self) -> Option<BillingProfile> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, profile: Option<BillingProfile>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = profile;
    }

    /// Loads the first stored profile, card details included. No profile
    /// leaves the cache empty; nothing is fabricated.
    pub async fn load_default(&self) -> Option<BillingProfile> {
        let response = self.client.list_profiles(true).await;
        if !response.success {
            tracing::warn!(
                status = response.status,
                error = response.error.as_deref().unwrap_or(""),
                "could not load billing profiles"
            );
            self.replace(None);
            return None;
        }

        let profiles = match response.decode::<ProfileList>("billing profiles") {
            Ok(list) => list.profiles,
            Err(e) => {
                tracing::warn!(error = %e, "unexpected billing profile payload");
                Vec::new()
            }
        };

        let first = profiles.into_iter().next();
        match &first {
            Some(profile) => tracing::info!(profile_id = ?profile.id, "billing profile loaded"),
            None => tracing::warn!("no billing profile saved; purchases are unavailable"),
        }
        self.replace(first.clone());
        first
    }

    /// Creates `profile` (no `id`) or updates it (with `id`), then caches the
    /// stored copy.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Api`] if the profile service rejects the save.
    pub async fn save(&self, profile: &BillingProfile) -> Result<BillingProfile, SearchError> {
        let response = match profile.id {
            Some(id) => self.client.update_profile(id, profile).await,
            None => self.client.create_profile(profile).await,
        };
        if !response.success {
            return Err(SearchError::api("save billing profile", &response));
        }

        let saved = match response.decode::<ProfileEnvelope>("saved billing profile") {
            Ok(envelope) if envelope.profile.id.is_some() => envelope.profile,
            _ => {
                // Only `{id}` or a bare acknowledgement came back.
                let mut saved = profile.clone();
                if saved.id.is_none() {
                    saved.id = response.get("id").and_then(serde_json::Value::as_i64);
                }
                saved
            }
        };
        tracing::info!(profile_id = ?saved.id, "billing profile saved");
        self.replace(Some(saved.clone()));
        Ok(saved)
    }

    /// Deletes the profile with `id` and forgets it if it was cached.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Api`] if the profile service rejects the delete.
    pub async fn delete(&self, id: i64) -> Result<(), SearchError> {
        let response = self.client.delete_profile(id).await;
        if !response.success {
            return Err(SearchError::api("delete billing profile", &response));
        }
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().and_then(|p| p.id) == Some(id) {
            *current = None;
        }
        tracing::info!(profile_id = id, "billing profile deleted");
        Ok(())
    }
}
