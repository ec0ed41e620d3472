//! Supplier icon selection: remote favicon providers first, then a brand
//! icon matched by keyword, then a generic store icon.

use std::collections::HashMap;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use reqwest::Url;

use crate::error::SearchError;

const DOMAIN_SLOT: &str = "{domain}";

/// Favicon probes in flight at once when resolving a whole supplier list.
const PROBE_CONCURRENCY: usize = 4;

/// Favicon URL templates tried in order; `{domain}` is substituted.
pub const FAVICON_PROVIDERS: [&str; 4] = [
    "https://www.google.com/s2/favicons?domain={domain}&sz=64",
    "https://api.faviconkit.com/{domain}/64",
    "https://icons.duckduckgo.com/ip3/{domain}.ico",
    "https://{domain}/favicon.ico",
];

/// Domain keywords with a dedicated brand icon.
const BRAND_KEYWORDS: [&str; 10] = [
    "amazon",
    "ebay",
    "grainger",
    "homedepot",
    "lowes",
    "walmart",
    "zoro",
    "partstown",
    "repairclinic",
    "supplyhouse",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupplierIcon {
    Favicon(String),
    Brand(&'static str),
    Generic,
}

impl SupplierIcon {
    /// Token used in `data-fallbacks` and by the renderer.
    #[must_use]
    pub fn token(&self) -> String {
        match self {
            SupplierIcon::Favicon(url) => url.clone(),
            SupplierIcon::Brand(brand) => format!("brand:{brand}"),
            SupplierIcon::Generic => "generic".to_string(),
        }
    }
}

/// `domain` as a bare host, or `None` if it carries anything else (path,
/// query, credentials, port).
fn bare_host(domain: &str) -> Option<String> {
    let url = Url::parse(&format!("https://{}/", domain.trim())).ok()?;
    let bare = url.path() == "/"
        && url.query().is_none()
        && url.fragment().is_none()
        && url.username().is_empty()
        && url.password().is_none()
        && url.port().is_none();
    if !bare {
        return None;
    }
    url.host_str().map(str::to_string)
}

/// Builds a provider URL for `domain`. The host goes into the path or
/// authority only after validation; query values are re-encoded pair by pair.
fn fill(template: &str, domain: &str) -> Option<String> {
    let host = bare_host(domain)?;
    let (base, query) = match template.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (template, None),
    };
    let mut url = Url::parse(&base.replace(DOMAIN_SLOT, &host)).ok()?;
    if let Some(query) = query {
        let pairs: Vec<(String, String)> = Url::parse(&format!("http://provider.invalid/?{query}"))
            .ok()?
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.replace(DOMAIN_SLOT, &host)))
            .collect();
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Some(url.into())
}

/// Brand keyword contained in `domain`, if any.
#[must_use]
pub fn brand_for(domain: &str) -> Option<&'static str> {
    let compact: String = domain
        .to_ascii_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    BRAND_KEYWORDS.into_iter().find(|k| compact.contains(k))
}

/// The full, finite fallback chain for `domain`, in display order.
#[must_use]
pub fn candidates(domain: &str) -> Vec<SupplierIcon> {
    let mut chain: Vec<SupplierIcon> = if domain.is_empty() {
        Vec::new()
    } else {
        FAVICON_PROVIDERS
            .iter()
            .filter_map(|t| fill(t, domain))
            .map(SupplierIcon::Favicon)
            .collect()
    };
    if let Some(brand) = brand_for(domain) {
        chain.push(SupplierIcon::Brand(brand));
    }
    chain.push(SupplierIcon::Generic);
    chain
}

/// Probes favicon providers over HTTP and settles on the first that answers.
#[derive(Debug, Clone)]
pub struct IconResolver {
    client: reqwest::Client,
    providers: Vec<String>,
}

impl IconResolver {
    /// Resolver over the default provider chain.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self::with_providers(
            client,
            FAVICON_PROVIDERS.iter().map(ToString::to_string).collect(),
        ))
    }

    #[must_use]
    pub fn with_providers(client: reqwest::Client, providers: Vec<String>) -> Self {
        Self { client, providers }
    }

    /// First provider returning a non-empty success response, else the brand
    /// icon, else the generic icon. Each provider is tried at most once.
    pub async fn resolve(&self, domain: &str) -> SupplierIcon {
        if !domain.is_empty() {
            for template in &self.providers {
                let Some(url) = fill(template, domain) else {
                    tracing::debug!(domain, "domain is not a bare host; skipping favicon providers");
                    break;
                };
                let Ok(response) = self.client.get(&url).send().await else {
                    tracing::debug!(%url, "favicon provider unreachable");
                    continue;
                };
                if !response.status().is_success() {
                    tracing::debug!(%url, status = %response.status(), "favicon provider declined");
                    continue;
                }
                let Ok(bytes) = response.bytes().await else {
                    continue;
                };
                if bytes.is_empty() {
                    continue;
                }
                return SupplierIcon::Favicon(url);
            }
        }
        brand_for(domain).map_or(SupplierIcon::Generic, SupplierIcon::Brand)
    }

    /// Resolves every distinct non-empty domain, a few probes at a time.
    pub async fn resolve_all<'a, I>(&self, domains: I) -> HashMap<String, SupplierIcon>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut distinct: Vec<&str> = domains.into_iter().filter(|d| !d.is_empty()).collect();
        distinct.sort_unstable();
        distinct.dedup();

        stream::iter(distinct)
            .map(|domain| async move { (domain.to_string(), self.resolve(domain).await) })
            .buffer_unordered(PROBE_CONCURRENCY)
            .collect()
            .await
    }
}
