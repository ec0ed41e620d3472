//! Decoding of API payloads into domain types, and the merge rules between
//! the primary part resolution and its enrichment.
//!
//! Every decoder is lenient: a failed call or a payload of the wrong shape
//! yields an empty result (logged), never an error, so one bad response only
//! empties its own region.

use std::collections::HashSet;

use mpa_client::NormalizedResponse;
use mpa_core::{
    normalize_domain, EquipmentInfo, GenericAlternative, ManualEntry, PartRef, ResolvedPart,
    SupplierListing,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes a successful response, or `None` (logged) on failure or shape mismatch.
fn decode_ok<T: DeserializeOwned>(response: &NormalizedResponse, context: &str) -> Option<T> {
    if !response.success {
        tracing::debug!(
            context,
            status = response.status,
            error = response.error.as_deref().unwrap_or(""),
            "treating failed response as empty"
        );
        return None;
    }
    match response.decode::<T>(context) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "unexpected payload shape");
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Renders scalar JSON (string or number) as text; anything else is absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => non_blank(Some(s.clone())),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Field-level deserializers. A field of the wrong shape becomes absent
// instead of failing the whole payload.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// `null` or a non-array is an empty list; entries that fail to decode are skipped.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if decoded.len() < total {
        tracing::debug!(skipped = total - decoded.len(), "skipping malformed list entries");
    }
    Ok(decoded)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(Some(&value)))
}

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

/// A part candidate as the API sends it: a bare part number, or an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PartEntry {
    Number(String),
    Detailed {
        #[serde(
            default,
            alias = "oem_part_number",
            alias = "number",
            deserialize_with = "lenient_text"
        )]
        part_number: Option<String>,
        #[serde(rename = "type", default, deserialize_with = "lenient_text")]
        kind: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        description: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        image_url: Option<String>,
    },
}

impl PartEntry {
    fn into_part_ref(self, default_kind: &str) -> Option<PartRef> {
        let part = match self {
            PartEntry::Number(number) => PartRef::new(&number, default_kind),
            PartEntry::Detailed {
                part_number,
                kind,
                description,
                image_url,
            } => PartRef {
                part_number: non_blank(part_number).unwrap_or_default(),
                kind: non_blank(kind).unwrap_or_else(|| default_kind.to_string()),
                description: non_blank(description),
                image_url: non_blank(image_url),
            },
        };
        (!part.part_number.is_empty()).then_some(part)
    }
}

fn part_refs(entries: Vec<PartEntry>, default_kind: &str) -> Vec<PartRef> {
    entries
        .into_iter()
        .filter_map(|e| e.into_part_ref(default_kind))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct ResolvePayload {
    #[serde(default, deserialize_with = "lenient")]
    recommended_result: Option<RecommendedResult>,
    #[serde(default, deserialize_with = "lenient_list")]
    similar_parts: Vec<PartEntry>,
}

#[derive(Debug, Deserialize)]
struct RecommendedResult {
    #[serde(default, deserialize_with = "lenient_text")]
    oem_part_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    image_url: Option<String>,
    #[serde(default, alias = "alternates", deserialize_with = "lenient_list")]
    alternate_part_numbers: Vec<PartEntry>,
    #[serde(default, deserialize_with = "lenient")]
    validation: Option<Validation>,
}

#[derive(Debug, Deserialize)]
struct Validation {
    // Kept as raw JSON: only a literal `true` counts as verified.
    #[serde(default)]
    is_valid: Option<Value>,
}

/// Extracts the resolved part from a `/api/parts/resolve` response.
///
/// Returns `None` when the call failed or no OEM part number was found; the
/// caller then falls back to the similar-parts search.
#[must_use]
pub fn resolved_part(response: &NormalizedResponse, part_description: &str) -> Option<ResolvedPart> {
    let payload: ResolvePayload = decode_ok(response, "resolve part")?;
    let result = payload.recommended_result?;
    let oem_part_number = non_blank(result.oem_part_number)?;

    let verified = matches!(
        result.validation.and_then(|v| v.is_valid),
        Some(Value::Bool(true))
    );

    let alternates = dedup_part_refs(
        part_refs(result.alternate_part_numbers, "alternate")
            .into_iter()
            .filter(|p| p.part_number != oem_part_number),
    );

    Some(ResolvedPart {
        description: non_blank(result.description).unwrap_or_else(|| part_description.to_string()),
        image_url: non_blank(result.image_url),
        alternates,
        similar_parts: dedup_part_refs(part_refs(payload.similar_parts, "similar")),
        verified,
        oem_part_number,
    })
}

#[derive(Debug, Default, Deserialize)]
struct SimilarPayload {
    #[serde(default, alias = "results", deserialize_with = "lenient_list")]
    similar_parts: Vec<PartEntry>,
}

/// Candidates from `/api/parts/find-similar`, de-duplicated by part number.
#[must_use]
pub fn similar_parts(response: &NormalizedResponse) -> Vec<PartRef> {
    decode_ok::<SimilarPayload>(response, "find similar parts")
        .map(|p| dedup_part_refs(part_refs(p.similar_parts, "similar")))
        .unwrap_or_default()
}

/// Union of part refs keyed by `part_number`, keeping the first occurrence
/// and its position.
pub fn dedup_part_refs<I>(refs: I) -> Vec<PartRef>
where
    I: IntoIterator<Item = PartRef>,
{
    let mut seen: HashSet<String> = HashSet::new();
    refs.into_iter()
        .filter(|p| seen.insert(p.part_number.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct EnrichmentPayload {
    #[serde(default, deserialize_with = "lenient")]
    data: Option<EnrichmentData>,
}

#[derive(Debug, Default, Deserialize)]
struct EnrichmentData {
    #[serde(default, deserialize_with = "lenient_list")]
    images: Vec<MediaItem>,
    #[serde(default, deserialize_with = "lenient_list")]
    videos: Vec<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    articles: Vec<Value>,
    #[serde(
        default,
        alias = "alternate_part_numbers",
        deserialize_with = "lenient_list"
    )]
    alternate_parts: Vec<PartEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MediaItem {
    Url(String),
    Detailed {
        #[serde(alias = "link", alias = "image_url")]
        url: String,
    },
}

impl MediaItem {
    fn url(&self) -> &str {
        match self {
            MediaItem::Url(url) | MediaItem::Detailed { url } => url,
        }
    }
}

fn first_image(data: &EnrichmentData) -> Option<String> {
    data.images
        .iter()
        .map(|m| m.url().trim())
        .find(|u| !u.is_empty())
        .map(str::to_string)
}

/// Equipment info from a make/model enrichment. A failed call still yields
/// the bare make and model.
#[must_use]
pub fn equipment(response: &NormalizedResponse, make: &str, model: &str) -> EquipmentInfo {
    let Some(payload) = decode_ok::<EnrichmentPayload>(response, "model enrichment") else {
        return EquipmentInfo::bare(make, model);
    };
    let data = payload.data.unwrap_or_default();
    EquipmentInfo {
        make: make.to_string(),
        model: model.to_string(),
        image_url: first_image(&data),
        video_count: data.videos.len(),
        article_count: data.articles.len(),
    }
}

/// Merges a per-part enrichment into `part`: fills a missing image and
/// unions the alternates (primary first, then enrichment, no duplicates, never
/// the part itself).
pub fn merge_part_enrichment(part: &mut ResolvedPart, response: &NormalizedResponse) {
    let Some(payload) = decode_ok::<EnrichmentPayload>(response, "part enrichment") else {
        return;
    };
    let data = payload.data.unwrap_or_default();

    if part.image_url.is_none() {
        part.image_url = first_image(&data);
    }

    let extra = part_refs(data.alternate_parts, "alternate");
    let own_number = part.oem_part_number.clone();
    part.alternates = dedup_part_refs(
        std::mem::take(&mut part.alternates)
            .into_iter()
            .chain(extra)
            .filter(|p| p.part_number != own_number),
    );
}

// ---------------------------------------------------------------------------
// Manuals
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ManualsPayload {
    #[serde(default, alias = "manuals", deserialize_with = "lenient_list")]
    results: Vec<ManualItem>,
}

#[derive(Debug, Deserialize)]
struct ManualItem {
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, alias = "link", deserialize_with = "lenient_text")]
    url: Option<String>,
    #[serde(
        default,
        alias = "source_domain",
        alias = "displayLink",
        deserialize_with = "lenient_text"
    )]
    source: Option<String>,
}

/// Manuals from `/api/manuals/search`, entries without a URL dropped,
/// truncated to `max`.
#[must_use]
pub fn manuals(response: &NormalizedResponse, max: usize) -> Vec<ManualEntry> {
    decode_ok::<ManualsPayload>(response, "manuals search")
        .map(|p| {
            p.results
                .into_iter()
                .filter_map(|m| {
                    Some(ManualEntry {
                        url: non_blank(m.url)?,
                        title: non_blank(m.title),
                        source: non_blank(m.source),
                    })
                })
                .take(max)
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Suppliers and recordings
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct SuppliersPayload {
    #[serde(default, alias = "results", deserialize_with = "lenient_list")]
    suppliers: Vec<SupplierItem>,
}

#[derive(Debug, Deserialize)]
struct SupplierItem {
    #[serde(default, alias = "title", deserialize_with = "lenient_text")]
    name: Option<String>,
    #[serde(default, alias = "link", deserialize_with = "lenient_text")]
    url: Option<String>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text")]
    domain: Option<String>,
    #[serde(default)]
    ai_ranking: Option<Value>,
}

fn host_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(normalize_domain))
}

/// Supplier listings from `/api/suppliers/search`. Entries without a URL are
/// dropped; `domain` falls back to the URL host; `purchasable` is set when
/// the domain has a recording.
#[must_use]
pub fn suppliers(response: &NormalizedResponse, recordings: &HashSet<String>) -> Vec<SupplierListing> {
    decode_ok::<SuppliersPayload>(response, "supplier search")
        .map(|p| {
            p.suppliers
                .into_iter()
                .filter_map(|s| {
                    let url = non_blank(s.url)?;
                    let domain = non_blank(s.domain)
                        .map(|d| normalize_domain(&d))
                        .or_else(|| host_of(&url))
                        .unwrap_or_default();
                    let ai_ranking =
                        scalar_text(s.ai_ranking.as_ref()).and_then(|r| r.parse::<u32>().ok());
                    Some(SupplierListing {
                        name: non_blank(s.name).unwrap_or_else(|| domain.clone()),
                        price: scalar_text(s.price.as_ref()),
                        purchasable: !domain.is_empty() && recordings.contains(&domain),
                        url,
                        domain,
                        ai_ranking,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
struct RecordingsPayload {
    #[serde(default, alias = "data", deserialize_with = "lenient_list")]
    recordings: Vec<RecordingItem>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordingItem {
    Name(String),
    Detailed {
        #[serde(alias = "name", alias = "site")]
        domain: String,
    },
}

/// Normalized domains that have a purchase recording.
#[must_use]
pub fn recording_domains(response: &NormalizedResponse) -> HashSet<String> {
    decode_ok::<RecordingsPayload>(response, "available recordings")
        .map(|p| {
            p.recordings
                .into_iter()
                .map(|r| match r {
                    RecordingItem::Name(d) | RecordingItem::Detailed { domain: d } => {
                        normalize_domain(&d)
                    }
                })
                .filter(|d| !d.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Generic alternatives
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct GenericPayload {
    #[serde(default, alias = "alternatives", deserialize_with = "lenient_list")]
    generic_alternatives: Vec<GenericItem>,
}

#[derive(Debug, Deserialize)]
struct GenericItem {
    #[serde(
        default,
        alias = "generic_part_number",
        deserialize_with = "lenient_text"
    )]
    part_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    manufacturer: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    confidence: Option<f64>,
    #[serde(default)]
    price: Option<Value>,
}

/// Alternatives from `/api/parts/find-generic`, de-duplicated by part number.
#[must_use]
pub fn generic_alternatives(response: &NormalizedResponse) -> Vec<GenericAlternative> {
    let Some(payload) = decode_ok::<GenericPayload>(response, "find generic alternatives") else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    payload
        .generic_alternatives
        .into_iter()
        .filter_map(|g| {
            let part_number = non_blank(g.part_number)?;
            seen.insert(part_number.clone()).then(|| GenericAlternative {
                part_number,
                manufacturer: non_blank(g.manufacturer),
                description: non_blank(g.description),
                confidence: g.confidence.unwrap_or(0.0).clamp(0.0, 1.0),
                price: scalar_text(g.price.as_ref()),
                compatible: None,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct CompatibilityPayload {
    #[serde(default, deserialize_with = "lenient")]
    compatible: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    confidence: Option<f64>,
}

/// `(compatible, confidence)` from `/api/parts/validate-compatibility`, or
/// `None` when the call failed or said nothing useful.
#[must_use]
pub fn compatibility(response: &NormalizedResponse) -> Option<(Option<bool>, f64)> {
    let payload: CompatibilityPayload = decode_ok(response, "validate compatibility")?;
    let confidence = payload.confidence?.clamp(0.0, 1.0);
    Some((payload.compatible, confidence))
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
