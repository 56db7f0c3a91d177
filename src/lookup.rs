//! Brand owner lookup.
//!
//! Resolves the company that owns a brand through
//! `GET {base}/getCompanyThatOwnsBrand/{brand}`. Lookups never fail from the
//! caller's point of view: transport errors, timeouts and malformed bodies
//! all come back as `None`. Every answer, including `None`, is cached per
//! trimmed brand for the lifetime of the lookup value, which is one page view.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::options::Options;

/// Owner record returned by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerLookupResult {
    pub brand_name: String,
    pub owning_company_name: Option<String>,
}

impl OwnerLookupResult {
    /// Validate a response body.
    ///
    /// `brand_name` must be a string and `owning_company_name` must be
    /// present as a string or `null`.
    pub fn from_json(body: &Value) -> Result<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| Error::InvalidResponse("body is not an object".to_string()))?;

        let brand_name = object
            .get("brand_name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidResponse("brand_name missing or not a string".to_string()))?;

        let owning_company_name = match object.get("owning_company_name") {
            Some(Value::String(name)) => Some(name.clone()),
            Some(Value::Null) => None,
            _ => {
                return Err(Error::InvalidResponse(
                    "owning_company_name missing or not a string/null".to_string(),
                ))
            }
        };

        Ok(Self {
            brand_name: brand_name.to_string(),
            owning_company_name,
        })
    }
}

/// Resolves brand owners.
#[async_trait]
pub trait OwnerLookup: Send + Sync {
    /// Owner of `brand`, or `None` when it cannot be determined.
    async fn lookup(&self, brand: &str) -> Option<OwnerLookupResult>;
}

/// Lookup that never answers, for offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

#[async_trait]
impl OwnerLookup for NoLookup {
    async fn lookup(&self, brand: &str) -> Option<OwnerLookupResult> {
        log::debug!("lookup: disabled, skipping {brand:?}");
        None
    }
}

/// HTTP implementation backed by `reqwest`, with a per-instance cache.
pub struct HttpOwnerLookup {
    client: reqwest::Client,
    base_url: Url,
    cache: Mutex<HashMap<String, Option<OwnerLookupResult>>>,
}

impl HttpOwnerLookup {
    /// Build a lookup for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("lookup base url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("lookup base url {base_url} cannot take a path")));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Build a lookup from tracker options.
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(&options.lookup_base_url, options.lookup_timeout)
    }

    /// Request URL for `brand`, with the brand encoded as one path segment.
    pub fn endpoint(&self, brand: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("lookup base url {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push("getCompanyThatOwnsBrand")
            .push(brand);
        Ok(url)
    }

    /// Drop all cached answers.
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
        log::debug!("lookup: cache cleared");
    }

    /// Number of cached brands.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn cached(&self, key: &str) -> Option<Option<OwnerLookupResult>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    async fn fetch(&self, brand: &str) -> Result<OwnerLookupResult> {
        let url = self.endpoint(brand)?;
        log::debug!("lookup: GET {url}");

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Lookup(format!("HTTP {status}")));
        }

        let text = response.text().await?;
        let body: Value =
            serde_json::from_str(&text).map_err(|e| Error::InvalidResponse(e.to_string()))?;
        OwnerLookupResult::from_json(&body)
    }
}

#[async_trait]
impl OwnerLookup for HttpOwnerLookup {
    async fn lookup(&self, brand: &str) -> Option<OwnerLookupResult> {
        let key = brand.trim();
        if key.is_empty() {
            log::warn!("lookup: refusing to look up an empty brand");
            return None;
        }

        if let Some(cached) = self.cached(key) {
            log::debug!("lookup: cache hit for {key:?}");
            return cached;
        }

        let result = match self.fetch(key).await {
            Ok(owner) => {
                log::info!("lookup: {key:?} owned by {:?}", owner.owning_company_name);
                Some(owner)
            }
            Err(Error::Timeout) => {
                log::warn!("lookup: request timed out for {key:?}");
                None
            }
            Err(err) => {
                log::warn!("lookup: failed for {key:?}: {err}");
                None
            }
        };

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), result.clone());
        result
    }
}
