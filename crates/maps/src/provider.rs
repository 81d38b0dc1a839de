use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::{Error, HttpScriptSource, Result, ScriptLoader};

pub const SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// What the office section renders: the address and, when a provider is
/// available, a link that opens it on a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapLink {
    pub address: String,
    pub url: Option<String>,
    pub provider: &'static str,
}

/// Map capability handed to the office section. The page never probes for a
/// global maps object; it asks whichever provider it was given.
#[async_trait]
pub trait MapProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn search_url(&self, address: &str) -> Option<String>;

    /// Makes the interactive map usable, loading its script if needed.
    async fn ensure_loaded(&self) -> Result<()>;

    fn link(&self, address: &str) -> MapLink {
        MapLink {
            address: address.to_owned(),
            url: self.search_url(address),
            provider: self.name(),
        }
    }
}

/// Stand-in when no map service is wired up: plain address, no link.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMapProvider;

#[async_trait]
impl MapProvider for NullMapProvider {
    fn name(&self) -> &'static str {
        "none"
    }

    fn search_url(&self, _address: &str) -> Option<String> {
        None
    }

    async fn ensure_loaded(&self) -> Result<()> {
        Err(Error::Unavailable)
    }
}

#[derive(Debug)]
pub struct GoogleMapsProvider {
    loader: Option<ScriptLoader>,
}

impl GoogleMapsProvider {
    /// Search links work without a key; the embedded map needs one.
    pub fn new(api_key: Option<&str>) -> Self {
        let loader = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| ScriptLoader::new(Arc::new(HttpScriptSource::new(key))));

        Self { loader }
    }

    pub fn with_loader(loader: ScriptLoader) -> Self {
        Self {
            loader: Some(loader),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loader.as_ref().is_some_and(ScriptLoader::is_loaded)
    }
}

#[async_trait]
impl MapProvider for GoogleMapsProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn search_url(&self, address: &str) -> Option<String> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }
        Some(format!(
            "{SEARCH_URL}?api=1&query={}",
            urlencoding::encode(address)
        ))
    }

    async fn ensure_loaded(&self) -> Result<()> {
        match &self.loader {
            Some(loader) => loader.load().await,
            None => {
                tracing::error!("Maps api key not found in configuration");
                Err(Error::MissingApiKey)
            }
        }
    }
}
