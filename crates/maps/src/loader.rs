use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::{Error, Result};

pub const LOAD_TIMEOUT: Duration = Duration::from_secs(8);

pub const SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";

/// Fetches the maps script once.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    async fn fetch(&self) -> Result<()>;
}

/// Downloads the script from the maps CDN.
#[derive(Debug, Clone)]
pub struct HttpScriptSource {
    http: reqwest::Client,
    url: String,
}

impl HttpScriptSource {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(SCRIPT_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: format!(
                "{base_url}?key={}&libraries=places",
                urlencoding::encode(api_key)
            ),
        }
    }
}

#[async_trait]
impl ScriptSource for HttpScriptSource {
    async fn fetch(&self) -> Result<()> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|err| Error::Load(err.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Load(format!("status {status}")));
        }

        Ok(())
    }
}

/// Loads the script at most once per loader.
///
/// Concurrent callers share the one in-flight load. A failed load leaves the
/// loader empty so the next call starts over.
pub struct ScriptLoader {
    source: Arc<dyn ScriptSource>,
    timeout: Duration,
    loaded: OnceCell<()>,
}

impl ScriptLoader {
    pub fn new(source: Arc<dyn ScriptSource>) -> Self {
        Self {
            source,
            timeout: LOAD_TIMEOUT,
            loaded: OnceCell::new(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    pub async fn load(&self) -> Result<()> {
        if self.is_loaded() {
            tracing::debug!("Maps script already loaded");
            return Ok(());
        }

        self.loaded
            .get_or_try_init(|| async {
                tracing::info!("Loading maps script");
                match tokio::time::timeout(self.timeout, self.source.fetch()).await {
                    Ok(Ok(())) => {
                        tracing::info!("Maps script loaded");
                        Ok(())
                    }
                    Ok(Err(err)) => {
                        tracing::error!(error = %err, "Failed to load maps script");
                        Err(err)
                    }
                    Err(_) => {
                        tracing::error!(timeout = ?self.timeout, "Maps script loading timed out");
                        Err(Error::Timeout(self.timeout))
                    }
                }
            })
            .await
            .copied()
    }
}

impl std::fmt::Debug for ScriptLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptLoader")
            .field("timeout", &self.timeout)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
