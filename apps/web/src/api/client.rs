//! HTTP API Client

use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use crate::model::{DriverSnapshot, GeneratedLink};

/// API client for backend communication
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a client against the page's own origin
    pub fn new() -> Self {
        let base_url = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| "http://localhost:8080".to_string());

        Self { base_url }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);

        let response = Request::get(&url).send().await.map_err(|e| e.to_string())?;
        if !response.ok() {
            return Err(format!("HTTP {}", response.status()));
        }

        response.json::<T>().await.map_err(|e| e.to_string())
    }

    pub async fn all_drivers(&self) -> Result<Vec<DriverSnapshot>, String> {
        self.get("/api/all-drivers").await
    }

    pub async fn generate_link(&self) -> Result<GeneratedLink, String> {
        self.get("/generate-link").await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
