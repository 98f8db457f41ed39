use log::info;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ImageSearchConfig;
use crate::error::{PlannerError, Result};

const SERVICE: &str = "image search";

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

/// Photo search against an Unsplash-compatible `/search/photos` endpoint.
pub struct ImageService {
    http_client: Client,
    config: ImageSearchConfig,
}

impl ImageService {
    pub fn new(config: ImageSearchConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlannerError::Config(format!("failed to build image client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.access_key.is_some()
    }

    /// Up to `count` image URLs for `query`. A missing access key is a
    /// configuration error.
    pub async fn search(&self, query: &str, count: u32) -> Result<Vec<String>> {
        let access_key = self.config.access_key.as_deref().ok_or_else(|| {
            PlannerError::Config("IMAGE_SEARCH_ACCESS_KEY not set".to_string())
        })?;
        let url = format!("{}/search/photos", self.config.base_url);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Client-ID {}", access_key))
            .query(&[("query", query.to_string()), ("per_page", count.to_string())])
            .send()
            .await
            .map_err(|e| PlannerError::from_reqwest(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::from_status(SERVICE, status, &body));
        }

        let body: PhotoSearchResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::from_reqwest(SERVICE, e))?;

        let urls = photo_urls(body, count);
        info!("Found {} image(s) for '{}'", urls.len(), query);
        Ok(urls)
    }
}

fn photo_urls(body: PhotoSearchResponse, count: u32) -> Vec<String> {
    body.results
        .into_iter()
        .filter_map(|photo| photo.urls.regular)
        .take(count as usize)
        .collect()
}
