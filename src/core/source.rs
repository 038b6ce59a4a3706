use crate::config::criteria::SearchCriteria;
use crate::core::{Listing, ListingSource, SearchResults};
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;

/// Listing source backed by the realtor.ca property-search endpoint.
/// One form-encoded POST per `fetch`, criteria fixed at construction.
pub struct RealtorSource {
    client: Client,
    endpoint: String,
    criteria: SearchCriteria,
}

impl RealtorSource {
    pub fn new(endpoint: String, criteria: SearchCriteria) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            criteria,
        }
    }
}

#[async_trait]
impl ListingSource for RealtorSource {
    async fn fetch(&self) -> Result<Vec<Listing>> {
        tracing::debug!("Searching listings at: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&self.criteria)
            .send()
            .await?;

        tracing::debug!("Search response status: {}", response.status());
        if !response.status().is_success() {
            return Err(WatchError::FetchStatusError {
                status: response.status().as_u16(),
            });
        }

        let results: SearchResults = response.json().await?;
        Ok(results.results)
    }
}
