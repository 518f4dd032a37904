//! HTTP client for fetching the full place list.
//!
//! The endpoint answers a GET with either a bare JSON array of places or an
//! object wrapping the array under `places`.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::error::{PlaceError, Result};
use super::models::Place;

#[derive(Deserialize)]
#[serde(untagged)]
enum PlacesBody {
    Bare(Vec<Place>),
    Wrapped { places: Vec<Place> },
}

impl From<PlacesBody> for Vec<Place> {
    fn from(body: PlacesBody) -> Self {
        match body {
            PlacesBody::Bare(places) | PlacesBody::Wrapped { places } => places,
        }
    }
}

/// Remote source of places
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    endpoint: String,
}

impl RemoteClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(RemoteClient {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Fetch every place from the endpoint
    pub async fn fetch_places(&self) -> Result<Vec<Place>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let places: Vec<Place> = serde_json::from_slice::<PlacesBody>(&body)?.into();
        debug!(count = places.len(), endpoint = %self.endpoint, "fetched places");
        Ok(places)
    }
}
