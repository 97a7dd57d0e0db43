use std::error::Error;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use ruta_core::booking::{BookingConfirmation, BookingRequest};
use ruta_core::journey::{Journey, SearchQuery};
use ruta_core::providers::{BookingProvider, SearchProvider};

use crate::ConnectError;

fn build_client(timeout: Duration) -> Result<reqwest::Client, ConnectError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

async fn fail_on_status(response: reqwest::Response) -> Result<reqwest::Response, ConnectError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ConnectError::UpstreamStatus {
        status: status.as_u16(),
        message,
    })
}

/// Search service client. Every request carries the configured
/// timeout; transport failures bubble up and the engine degrades them
/// to an empty result set.
pub struct RestSearchProvider {
    client: reqwest::Client,
    base_url: String,
}

impl RestSearchProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConnectError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl SearchProvider for RestSearchProvider {
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Journey>, Box<dyn Error + Send + Sync>> {
        let url = format!("{}/v1/journeys/search", self.base_url);
        debug!("Searching journeys via {}", url);
        let response = self.client.post(&url).json(query).send().await?;
        let response = fail_on_status(response).await?;
        Ok(response.json::<Vec<Journey>>().await?)
    }
}

/// Booking service client. A non-success status is surfaced as an
/// error so the workflow keeps the user on Payment for a retry; the
/// service itself is responsible for retry idempotency.
pub struct RestBookingProvider {
    client: reqwest::Client,
    base_url: String,
}

impl RestBookingProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConnectError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl BookingProvider for RestBookingProvider {
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, Box<dyn Error + Send + Sync>> {
        let url = format!("{}/v1/bookings", self.base_url);
        debug!("Creating booking via {}", url);
        let response = self.client.post(&url).json(request).send().await?;
        let response = fail_on_status(response).await?;
        Ok(response.json::<BookingConfirmation>().await?)
    }
}
