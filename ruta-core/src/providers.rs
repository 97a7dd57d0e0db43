use async_trait::async_trait;
use std::error::Error;

use crate::booking::{BookingConfirmation, BookingRequest};
use crate::journey::{Journey, SearchQuery};

/// Resolves a search query into candidate journeys.
///
/// Implementations report transport or upstream failures as `Err`; the
/// workflow engine degrades those to an empty result set so a broken
/// search service never blocks the user.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Journey>, Box<dyn Error + Send + Sync>>;
}

/// Persists a finished booking and returns the confirmation record.
///
/// This is the authoritative seat-availability check: the client-side
/// selection is advisory only. Implementations must be retry-safe so a
/// resubmission after a surfaced error does not double-book.
#[async_trait]
pub trait BookingProvider: Send + Sync {
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, Box<dyn Error + Send + Sync>>;
}
