use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use ruta_core::booking::{PassengerDetails, PaymentEntry};
use ruta_core::journey::SearchQuery;
use ruta_core::providers::{BookingProvider, SearchProvider};
use ruta_seating::seat_map::SeatMap;
use ruta_seating::ToggleOutcome;

use crate::flow::{BookingFlow, FlowError, FlowSnapshot};

/// Drives one [`BookingFlow`] per session against the search and
/// booking collaborators. Collaborator calls run outside the session
/// lock; their responses are applied through the flow's epoch check so
/// a session that moved on in the meantime ignores them.
pub struct BookingEngine {
    search: Arc<dyn SearchProvider>,
    booking: Arc<dyn BookingProvider>,
    max_seats_per_booking: usize,
    sessions: RwLock<HashMap<Uuid, BookingFlow>>,
}

impl BookingEngine {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        booking: Arc<dyn BookingProvider>,
        max_seats_per_booking: usize,
    ) -> Self {
        Self {
            search,
            booking,
            max_seats_per_booking,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a fresh session at the Search step
    pub async fn open_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, BookingFlow::new(self.max_seats_per_booking));
        debug!("Opened booking session {}", id);
        id
    }

    pub async fn snapshot(&self, session_id: Uuid) -> Result<FlowSnapshot, FlowError> {
        let sessions = self.sessions.read().await;
        let flow = sessions
            .get(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        Ok(flow.snapshot())
    }

    pub async fn seat_map(&self, session_id: Uuid) -> Result<SeatMap, FlowError> {
        let sessions = self.sessions.read().await;
        let flow = sessions
            .get(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        flow.seat_map()
    }

    /// Submit the search form. A collaborator failure degrades to an
    /// empty result set; the user is never blocked on a search error.
    pub async fn submit_search(
        &self,
        session_id: Uuid,
        query: SearchQuery,
    ) -> Result<FlowSnapshot, FlowError> {
        let token = {
            let mut sessions = self.sessions.write().await;
            let flow = sessions
                .get_mut(&session_id)
                .ok_or(FlowError::SessionNotFound(session_id))?;
            flow.begin_search(query.clone())?
        };

        let journeys = match self.search.search(&query).await {
            Ok(journeys) => journeys,
            Err(e) => {
                warn!("Search collaborator failed, degrading to empty results: {}", e);
                Vec::new()
            }
        };

        let mut sessions = self.sessions.write().await;
        let flow = sessions
            .get_mut(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        if !flow.apply_search_results(token, journeys) {
            debug!("Discarded stale search response for session {}", session_id);
        }
        Ok(flow.snapshot())
    }

    pub async fn select_journey(
        &self,
        session_id: Uuid,
        journey_id: Uuid,
    ) -> Result<FlowSnapshot, FlowError> {
        let mut sessions = self.sessions.write().await;
        let flow = sessions
            .get_mut(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        flow.select_journey(journey_id)?;
        Ok(flow.snapshot())
    }

    pub async fn toggle_seat(
        &self,
        session_id: Uuid,
        seat_id: &str,
    ) -> Result<(ToggleOutcome, FlowSnapshot), FlowError> {
        let mut sessions = self.sessions.write().await;
        let flow = sessions
            .get_mut(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        let outcome = flow.toggle_seat(seat_id)?;
        Ok((outcome, flow.snapshot()))
    }

    pub async fn continue_to_payment(&self, session_id: Uuid) -> Result<FlowSnapshot, FlowError> {
        let mut sessions = self.sessions.write().await;
        let flow = sessions
            .get_mut(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        flow.continue_to_payment()?;
        Ok(flow.snapshot())
    }

    /// Submit passenger and payment entry. A booking-creation failure
    /// leaves the session on Payment with a retryable `last_error`.
    pub async fn submit_payment(
        &self,
        session_id: Uuid,
        passenger: PassengerDetails,
        payment: PaymentEntry,
    ) -> Result<FlowSnapshot, FlowError> {
        let (token, request) = {
            let mut sessions = self.sessions.write().await;
            let flow = sessions
                .get_mut(&session_id)
                .ok_or(FlowError::SessionNotFound(session_id))?;
            flow.begin_booking(passenger, payment)?
        };

        let result = match self.booking.create_booking(&request).await {
            Ok(confirmation) => {
                info!("Booking confirmed: {}", confirmation.id);
                Ok(confirmation)
            }
            Err(e) => {
                warn!("Booking creation failed for session {}: {}", session_id, e);
                Err(e.to_string())
            }
        };

        let mut sessions = self.sessions.write().await;
        let flow = sessions
            .get_mut(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        if !flow.apply_booking_result(token, result) {
            debug!("Discarded stale booking response for session {}", session_id);
        }
        Ok(flow.snapshot())
    }

    pub async fn back(&self, session_id: Uuid) -> Result<FlowSnapshot, FlowError> {
        let mut sessions = self.sessions.write().await;
        let flow = sessions
            .get_mut(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        flow.back()?;
        Ok(flow.snapshot())
    }

    pub async fn restart(&self, session_id: Uuid) -> Result<FlowSnapshot, FlowError> {
        let mut sessions = self.sessions.write().await;
        let flow = sessions
            .get_mut(&session_id)
            .ok_or(FlowError::SessionNotFound(session_id))?;
        flow.restart()?;
        Ok(flow.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ruta_core::booking::{BookingConfirmation, BookingRequest};
    use ruta_core::journey::{Journey, JourneyStatus, RouteInfo, VehicleInfo};
    use crate::flow::BookingStep;

    struct FixedSearch {
        journeys: Vec<Journey>,
    }

    #[async_trait]
    impl SearchProvider for FixedSearch {
        async fn search(
            &self,
            _query: &SearchQuery,
        ) -> Result<Vec<Journey>, Box<dyn Error + Send + Sync>> {
            Ok(self.journeys.clone())
        }
    }

    struct BrokenSearch;

    #[async_trait]
    impl SearchProvider for BrokenSearch {
        async fn search(
            &self,
            _query: &SearchQuery,
        ) -> Result<Vec<Journey>, Box<dyn Error + Send + Sync>> {
            Err("upstream timed out".into())
        }
    }

    /// Fails the first `failures` create calls, then succeeds
    struct FlakyBooking {
        failures: AtomicUsize,
    }

    #[async_trait]
    impl BookingProvider for FlakyBooking {
        async fn create_booking(
            &self,
            request: &BookingRequest,
        ) -> Result<BookingConfirmation, Box<dyn Error + Send + Sync>> {
            if self.failures.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1)).is_ok() {
                return Err("booking service unavailable".into());
            }
            Ok(BookingConfirmation {
                id: Uuid::new_v4(),
                journey_id: request.journey_id,
                seat_ids: request.seat_ids.clone(),
                passenger: request.passenger.clone(),
                fare_amount: request.fare_amount,
                fare_currency: request.fare_currency.clone(),
                created_at: Utc::now(),
            })
        }
    }

    fn journey(capacity: u32) -> Journey {
        Journey {
            id: Uuid::new_v4(),
            vehicle: VehicleInfo {
                number: "NB-7788".to_string(),
                vehicle_type: "Semi-Luxury".to_string(),
                operator_name: "SLTB".to_string(),
                capacity,
                in_service: true,
            },
            route: RouteInfo {
                origin: "Colombo".to_string(),
                destination: "Kandy".to_string(),
                distance_km: 115,
                duration_minutes: 180,
            },
            departure_time: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            arrival_time: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            status: JourneyStatus::Active,
            fare_amount: 950,
            fare_currency: "LKR".to_string(),
            unavailable_seats: Vec::new(),
        }
    }

    fn query() -> SearchQuery {
        SearchQuery {
            origin: "Colombo".to_string(),
            destination: "Kandy".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    fn passenger() -> PassengerDetails {
        PassengerDetails {
            name: "N. Perera".to_string(),
            email: "n.perera@example.com".to_string(),
            phone: "0771234567".to_string(),
        }
    }

    fn payment() -> PaymentEntry {
        PaymentEntry {
            card_holder: "N PERERA".to_string(),
            card_number: "4242424242424242".to_string(),
            expiry: "12/27".to_string(),
        }
    }

    fn engine(search: Arc<dyn SearchProvider>, failures: usize) -> BookingEngine {
        BookingEngine::new(
            search,
            Arc::new(FlakyBooking {
                failures: AtomicUsize::new(failures),
            }),
            4,
        )
    }

    #[tokio::test]
    async fn test_end_to_end_booking() {
        let j = journey(40);
        let journey_id = j.id;
        let engine = engine(Arc::new(FixedSearch { journeys: vec![j] }), 0);

        let session = engine.open_session().await;
        let snap = engine.submit_search(session, query()).await.unwrap();
        assert_eq!(snap.step, BookingStep::Results);
        assert_eq!(snap.results.len(), 1);

        engine.select_journey(session, journey_id).await.unwrap();
        assert_eq!(engine.seat_map(session).await.unwrap().total_seats, 40);

        let (outcome, _) = engine.toggle_seat(session, "S5").await.unwrap();
        assert_eq!(outcome, ToggleOutcome::Added);
        engine.continue_to_payment(session).await.unwrap();

        let snap = engine
            .submit_payment(session, passenger(), payment())
            .await
            .unwrap();
        assert_eq!(snap.step, BookingStep::Confirmation);
        let confirmation = snap.confirmation.unwrap();
        assert_eq!(confirmation.seat_ids, vec!["S5"]);
        assert_eq!(confirmation.fare_amount, 950);

        let snap = engine.restart(session).await.unwrap();
        assert_eq!(snap.step, BookingStep::Search);
    }

    #[tokio::test]
    async fn test_broken_search_yields_empty_results() {
        let engine = engine(Arc::new(BrokenSearch), 0);
        let session = engine.open_session().await;

        let snap = engine.submit_search(session, query()).await.unwrap();
        assert_eq!(snap.step, BookingStep::Results);
        assert!(snap.results.is_empty());
        assert!(snap.last_error.is_none());
    }

    #[tokio::test]
    async fn test_booking_failure_is_retryable() {
        let j = journey(40);
        let journey_id = j.id;
        let engine = engine(Arc::new(FixedSearch { journeys: vec![j] }), 1);

        let session = engine.open_session().await;
        engine.submit_search(session, query()).await.unwrap();
        engine.select_journey(session, journey_id).await.unwrap();
        engine.toggle_seat(session, "S1").await.unwrap();
        engine.continue_to_payment(session).await.unwrap();

        let snap = engine
            .submit_payment(session, passenger(), payment())
            .await
            .unwrap();
        assert_eq!(snap.step, BookingStep::Payment);
        assert_eq!(snap.last_error.as_deref(), Some("booking service unavailable"));
        assert_eq!(snap.selected_seats, vec!["S1"]);

        let snap = engine
            .submit_payment(session, passenger(), payment())
            .await
            .unwrap();
        assert_eq!(snap.step, BookingStep::Confirmation);
        assert!(snap.last_error.is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_is_an_error() {
        let engine = engine(Arc::new(BrokenSearch), 0);
        let result = engine.snapshot(Uuid::new_v4()).await;
        assert!(matches!(result, Err(FlowError::SessionNotFound(_))));
    }
}
