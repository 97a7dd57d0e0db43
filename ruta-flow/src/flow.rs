use serde::Serialize;
use uuid::Uuid;

use ruta_core::booking::{BookingConfirmation, BookingRequest, PassengerDetails, PaymentEntry};
use ruta_core::journey::{Journey, SearchQuery};
use ruta_seating::seat_map::{generate_seat_map, SeatMap};
use ruta_seating::{SeatSelection, ToggleOutcome};

/// Workflow step in the linear booking state machine
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStep {
    Search,
    Results,
    SeatSelection,
    Payment,
    Confirmation,
}

/// Which collaborator call is outstanding for this session
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingCall {
    Search,
    Booking,
}

/// Seats and fare frozen when the user leaves seat selection
#[derive(Debug, Clone, Serialize)]
pub struct FareSnapshot {
    pub seat_ids: Vec<String>,
    pub amount: i32,
    pub currency: String,
}

/// Token handed out when a collaborator call starts. Responses are
/// applied only if the session epoch still matches, so anything that
/// arrives after the user navigated away is discarded.
pub type EpochToken = u64;

/// One user's booking session: current step plus everything the prior
/// steps produced. Strictly linear except the explicit back edges;
/// each backward transition discards the state owned by the step
/// being left.
#[derive(Debug)]
pub struct BookingFlow {
    step: BookingStep,
    epoch: u64,
    pending: Option<PendingCall>,
    max_seats: usize,
    query: Option<SearchQuery>,
    results: Vec<Journey>,
    journey: Option<Journey>,
    selection: Option<SeatSelection>,
    fare: Option<FareSnapshot>,
    passenger: Option<PassengerDetails>,
    confirmation: Option<BookingConfirmation>,
    last_error: Option<String>,
}

impl BookingFlow {
    pub fn new(max_seats: usize) -> Self {
        Self {
            step: BookingStep::Search,
            epoch: 0,
            pending: None,
            max_seats,
            query: None,
            results: Vec::new(),
            journey: None,
            selection: None,
            fare: None,
            passenger: None,
            confirmation: None,
            last_error: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn results(&self) -> &[Journey] {
        &self.results
    }

    pub fn journey(&self) -> Option<&Journey> {
        self.journey.as_ref()
    }

    pub fn selection(&self) -> Option<&SeatSelection> {
        self.selection.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Grid for the active journey, regenerated on demand (generation
    /// is deterministic, so this always matches the selection's scope)
    pub fn seat_map(&self) -> Result<SeatMap, FlowError> {
        let journey = self
            .journey
            .as_ref()
            .ok_or_else(|| self.invalid("seatMap"))?;
        Ok(generate_seat_map(journey.vehicle.capacity)?)
    }

    /// Search → (pending search). Validates the query and marks the
    /// collaborator call outstanding; a second submit while one is in
    /// flight is rejected.
    pub fn begin_search(&mut self, query: SearchQuery) -> Result<EpochToken, FlowError> {
        if self.step != BookingStep::Search {
            return Err(self.invalid("submitSearch"));
        }
        self.ensure_idle()?;
        query.validate()?;
        self.query = Some(query);
        self.pending = Some(PendingCall::Search);
        Ok(self.epoch)
    }

    /// (pending search) → Results. Inactive journeys are dropped here
    /// so they can never be selected. A stale token means the user
    /// already left the step; the response is discarded.
    pub fn apply_search_results(&mut self, token: EpochToken, journeys: Vec<Journey>) -> bool {
        if token != self.epoch || self.pending != Some(PendingCall::Search) {
            return false;
        }
        self.results = journeys.into_iter().filter(Journey::is_bookable).collect();
        self.pending = None;
        self.step = BookingStep::Results;
        self.epoch += 1;
        true
    }

    /// Results → SeatSelection. Scopes a fresh selection to the chosen
    /// journey's seat map; anything left over from an earlier journey
    /// is dropped.
    pub fn select_journey(&mut self, journey_id: Uuid) -> Result<(), FlowError> {
        if self.step != BookingStep::Results {
            return Err(self.invalid("selectJourney"));
        }
        self.ensure_idle()?;
        let journey = self
            .results
            .iter()
            .find(|j| j.id == journey_id)
            .cloned()
            .ok_or(FlowError::JourneyNotFound(journey_id))?;
        if !journey.is_bookable() {
            return Err(FlowError::JourneyNotBookable(journey_id));
        }
        self.selection = Some(SeatSelection::for_journey(&journey, self.max_seats)?);
        self.journey = Some(journey);
        self.fare = None;
        self.passenger = None;
        self.confirmation = None;
        self.step = BookingStep::SeatSelection;
        self.epoch += 1;
        Ok(())
    }

    /// Flip a seat on the active selection. Refused toggles are
    /// reported as outcomes, not errors.
    pub fn toggle_seat(&mut self, seat_id: &str) -> Result<ToggleOutcome, FlowError> {
        if self.step != BookingStep::SeatSelection {
            return Err(self.invalid("toggleSeat"));
        }
        let selection = self
            .selection
            .as_mut()
            .ok_or_else(|| FlowError::Internal("seat selection missing".into()))?;
        Ok(selection.toggle(seat_id))
    }

    /// SeatSelection → Payment. Requires at least one seat and freezes
    /// the seat list and fare for the booking request.
    pub fn continue_to_payment(&mut self) -> Result<(), FlowError> {
        if self.step != BookingStep::SeatSelection {
            return Err(self.invalid("continue"));
        }
        let (selection, journey) = match (&self.selection, &self.journey) {
            (Some(s), Some(j)) => (s, j),
            _ => return Err(FlowError::Internal("seat selection missing".into())),
        };
        if selection.is_empty() {
            return Err(FlowError::NoSeatsSelected);
        }
        self.fare = Some(FareSnapshot {
            seat_ids: selection.selected().to_vec(),
            amount: selection.total_fare(),
            currency: journey.fare_currency.clone(),
        });
        self.step = BookingStep::Payment;
        self.epoch += 1;
        Ok(())
    }

    /// Payment → (pending booking). Validates both entry forms and
    /// produces the request for the booking collaborator.
    pub fn begin_booking(
        &mut self,
        passenger: PassengerDetails,
        payment: PaymentEntry,
    ) -> Result<(EpochToken, BookingRequest), FlowError> {
        if self.step != BookingStep::Payment {
            return Err(self.invalid("submitPayment"));
        }
        self.ensure_idle()?;
        passenger.validate()?;
        payment.validate()?;

        let journey = self
            .journey
            .as_ref()
            .ok_or_else(|| FlowError::Internal("journey missing".into()))?;
        let fare = self
            .fare
            .as_ref()
            .ok_or_else(|| FlowError::Internal("fare snapshot missing".into()))?;

        let request = BookingRequest {
            journey_id: journey.id,
            seat_ids: fare.seat_ids.clone(),
            passenger: passenger.clone(),
            fare_amount: fare.amount,
            fare_currency: fare.currency.clone(),
        };
        self.passenger = Some(passenger);
        self.pending = Some(PendingCall::Booking);
        Ok((self.epoch, request))
    }

    /// (pending booking) → Confirmation, or back to an idle Payment
    /// step with a retryable error. Stale tokens are discarded.
    pub fn apply_booking_result(
        &mut self,
        token: EpochToken,
        result: Result<BookingConfirmation, String>,
    ) -> bool {
        if token != self.epoch || self.pending != Some(PendingCall::Booking) {
            return false;
        }
        self.pending = None;
        self.epoch += 1;
        match result {
            Ok(confirmation) => {
                self.confirmation = Some(confirmation);
                self.last_error = None;
                self.step = BookingStep::Confirmation;
            }
            Err(message) => {
                // Stay on Payment; seats and fare are kept for retry
                self.last_error = Some(message);
            }
        }
        true
    }

    /// One step backward. Allowed while a call is in flight: the epoch
    /// bump makes the eventual response land on the floor.
    pub fn back(&mut self) -> Result<(), FlowError> {
        match self.step {
            BookingStep::Results => {
                self.results.clear();
                self.step = BookingStep::Search;
            }
            BookingStep::SeatSelection => {
                self.journey = None;
                self.selection = None;
                self.step = BookingStep::Results;
            }
            BookingStep::Payment => {
                self.fare = None;
                self.passenger = None;
                self.last_error = None;
                self.step = BookingStep::SeatSelection;
            }
            BookingStep::Search | BookingStep::Confirmation => {
                return Err(self.invalid("back"));
            }
        }
        self.pending = None;
        self.epoch += 1;
        Ok(())
    }

    /// Confirmation → Search, dropping every piece of accumulated state
    pub fn restart(&mut self) -> Result<(), FlowError> {
        if self.step != BookingStep::Confirmation {
            return Err(self.invalid("restart"));
        }
        let epoch = self.epoch + 1;
        *self = Self::new(self.max_seats);
        self.epoch = epoch;
        Ok(())
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            step: self.step,
            in_flight: self.in_flight(),
            query: self.query.clone(),
            results: self.results.clone(),
            journey: self.journey.clone(),
            selected_seats: self
                .selection
                .as_ref()
                .map(|s| s.selected().to_vec())
                .unwrap_or_default(),
            total_fare: self.selection.as_ref().map(|s| s.total_fare()).unwrap_or(0),
            fare: self.fare.clone(),
            passenger: self.passenger.clone(),
            confirmation: self.confirmation.clone(),
            last_error: self.last_error.clone(),
        }
    }

    fn ensure_idle(&self) -> Result<(), FlowError> {
        if let Some(call) = self.pending {
            return Err(FlowError::CallInFlight(call));
        }
        Ok(())
    }

    fn invalid(&self, event: &str) -> FlowError {
        FlowError::InvalidTransition {
            from: format!("{:?}", self.step),
            event: event.to_string(),
        }
    }
}

/// Serializable view of a session for clients resuming UI state
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub step: BookingStep,
    pub in_flight: bool,
    pub query: Option<SearchQuery>,
    pub results: Vec<Journey>,
    pub journey: Option<Journey>,
    pub selected_seats: Vec<String>,
    pub total_fare: i32,
    pub fare: Option<FareSnapshot>,
    pub passenger: Option<PassengerDetails>,
    pub confirmation: Option<BookingConfirmation>,
    pub last_error: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Event {event} is not legal in step {from}")]
    InvalidTransition { from: String, event: String },

    #[error("A collaborator call is already in flight: {0:?}")]
    CallInFlight(PendingCall),

    #[error("Journey not found in results: {0}")]
    JourneyNotFound(Uuid),

    #[error("Journey is not open for booking: {0}")]
    JourneyNotBookable(Uuid),

    #[error("At least one seat must be selected")]
    NoSeatsSelected,

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Validation(#[from] ruta_core::CoreError),

    #[error(transparent)]
    Seating(#[from] ruta_seating::SeatingError),

    #[error("Workflow state corrupted: {0}")]
    Internal(String),
}
