use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use ruta_core::journey::Journey;

use crate::seat_map::{generate_seat_map, SeatMap, SeatingError};

/// What a toggle did. Rejections are normal UI traffic (stale buttons,
/// full selections), so they come back as values rather than errors.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToggleOutcome {
    Added,
    Removed,
    RejectedUnknownSeat,
    RejectedUnavailable,
    RejectedLimitReached,
}

impl ToggleOutcome {
    pub fn changed_selection(&self) -> bool {
        matches!(self, ToggleOutcome::Added | ToggleOutcome::Removed)
    }
}

/// The in-progress seat choice for one journey.
///
/// Holds an ordered, duplicate-free list of seat ids bounded by the
/// per-booking maximum. Advisory only: the booking service performs
/// the authoritative availability check at creation time.
#[derive(Debug, Clone, Serialize)]
pub struct SeatSelection {
    journey_id: Uuid,
    fare_per_seat: i32,
    max_seats: usize,
    known_seats: HashSet<String>,
    unavailable: HashSet<String>,
    selected: Vec<String>,
}

impl SeatSelection {
    pub fn new(
        journey_id: Uuid,
        map: &SeatMap,
        unavailable_seats: &[String],
        fare_per_seat: i32,
        max_seats: usize,
    ) -> Self {
        Self {
            journey_id,
            fare_per_seat,
            max_seats,
            known_seats: map.seat_ids().into_iter().collect(),
            unavailable: unavailable_seats.iter().cloned().collect(),
            selected: Vec::new(),
        }
    }

    /// Build the map from the journey's vehicle capacity and scope a
    /// fresh selection to it.
    pub fn for_journey(journey: &Journey, max_seats: usize) -> Result<Self, SeatingError> {
        let map = generate_seat_map(journey.vehicle.capacity)?;
        Ok(Self::new(
            journey.id,
            &map,
            &journey.unavailable_seats,
            journey.fare_amount,
            max_seats,
        ))
    }

    /// Flip one seat. Removal is unconditional; addition requires the
    /// seat to exist in this journey's map, be available, and the
    /// selection to have room.
    pub fn toggle(&mut self, seat_id: &str) -> ToggleOutcome {
        if let Some(pos) = self.selected.iter().position(|s| s == seat_id) {
            self.selected.remove(pos);
            return ToggleOutcome::Removed;
        }
        if !self.known_seats.contains(seat_id) {
            return ToggleOutcome::RejectedUnknownSeat;
        }
        if self.unavailable.contains(seat_id) {
            return ToggleOutcome::RejectedUnavailable;
        }
        if self.selected.len() >= self.max_seats {
            return ToggleOutcome::RejectedLimitReached;
        }
        self.selected.push(seat_id.to_string());
        ToggleOutcome::Added
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn journey_id(&self) -> Uuid {
        self.journey_id
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// True when the seat exists in the map and the backend has not
    /// flagged it taken. Absent data defaults to available.
    pub fn is_available(&self, seat_id: &str) -> bool {
        self.known_seats.contains(seat_id) && !self.unavailable.contains(seat_id)
    }

    /// Always `fare_per_seat * selected count`, recomputed on every call
    pub fn total_fare(&self) -> i32 {
        self.fare_per_seat * self.selected.len() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(capacity: u32, unavailable: &[&str], max_seats: usize) -> SeatSelection {
        let map = generate_seat_map(capacity).unwrap();
        let unavailable: Vec<String> = unavailable.iter().map(|s| s.to_string()).collect();
        SeatSelection::new(Uuid::new_v4(), &map, &unavailable, 1200, max_seats)
    }

    #[test]
    fn test_selection_is_bounded_by_maximum() {
        let mut sel = selection(40, &[], 4);
        for seat in ["S1", "S2", "S3", "S4"] {
            assert_eq!(sel.toggle(seat), ToggleOutcome::Added);
        }
        assert_eq!(sel.toggle("S5"), ToggleOutcome::RejectedLimitReached);
        assert_eq!(sel.selected(), &["S1", "S2", "S3", "S4"]);
        assert_eq!(sel.total_fare(), 4 * 1200);
    }

    #[test]
    fn test_toggle_is_self_inverse() {
        let mut sel = selection(40, &[], 4);
        sel.toggle("S7");
        assert_eq!(sel.selected(), &["S7"]);
        assert_eq!(sel.toggle("S7"), ToggleOutcome::Removed);
        assert!(sel.is_empty());
        assert_eq!(sel.total_fare(), 0);
    }

    #[test]
    fn test_removal_still_works_at_the_limit() {
        let mut sel = selection(40, &[], 2);
        sel.toggle("S1");
        sel.toggle("S2");
        assert_eq!(sel.toggle("S1"), ToggleOutcome::Removed);
        assert_eq!(sel.toggle("S3"), ToggleOutcome::Added);
        assert_eq!(sel.selected(), &["S2", "S3"]);
    }

    #[test]
    fn test_unavailable_seat_is_a_no_op() {
        let mut sel = selection(40, &["S12"], 4);
        assert!(!sel.is_available("S12"));
        assert_eq!(sel.toggle("S12"), ToggleOutcome::RejectedUnavailable);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_seat_outside_map_is_a_no_op() {
        let mut sel = selection(30, &[], 4);
        assert_eq!(sel.toggle("S31"), ToggleOutcome::RejectedUnknownSeat);
        assert_eq!(sel.toggle("A1"), ToggleOutcome::RejectedUnknownSeat);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_fare_tracks_every_mutation() {
        let mut sel = selection(40, &[], 4);
        sel.toggle("S1");
        sel.toggle("S2");
        assert_eq!(sel.total_fare(), 2400);
        sel.toggle("S1");
        assert_eq!(sel.total_fare(), 1200);
        sel.clear();
        assert_eq!(sel.total_fare(), 0);
    }
}
