use std::collections::HashMap;
use std::error::Error;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use ruta_core::booking::{BookingConfirmation, BookingRequest};
use ruta_core::journey::{Journey, JourneyStatus, RouteInfo, SearchQuery, VehicleInfo};
use ruta_core::providers::{BookingProvider, SearchProvider};
use ruta_core::session::SessionContext;

/// Trigger for exercising the booking failure path end to end
pub const DECLINE_EMAIL: &str = "decline@example.com";

struct SeededRoute {
    origin: &'static str,
    destination: &'static str,
    distance_km: u32,
    duration_minutes: u32,
    fare_amount: i32,
    departures: &'static [(u32, u32, &'static str, &'static str, u32, JourneyStatus)],
}

// (hour, minute, bus number, type, capacity, status)
const ROUTES: &[SeededRoute] = &[
    SeededRoute {
        origin: "Colombo",
        destination: "Galle",
        distance_km: 116,
        duration_minutes: 150,
        fare_amount: 1200,
        departures: &[
            (6, 30, "NB-4521", "Luxury", 40, JourneyStatus::Active),
            (10, 0, "NB-3310", "Semi-Luxury", 38, JourneyStatus::Active),
            (22, 15, "NB-1107", "Normal", 54, JourneyStatus::Inactive),
        ],
    },
    SeededRoute {
        origin: "Colombo",
        destination: "Kandy",
        distance_km: 115,
        duration_minutes: 180,
        fare_amount: 950,
        departures: &[
            (7, 0, "NB-7788", "Semi-Luxury", 44, JourneyStatus::Active),
            (14, 30, "NB-2045", "Luxury", 40, JourneyStatus::Active),
        ],
    },
    SeededRoute {
        origin: "Colombo",
        destination: "Jaffna",
        distance_km: 398,
        duration_minutes: 480,
        fare_amount: 2800,
        departures: &[(20, 0, "NB-9012", "Luxury", 40, JourneyStatus::Active)],
    },
];

/// Seeded schedule lookup for development and tests. Matches routes
/// case-insensitively and materialises journeys on the queried date.
pub struct InMemorySearchProvider;

impl InMemorySearchProvider {
    pub fn seeded() -> Self {
        Self
    }
}

#[async_trait]
impl SearchProvider for InMemorySearchProvider {
    async fn search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<Journey>, Box<dyn Error + Send + Sync>> {
        let origin = query.origin.trim().to_lowercase();
        let destination = query.destination.trim().to_lowercase();

        let mut journeys = Vec::new();
        for route in ROUTES {
            if route.origin.to_lowercase() != origin
                || route.destination.to_lowercase() != destination
            {
                continue;
            }
            for &(hour, minute, number, vehicle_type, capacity, status) in route.departures {
                let Some(departure_naive) = query.date.and_hms_opt(hour, minute, 0) else {
                    continue;
                };
                let departure = Utc.from_utc_datetime(&departure_naive);
                let arrival = departure + chrono::Duration::minutes(route.duration_minutes as i64);

                journeys.push(Journey {
                    id: Uuid::new_v4(),
                    vehicle: VehicleInfo {
                        number: number.to_string(),
                        vehicle_type: vehicle_type.to_string(),
                        operator_name: "SLTB".to_string(),
                        capacity,
                        in_service: true,
                    },
                    route: RouteInfo {
                        origin: route.origin.to_string(),
                        destination: route.destination.to_string(),
                        distance_km: route.distance_km,
                        duration_minutes: route.duration_minutes,
                    },
                    departure_time: departure,
                    arrival_time: arrival,
                    status,
                    fare_amount: route.fare_amount,
                    fare_currency: "LKR".to_string(),
                    unavailable_seats: Vec::new(),
                });
            }
        }
        Ok(journeys)
    }
}

/// Accepts every booking except the declared decline trigger, in the
/// way a sandbox payment adapter would
pub struct MockBookingProvider;

#[async_trait]
impl BookingProvider for MockBookingProvider {
    async fn create_booking(
        &self,
        request: &BookingRequest,
    ) -> Result<BookingConfirmation, Box<dyn Error + Send + Sync>> {
        if request.passenger.email == DECLINE_EMAIL {
            return Err("Simulated booking service failure".into());
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

/// Flat key/value session state behind the [`SessionContext`] seam
#[derive(Default)]
pub struct InMemorySessionContext {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySessionContext {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionContext for InMemorySessionContext {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}
