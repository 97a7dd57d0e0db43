use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::{CoreError, CoreResult};

/// Whether a journey is open for booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JourneyStatus {
    Active,
    Inactive,
}

/// Vehicle descriptor as reported by the fleet service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub number: String,
    pub vehicle_type: String,
    pub operator_name: String,
    pub capacity: u32,
    pub in_service: bool,
}

/// Route descriptor between two cities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInfo {
    pub origin: String,
    pub destination: String,
    pub distance_km: u32,
    pub duration_minutes: u32,
}

/// One bookable trip: a vehicle on a route at a departure time.
/// Immutable once fetched; the workflow references it, never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journey {
    pub id: Uuid,
    pub vehicle: VehicleInfo,
    pub route: RouteInfo,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub status: JourneyStatus,
    pub fare_amount: i32,
    pub fare_currency: String,
    /// Seat ids the backend reports as taken. Absent data means every
    /// seat is available.
    #[serde(default)]
    pub unavailable_seats: Vec<String>,
}

impl Journey {
    pub fn is_bookable(&self) -> bool {
        self.status == JourneyStatus::Active
    }
}

/// Search form input: origin, destination and travel date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub date: chrono::NaiveDate,
}

impl SearchQuery {
    /// All three fields must be present before a search may run.
    /// The date is guaranteed by the type; the cities must be non-blank.
    pub fn validate(&self) -> CoreResult<()> {
        if self.origin.trim().is_empty() {
            return Err(CoreError::ValidationError("origin is required".into()));
        }
        if self.destination.trim().is_empty() {
            return Err(CoreError::ValidationError("destination is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query(origin: &str, destination: &str) -> SearchQuery {
        SearchQuery {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_query_requires_both_cities() {
        assert!(query("Colombo", "Galle").validate().is_ok());
        assert!(query("", "Galle").validate().is_err());
        assert!(query("Colombo", "   ").validate().is_err());
    }

    #[test]
    fn test_journey_status_deserialization() {
        let json = r#""inactive""#;
        let status: JourneyStatus = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(status, JourneyStatus::Inactive);
    }

    #[test]
    fn test_unavailable_seats_default_to_empty() {
        let json = r#"
            {
                "id": "7d2f3a44-9c1b-4f7e-8a55-0d1e2f3a4b5c",
                "vehicle": {
                    "number": "NB-4521",
                    "vehicle_type": "Luxury",
                    "operator_name": "SLTB",
                    "capacity": 40,
                    "in_service": true
                },
                "route": {
                    "origin": "Colombo",
                    "destination": "Galle",
                    "distance_km": 116,
                    "duration_minutes": 150
                },
                "departure_time": "2025-06-01T08:30:00Z",
                "arrival_time": "2025-06-01T11:00:00Z",
                "status": "active",
                "fare_amount": 1200,
                "fare_currency": "LKR"
            }
        "#;
        let journey: Journey = serde_json::from_str(json).expect("Failed to deserialize");
        assert!(journey.unavailable_seats.is_empty());
        assert!(journey.is_bookable());
    }
}
