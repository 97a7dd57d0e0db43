use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::{CoreError, CoreResult};

/// Passenger contact details entered on the payment step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl PassengerDetails {
    pub fn validate(&self) -> CoreResult<()> {
        require(&self.name, "passenger name")?;
        require(&self.email, "passenger email")?;
        require(&self.phone, "passenger phone")?;
        Ok(())
    }
}

/// Payment instrument fields. Validated for presence only; the card
/// never leaves the client and is not part of the booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntry {
    pub card_holder: String,
    pub card_number: String,
    pub expiry: String,
}

impl PaymentEntry {
    pub fn validate(&self) -> CoreResult<()> {
        require(&self.card_holder, "card holder")?;
        require(&self.card_number, "card number")?;
        require(&self.expiry, "card expiry")?;
        Ok(())
    }
}

fn require(value: &str, field: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationError(format!("{} is required", field)));
    }
    Ok(())
}

/// What the workflow hands to the booking service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub journey_id: Uuid,
    pub seat_ids: Vec<String>,
    pub passenger: PassengerDetails,
    pub fare_amount: i32,
    pub fare_currency: String,
}

/// Echo record returned by the booking service, display-only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub id: Uuid,
    pub journey_id: Uuid,
    pub seat_ids: Vec<String>,
    pub passenger: PassengerDetails,
    pub fare_amount: i32,
    pub fare_currency: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passenger_fields_must_be_non_empty() {
        let passenger = PassengerDetails {
            name: "N. Perera".to_string(),
            email: "n.perera@example.com".to_string(),
            phone: "0771234567".to_string(),
        };
        assert!(passenger.validate().is_ok());

        let blank_phone = PassengerDetails {
            phone: "  ".to_string(),
            ..passenger
        };
        assert!(blank_phone.validate().is_err());
    }

    #[test]
    fn test_payment_entry_validation() {
        let entry = PaymentEntry {
            card_holder: "N PERERA".to_string(),
            card_number: "4242424242424242".to_string(),
            expiry: "12/27".to_string(),
        };
        assert!(entry.validate().is_ok());

        let missing_number = PaymentEntry {
            card_number: String::new(),
            ..entry
        };
        assert!(missing_number.validate().is_err());
    }
}
