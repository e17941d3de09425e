// libs/booking-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ==============================================================================
// STATE MACHINES
// ==============================================================================

/// Booking lifecycle. Creation always enters `Pending`; the transitions out
/// of it are driven by out-of-band operator processes, so no mutation
/// endpoint exists here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Paid)
                | (PaymentStatus::Pending, PaymentStatus::Refunded)
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

/// A persisted row in the `doctor_bookings` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorBooking {
    pub id: String,
    pub booking_id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub concern: String,
    pub preferred_time: DateTime<Utc>,
    pub booking_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub amount: i64,
    pub whatsapp_number: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. The store assigns id and creation timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct NewDoctorBooking {
    pub booking_id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub concern: String,
    pub preferred_time: DateTime<Utc>,
    pub booking_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub amount: i64,
    pub whatsapp_number: String,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub concern: Option<String>,
    pub preferred_time: Option<String>,
}

/// Client-facing projection of a booking row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub booking_id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub concern: String,
    pub preferred_time: DateTime<Utc>,
    pub booking_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub amount: i64,
    pub whatsapp_number: String,
}

impl From<DoctorBooking> for BookingView {
    fn from(booking: DoctorBooking) -> Self {
        Self {
            booking_id: booking.booking_id,
            user_id: booking.user_id,
            name: booking.name,
            phone: booking.phone,
            email: booking.email,
            concern: booking.concern,
            preferred_time: booking.preferred_time,
            booking_time: booking.booking_time,
            status: booking.status,
            payment_status: booking.payment_status,
            amount: booking.amount,
            whatsapp_number: booking.whatsapp_number,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingResponse {
    pub success: bool,
    pub booking: BookingView,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListBookingsResponse {
    pub success: bool,
    pub bookings: Vec<BookingView>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Preferred time is not a valid timestamp")]
    InvalidPreferredTime,

    #[error("Preferred time must be in the future")]
    PastPreferredTime,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_booking_can_confirm_or_cancel() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn confirmed_booking_can_only_complete() {
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn terminal_booking_states_stay_terminal() {
        for terminal in [BookingStatus::Completed, BookingStatus::Cancelled] {
            for next in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Completed,
                BookingStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn payment_only_moves_out_of_pending() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Paid));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Paid.can_transition_to(PaymentStatus::Refunded));
        assert!(!PaymentStatus::Refunded.can_transition_to(PaymentStatus::Paid));
    }

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Refunded).unwrap(),
            "\"refunded\""
        );
    }

    #[test]
    fn booking_view_uses_camel_case() {
        let view = BookingView {
            booking_id: "DOC-1700000000000-A1B2C3D4E".to_string(),
            user_id: None,
            name: "Asha".to_string(),
            phone: "+911234567890".to_string(),
            email: "asha@example.com".to_string(),
            concern: "Follow-up".to_string(),
            preferred_time: Utc::now(),
            booking_time: Utc::now(),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            amount: 199,
            whatsapp_number: "+911234567890".to_string(),
        };

        let value = serde_json::to_value(&view).unwrap();
        assert!(value.get("bookingId").is_some());
        assert!(value.get("paymentStatus").is_some());
        assert!(value.get("whatsappNumber").is_some());
        assert!(value.get("booking_id").is_none());
    }
}
