// libs/booking-cell/src/lib.rs
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    BookingError, BookingRequest, BookingStatus, BookingView, DoctorBooking, NewDoctorBooking,
    PaymentStatus,
};
pub use router::booking_routes;

// Re-export for external use
pub mod api {
    pub use crate::services::booking::{BookingService, BOOKING_AMOUNT};
}
