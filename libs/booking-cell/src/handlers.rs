// libs/booking-cell/src/handlers.rs
use std::sync::Arc;
use axum::{extract::State, http::HeaderMap, Extension, Json};

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    BookingError, BookingRequest, BookingView, CreateBookingResponse, ListBookingsResponse,
};
use crate::services::booking::BookingService;
use shared_utils::extractor::maybe_user;

/// POST /book-doctor
///
/// Identity is optional: authenticated callers get the booking attached to
/// their account, anonymous callers get an unowned booking.
pub async fn create_booking(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
    Json(request): Json<BookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    let user = maybe_user(&headers, &config);

    let service = BookingService::new(&config);
    let booking = service
        .create_booking(request, user.as_ref())
        .await
        .map_err(|e| match e {
            BookingError::MissingFields => {
                AppError::BadRequest("All fields are required".to_string())
            }
            BookingError::InvalidPreferredTime => {
                AppError::BadRequest("Preferred time is not a valid timestamp".to_string())
            }
            BookingError::PastPreferredTime => {
                AppError::BadRequest("Preferred time must be in the future".to_string())
            }
            BookingError::DatabaseError(_) => {
                AppError::Database("Failed to save booking to database".to_string())
            }
        })?;

    Ok(Json(CreateBookingResponse {
        success: true,
        booking: BookingView::from(booking),
        message: "Booking created successfully".to_string(),
    }))
}

/// GET /book-doctor
pub async fn get_bookings(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<ListBookingsResponse>, AppError> {
    let service = BookingService::new(&config);
    let bookings = service
        .bookings_for_user(&user.id)
        .await
        .map_err(|_| AppError::Database("Failed to fetch bookings".to_string()))?;

    Ok(Json(ListBookingsResponse {
        success: true,
        bookings: bookings.into_iter().map(BookingView::from).collect(),
    }))
}
