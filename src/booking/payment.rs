//! Simulated checkout.
//!
//! There is no gateway: card fields are only normalised for display, a
//! fixed delay stands in for processing, and success is always assumed
//! once the required fields are present. The booking insert and the seat
//! count update are two independent writes.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use super::seat::SeatCode;
use super::selection::total_amount;
use crate::backend::{BookingBackend, NewBooking};
use crate::entities::{booking, showtime};
use crate::error::{AppError, AppResult};

pub const BOOKING_REFERENCE_PREFIX: &str = "BMS";
const REFERENCE_SUFFIX_LEN: usize = 5;
const REFERENCE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const CARD_NUMBER_MAX_LEN: usize = 19;

/// Why a payment submission was refused before anything was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentRejection {
    #[error("Please log in to complete your booking.")]
    AuthenticationRequired,
    #[error("Please fill in all payment details (missing: {}).", .missing.join(", "))]
    PaymentDetailsRequired { missing: Vec<&'static str> },
}

/// Card-like form fields collected on the payment step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub name_on_card: String,
    pub email: String,
    pub phone: String,
}

impl PaymentDetails {
    /// Applies the input masks of the card form.
    pub fn normalized(self) -> Self {
        Self {
            card_number: format_card_number(&self.card_number),
            expiry_date: format_expiry_date(&self.expiry_date),
            cvv: format_cvv(&self.cvv),
            name_on_card: self.name_on_card.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("card_number", &self.card_number),
            ("expiry_date", &self.expiry_date),
            ("cvv", &self.cvv),
            ("name_on_card", &self.name_on_card),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups the first 4 to 16 digits in blocks of four. Shorter input is
/// returned as bare digits.
pub fn format_card_number(value: &str) -> String {
    let digits = digits(value);
    if digits.len() < 4 {
        return digits;
    }

    let grouped = digits
        .as_bytes()
        .chunks(4)
        .take(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ");

    grouped.chars().take(CARD_NUMBER_MAX_LEN).collect()
}

/// `MMYY` digits rendered as `MM/YY`.
pub fn format_expiry_date(value: &str) -> String {
    let digits = digits(value);
    if digits.len() >= 2 {
        let end = digits.len().min(4);
        format!("{}/{}", &digits[..2], &digits[2..end])
    } else {
        digits
    }
}

pub fn format_cvv(value: &str) -> String {
    digits(value).chars().take(3).collect()
}

/// Checks the submission in the order the checkout reports problems:
/// identity first, then the four card fields.
pub fn validate(user_id: Option<Uuid>, details: &PaymentDetails) -> Result<Uuid, PaymentRejection> {
    let user_id = user_id.ok_or(PaymentRejection::AuthenticationRequired)?;

    let missing = details.missing_fields();
    if !missing.is_empty() {
        return Err(PaymentRejection::PaymentDetailsRequired { missing });
    }

    Ok(user_id)
}

/// `BMS` + unix millis + five base-36 characters. Collisions are unlikely,
/// not impossible.
pub fn generate_booking_reference<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..REFERENCE_SUFFIX_LEN)
        .map(|_| REFERENCE_ALPHABET[rng.gen_range(0..REFERENCE_ALPHABET.len())] as char)
        .collect();

    format!("{}{}{}", BOOKING_REFERENCE_PREFIX, now.timestamp_millis(), suffix)
}

pub fn is_booking_reference(reference: &str) -> bool {
    let Some(rest) = reference.strip_prefix(BOOKING_REFERENCE_PREFIX) else {
        return false;
    };
    if rest.len() <= REFERENCE_SUFFIX_LEN {
        return false;
    }

    let (timestamp, suffix) = rest.split_at(rest.len() - REFERENCE_SUFFIX_LEN);
    timestamp.chars().all(|c| c.is_ascii_digit())
        && suffix.bytes().all(|b| REFERENCE_ALPHABET.contains(&b))
}

/// What gets charged and written on success.
pub struct BookingRequest<'a> {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub theater_id: Uuid,
    pub showtime: &'a showtime::Model,
    pub seats: &'a [SeatCode],
}

#[derive(Debug, Clone)]
pub struct PaymentSimulator {
    delay: Duration,
}

impl PaymentSimulator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Waits out the simulated processing time, then writes the booking and
    /// the decremented seat count.
    ///
    /// A failed seat update is logged and otherwise ignored: the booking has
    /// already been written and is not rolled back.
    pub async fn process(
        &self,
        backend: &dyn BookingBackend,
        request: BookingRequest<'_>,
    ) -> AppResult<booking::Model> {
        tokio::time::sleep(self.delay).await;

        let reference = generate_booking_reference(Utc::now(), &mut rand::thread_rng());
        let showtime = request.showtime;

        let new_booking = NewBooking {
            user_id: request.user_id,
            movie_id: request.movie_id,
            theater_id: request.theater_id,
            showtime_id: showtime.id,
            selected_seats: request.seats.iter().map(ToString::to_string).collect(),
            total_amount: total_amount(request.seats.len(), showtime.price),
            payment_method: booking::PAYMENT_METHOD_CARD.to_string(),
            payment_status: booking::PAYMENT_STATUS_COMPLETED.to_string(),
            booking_reference: reference,
        };

        let booking = backend.insert_booking(new_booking).await.map_err(|e| {
            tracing::error!(error = %e, showtime_id = %showtime.id, "Booking error");
            AppError::Internal("Failed to create booking".to_string())
        })?;

        let remaining = showtime.available_seats - request.seats.len() as i32;
        if let Err(e) = backend.update_available_seats(showtime.id, remaining).await {
            tracing::error!(
                error = %e,
                showtime_id = %showtime.id,
                booking_reference = %booking.booking_reference,
                "Seat update error; booking kept"
            );
        }

        tracing::info!(
            booking_reference = %booking.booking_reference,
            seats = request.seats.len(),
            total = %booking.total_amount,
            "Payment successful"
        );

        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn filled() -> PaymentDetails {
        PaymentDetails {
            card_number: "4111 1111 1111 1111".to_string(),
            expiry_date: "12/29".to_string(),
            cvv: "123".to_string(),
            name_on_card: "Asha Rao".to_string(),
            email: String::new(),
            phone: String::new(),
        }
    }

    #[test]
    fn test_card_number_grouping() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("4111-1111 11"), "4111 1111 11");
        assert_eq!(format_card_number("41"), "41");
        assert_eq!(format_card_number("abc"), "");
        // Anything past sixteen digits is dropped
        assert_eq!(format_card_number("41111111111111112222"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_expiry_and_cvv_masks() {
        assert_eq!(format_expiry_date("1229"), "12/29");
        assert_eq!(format_expiry_date("12/2999"), "12/29");
        assert_eq!(format_expiry_date("1"), "1");
        assert_eq!(format_expiry_date("12"), "12/");
        assert_eq!(format_cvv("12a34"), "123");
    }

    #[test]
    fn test_validation_requires_user_first() {
        let details = PaymentDetails::default();
        assert_eq!(validate(None, &details), Err(PaymentRejection::AuthenticationRequired));
    }

    #[test]
    fn test_validation_names_missing_fields() {
        let mut details = filled();
        details.card_number.clear();
        details.cvv.clear();

        let rejection = validate(Some(Uuid::new_v4()), &details).unwrap_err();
        assert_eq!(
            rejection,
            PaymentRejection::PaymentDetailsRequired { missing: vec!["card_number", "cvv"] }
        );
    }

    #[test]
    fn test_contact_fields_are_optional() {
        let user = Uuid::new_v4();
        assert_eq!(validate(Some(user), &filled()), Ok(user));
    }

    #[test]
    fn test_booking_reference_format() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = DateTime::from_timestamp_millis(1_718_000_000_123).unwrap();

        let reference = generate_booking_reference(now, &mut rng);
        assert!(reference.starts_with("BMS1718000000123"));
        assert_eq!(reference.len(), "BMS".len() + 13 + 5);
        assert!(is_booking_reference(&reference));

        assert!(!is_booking_reference("BMS123"));
        assert!(!is_booking_reference("XYZ1718000000123ABCDE"));
        assert!(!is_booking_reference("BMS1718000000123abcde"));
    }
}
