//! The booking wizard: showtimes, seats, payment, confirmation.
//!
//! Each step owns exactly the data it needs, so nothing chosen on a later
//! step survives going back past it.

use std::mem;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::payment::{self, BookingRequest, PaymentDetails, PaymentSimulator};
use super::seat::{SeatCode, SeatMap};
use super::selection::{total_amount, SeatSelection, SeatToggle, TicketCount};
use crate::backend::BookingBackend;
use crate::entities::{movie, showtime, theater};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct ShowtimesStep {
    pub movie: movie::Model,
    pub ticket_count: TicketCount,
    pub date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct SeatsStep {
    pub movie: movie::Model,
    pub date: NaiveDate,
    pub theater: theater::Model,
    pub showtime: showtime::Model,
    pub selection: SeatSelection,
}

#[derive(Debug, Clone)]
pub struct PaymentStep {
    pub movie: movie::Model,
    pub ticket_count: TicketCount,
    pub date: NaiveDate,
    pub theater: theater::Model,
    pub showtime: showtime::Model,
    pub seats: Vec<SeatCode>,
}

impl PaymentStep {
    pub fn total_amount(&self) -> Decimal {
        total_amount(self.seats.len(), self.showtime.price)
    }
}

/// Everything the confirmation screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct BookingReceipt {
    pub booking_id: Uuid,
    pub booking_reference: String,
    pub movie: movie::Model,
    pub theater: theater::Model,
    pub showtime: showtime::Model,
    pub seats: Vec<SeatCode>,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Default)]
pub enum WizardStep {
    #[default]
    Closed,
    Showtimes(ShowtimesStep),
    Seats(SeatsStep),
    Payment(PaymentStep),
    Confirmation(BookingReceipt),
}

impl WizardStep {
    pub fn name(&self) -> &'static str {
        match self {
            WizardStep::Closed => "closed",
            WizardStep::Showtimes(_) => "showtimes",
            WizardStep::Seats(_) => "seats",
            WizardStep::Payment(_) => "payment",
            WizardStep::Confirmation(_) => "confirmation",
        }
    }
}

/// Who is paying and how the checkout behaves. Passed in explicitly so the
/// wizard never looks identity up on its own.
pub struct PaymentContext<'a> {
    pub backend: &'a dyn BookingBackend,
    pub user_id: Option<Uuid>,
    pub simulator: PaymentSimulator,
}

impl<'a> PaymentContext<'a> {
    pub fn new(backend: &'a dyn BookingBackend, user_id: Option<Uuid>, delay: Duration) -> Self {
        Self {
            backend,
            user_id,
            simulator: PaymentSimulator::new(delay),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookingWizard {
    step: WizardStep,
}

fn not_allowed(action: &str, step: &WizardStep) -> AppError {
    AppError::InvalidTransition(format!(
        "Cannot {} while on the {} step",
        action,
        step.name()
    ))
}

impl BookingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    /// Starts a booking for `movie` on today's date.
    pub fn open(&mut self, movie: movie::Model, ticket_count: TicketCount, today: NaiveDate) -> AppResult<()> {
        if !matches!(self.step, WizardStep::Closed) {
            return Err(not_allowed("open a booking", &self.step));
        }

        self.step = WizardStep::Showtimes(ShowtimesStep {
            movie,
            ticket_count,
            date: today,
        });
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> AppResult<()> {
        let WizardStep::Showtimes(step) = &mut self.step else {
            return Err(not_allowed("change the date", &self.step));
        };

        if date < today {
            return Err(AppError::BadRequest("Cannot book a date in the past".to_string()));
        }

        step.date = date;
        Ok(())
    }

    /// Moves to the seat map of `showtime`, with a freshly drawn occupancy.
    pub fn select_showtime(&mut self, theater: theater::Model, showtime: showtime::Model) -> AppResult<()> {
        let seat_map = SeatMap::generate(showtime.available_seats);
        self.select_showtime_with_map(theater, showtime, seat_map)
    }

    /// Same as [`select_showtime`](Self::select_showtime) but with a given seat
    /// map instead of a random one.
    pub fn select_showtime_with_map(
        &mut self,
        theater: theater::Model,
        showtime: showtime::Model,
        seat_map: SeatMap,
    ) -> AppResult<()> {
        let WizardStep::Showtimes(step) = &self.step else {
            return Err(not_allowed("pick a showtime", &self.step));
        };

        if showtime.movie_id != step.movie.id {
            return Err(AppError::BadRequest("Showtime is for a different movie".to_string()));
        }
        if showtime.theater_id != theater.id {
            return Err(AppError::BadRequest("Showtime is at a different theater".to_string()));
        }
        if showtime.show_date != step.date {
            return Err(AppError::BadRequest("Showtime is not on the selected date".to_string()));
        }

        self.enter_seats(theater, showtime, seat_map);
        Ok(())
    }

    fn enter_seats(&mut self, theater: theater::Model, showtime: showtime::Model, seat_map: SeatMap) {
        if let WizardStep::Showtimes(step) = mem::take(&mut self.step) {
            self.step = WizardStep::Seats(SeatsStep {
                movie: step.movie,
                date: step.date,
                theater,
                showtime,
                selection: SeatSelection::new(step.ticket_count, seat_map),
            });
        }
    }

    pub fn toggle_seat(&mut self, seat: SeatCode) -> AppResult<SeatToggle> {
        let WizardStep::Seats(step) = &mut self.step else {
            return Err(not_allowed("change seats", &self.step));
        };
        Ok(step.selection.toggle(seat))
    }

    pub fn confirm_seats(&mut self) -> AppResult<()> {
        let WizardStep::Seats(step) = &self.step else {
            return Err(not_allowed("confirm seats", &self.step));
        };

        if !step.selection.can_confirm() {
            return Err(AppError::InvalidTransition(format!(
                "Select {} seats before continuing ({} selected)",
                step.selection.ticket_count().get(),
                step.selection.selected().len()
            )));
        }

        if let WizardStep::Seats(step) = mem::take(&mut self.step) {
            self.step = WizardStep::Payment(PaymentStep {
                movie: step.movie,
                ticket_count: step.selection.ticket_count(),
                date: step.date,
                theater: step.theater,
                showtime: step.showtime,
                seats: step.selection.selected().to_vec(),
            });
        }
        Ok(())
    }

    /// Validates and runs the simulated payment. Any failure leaves the
    /// wizard on the payment step.
    pub async fn submit_payment(
        &mut self,
        ctx: PaymentContext<'_>,
        details: PaymentDetails,
    ) -> AppResult<BookingReceipt> {
        let WizardStep::Payment(step) = &self.step else {
            return Err(not_allowed("submit a payment", &self.step));
        };

        let details = details.normalized();
        let user_id = payment::validate(ctx.user_id, &details).inspect_err(|rejection| {
            tracing::warn!(reason = %rejection, "Payment rejected");
        })?;

        let booking = ctx
            .simulator
            .process(
                ctx.backend,
                BookingRequest {
                    user_id,
                    movie_id: step.movie.id,
                    theater_id: step.theater.id,
                    showtime: &step.showtime,
                    seats: &step.seats,
                },
            )
            .await?;

        let receipt = BookingReceipt {
            booking_id: booking.id,
            booking_reference: booking.booking_reference,
            movie: step.movie.clone(),
            theater: step.theater.clone(),
            showtime: step.showtime.clone(),
            seats: step.seats.clone(),
            total_amount: booking.total_amount,
        };
        self.step = WizardStep::Confirmation(receipt.clone());
        Ok(receipt)
    }

    /// One step back, dropping whatever the step being left introduced.
    pub fn back(&mut self) -> AppResult<()> {
        match mem::take(&mut self.step) {
            WizardStep::Showtimes(_) => {
                self.step = WizardStep::Closed;
            }
            WizardStep::Seats(step) => {
                self.step = WizardStep::Showtimes(ShowtimesStep {
                    movie: step.movie,
                    ticket_count: step.selection.ticket_count(),
                    date: step.date,
                });
            }
            WizardStep::Payment(step) => {
                let seat_map = SeatMap::generate(step.showtime.available_seats);
                self.step = WizardStep::Seats(SeatsStep {
                    movie: step.movie,
                    date: step.date,
                    theater: step.theater,
                    showtime: step.showtime,
                    selection: SeatSelection::new(step.ticket_count, seat_map),
                });
            }
            other => {
                let err = not_allowed("go back", &other);
                self.step = other;
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.step = WizardStep::Closed;
    }
}
