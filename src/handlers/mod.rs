pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod wizard;
