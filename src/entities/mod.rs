pub mod booking;
pub mod movie;
pub mod showtime;
pub mod theater;
pub mod user;
