pub mod payment;
pub mod seat;
pub mod selection;
pub mod session;
pub mod wizard;

pub use seat::{SeatCode, SeatMap};
pub use selection::{SeatSelection, SeatState, SeatToggle, TicketCount};
pub use session::{WizardSession, WizardSessions};
pub use wizard::{BookingReceipt, BookingWizard, PaymentContext, WizardStep};
