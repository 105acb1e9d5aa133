// Auth actions - called directly from the route handlers

pub mod issue_session;
pub mod send_otp;
pub mod verify_otp;

pub use issue_session::issue_session;
pub use send_otp::send_otp;
pub use verify_otp::verify_otp;
