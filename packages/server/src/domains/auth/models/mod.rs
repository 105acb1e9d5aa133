pub mod email;
pub mod otp;

pub use email::*;
pub use otp::*;
