// HTTP middleware
pub mod rate_limit;
pub mod session_auth;

pub use rate_limit::*;
pub use session_auth::*;
