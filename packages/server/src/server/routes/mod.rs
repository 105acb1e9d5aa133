// HTTP routes
pub mod auth;
pub mod health;
pub mod session;

pub use auth::*;
pub use health::*;
pub use session::*;
