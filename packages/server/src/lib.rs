// Chatdesk - OTP login service
//
// Backend for the dashboard's email one-time passcode login: issues codes,
// verifies them, and signs the session token stored in the `access_token` cookie.
// Users, chats and realtime updates live in the hosted backend, not here.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
