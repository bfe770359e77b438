//! Managed headless Chrome/Chromium over CDP.
//!
//! Each audit owns one isolated browser process for its full lifetime:
//! launched at request start, released on every exit path. The
//! [`SessionLimiter`] caps how many processes may be alive at once.

pub mod detect;
pub mod error;
pub mod limiter;
pub mod session;

pub use {
    error::BrowserError,
    limiter::{SessionLimiter, SessionPermit},
    session::BrowserSession,
};
