//! HTTP surface for the audit service.

pub mod server;
pub mod state;

pub use {
    server::{build_app, start_server},
    state::AppState,
};
