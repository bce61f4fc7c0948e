//! HTTP boundary over the ledger service.
//!
//! Parses and validates requests, calls [`WalletOperations`], and maps
//! failures to status codes.
//!
//! [`WalletOperations`]: crate::application::WalletOperations

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use server::{build_router, run_server, AppState};
