// Application layer - ledger use cases and the seams they run against.
// The service owns the deposit/withdraw protocol; storage implements the ports.

pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::*;
pub use ports::*;
pub use service::*;
pub use validation::*;
