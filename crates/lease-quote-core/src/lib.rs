pub mod config;
pub mod error;
pub mod store;
pub mod trace;
pub mod types;

#[cfg(feature = "replica")]
pub mod replica;

#[cfg(feature = "tabulated")]
pub mod tabulated;

#[cfg(feature = "ranking")]
pub mod ranking;

pub use config::PricingConfig;
pub use error::LeaseQuoteError;
pub use store::ParameterStore;
pub use types::*;

/// Standard result type for all lease-quote operations
pub type LeaseQuoteResult<T> = Result<T, LeaseQuoteError>;
