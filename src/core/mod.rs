//! Core domain types and abstractions

pub mod config;
pub mod log;
pub mod provider;
pub mod quotation;
pub mod repository;

// Re-export main types for cleaner imports
pub use provider::{FetchError, QuotationProvider};
pub use quotation::{ClientResult, Quotation, QuotationEnvelope, QuotationRecord};
pub use repository::{QuotationRepository, StoreError};
