//! `stockshift-core`: domain building blocks shared by the transfer pipeline
//! and its host glue.
//!
//! This crate contains **pure domain** primitives (no IO, no logging setup).

pub mod cell;
pub mod error;
pub mod id;
pub mod risk;

pub use error::{DomainError, DomainResult};
pub use id::{CardIndex, TransferId};
pub use risk::StockoutRisk;
