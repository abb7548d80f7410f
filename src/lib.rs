//! Ledger-and-escrow engine for pooled produce batches: contributions in,
//! one lump-sum payment, proportional payouts back out.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
