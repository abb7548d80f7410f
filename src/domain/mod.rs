//! Domain layer: the records and rules of a pooled produce batch.

pub mod contribution;
pub mod escrow;
pub mod events;
pub mod ledger;
pub mod ports;
pub mod pricing;
