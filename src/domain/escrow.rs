use crate::domain::contribution::ParticipantId;
use serde::{Deserialize, Serialize};

/// Record of the single payment held for the current batch.
///
/// Only one payment cycle is tracked at a time: a new payment overwrites
/// the previous buyer and amount rather than accumulating.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escrow {
    buyer: Option<ParticipantId>,
    total_received: u64,
}

impl Escrow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receive(&mut self, buyer: ParticipantId, amount: u64) {
        self.buyer = Some(buyer);
        self.total_received = amount;
    }

    pub fn buyer(&self) -> Option<&ParticipantId> {
        self.buyer.as_ref()
    }

    pub fn total_received(&self) -> u64 {
        self.total_received
    }
}
