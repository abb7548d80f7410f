use crate::domain::contribution::ParticipantId;

/// Notifications recorded by mutating operations, for external consumers.
///
/// Events are buffered per operation and flushed only when the operation
/// commits, so a failed call leaves none behind.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    ContributionRecorded {
        participant: ParticipantId,
        quantity: u64,
    },
    PriceUpdated {
        price_per_unit: u64,
    },
    BatchSold {
        buyer: ParticipantId,
        amount: u64,
    },
    PaymentDistributed {
        participant: ParticipantId,
        amount: u64,
    },
}
