use crate::domain::contribution::ParticipantId;
use thiserror::Error;

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;

/// Failures surfaced by the batch engine and its adapters.
///
/// Grouped by cause: caller-supplied values out of contract, operations
/// invalid in the current ledger/escrow state, external payout failures,
/// rejected re-entrant calls, and checked-arithmetic overflow. Every error
/// aborts the whole operation with no partial state change.
#[derive(Error, Debug)]
pub enum LedgerError {
    // Validation
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
    #[error("price per kilogram must be greater than zero")]
    InvalidPrice,
    #[error("payment of {offered} is below the batch price of {expected}")]
    InsufficientPayment { expected: u64, offered: u64 },

    // State
    #[error("participant {0} already has an active contribution")]
    DuplicateParticipant(ParticipantId),
    #[error("the batch has no contributions")]
    EmptyBatch,
    #[error("no payment has been received for this batch")]
    NoPaymentReceived,
    #[error("index {index} is out of range for {len} contributions")]
    IndexOutOfRange { index: usize, len: usize },

    // Transfer
    #[error("transfer to {participant} failed: {reason}")]
    TransferFailed {
        participant: ParticipantId,
        reason: String,
    },

    // Concurrency
    #[error("rejected re-entrant call: another operation is in progress")]
    ReentrancyRejected,

    // Arithmetic
    #[error("arithmetic overflow computing {0}")]
    ArithmeticOverflow(&'static str),

    // Adapters
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file error: {0}")]
    State(#[from] serde_json::Error),
}
