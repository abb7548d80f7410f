use crate::domain::contribution::{Contribution, ParticipantId, PaymentDetails};
use crate::domain::escrow::Escrow;
use crate::domain::events::LedgerEvent;
use crate::domain::ledger::ContributionLedger;
use crate::domain::ports::FundTransferBox;
use crate::domain::pricing::Pricing;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Persisted state of one batch: everything that outlives a process.
///
/// Recorded events and the reentrancy flag are transient and never part of
/// a snapshot.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSnapshot {
    pub label: String,
    pub ledger: ContributionLedger,
    pub pricing: Pricing,
    pub escrow: Escrow,
}

#[derive(Default)]
struct BatchState {
    entered: bool,
    events: Vec<LedgerEvent>,
    label: String,
    ledger: ContributionLedger,
    pricing: Pricing,
    escrow: Escrow,
}

/// The public operation surface over one batch.
///
/// `BatchEngine` owns the contribution ledger, the pricing record and the
/// escrow behind a single mutex, plus the payout capability. Every mutating
/// operation runs under a reentrancy flag for its full duration: the payout
/// backend invoked during `distribute` may call back into the engine, and
/// any mutating call arriving while the flag is set fails with
/// `ReentrancyRejected`. Lock sections are short and never held across the
/// external transfer call, so read-only queries stay available throughout.
pub struct BatchEngine {
    state: Mutex<BatchState>,
    transfer: FundTransferBox,
}

/// Clears the reentrancy flag on every exit path of a mutating operation.
struct OpGuard<'a> {
    state: &'a Mutex<BatchState>,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).entered = false;
    }
}

fn lock(state: &Mutex<BatchState>) -> MutexGuard<'_, BatchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl BatchEngine {
    pub fn new(transfer: FundTransferBox) -> Self {
        Self {
            state: Mutex::new(BatchState::default()),
            transfer,
        }
    }

    /// Resumes a batch from persisted state.
    pub fn with_snapshot(snapshot: BatchSnapshot, transfer: FundTransferBox) -> Self {
        Self {
            state: Mutex::new(BatchState {
                entered: false,
                events: Vec::new(),
                label: snapshot.label,
                ledger: snapshot.ledger,
                pricing: snapshot.pricing,
                escrow: snapshot.escrow,
            }),
            transfer,
        }
    }

    fn begin(&self) -> Result<OpGuard<'_>> {
        let mut state = lock(&self.state);
        if state.entered {
            return Err(LedgerError::ReentrancyRejected);
        }
        state.entered = true;
        drop(state);
        Ok(OpGuard { state: &self.state })
    }

    /// Records a new contribution for `participant`.
    pub fn add_contribution(
        &self,
        participant: ParticipantId,
        display_name: impl Into<String>,
        contact_phone: impl Into<String>,
        quantity: u64,
    ) -> Result<()> {
        let _op = self.begin()?;
        let mut state = lock(&self.state);

        let contribution =
            Contribution::new(participant.clone(), display_name, contact_phone, quantity);
        state.ledger.add(contribution)?;
        state.events.push(LedgerEvent::ContributionRecorded {
            participant: participant.clone(),
            quantity,
        });
        tracing::info!(%participant, quantity, "contribution recorded");
        Ok(())
    }

    /// Removes `participant`'s contribution. Unknown participants are a
    /// no-op, not an error.
    pub fn remove_contribution(&self, participant: &ParticipantId) -> Result<()> {
        let _op = self.begin()?;
        let mut state = lock(&self.state);

        if let Some(removed) = state.ledger.remove(participant) {
            tracing::info!(%participant, quantity = removed.quantity, "contribution removed");
        }
        Ok(())
    }

    /// The contribution for `participant`, or the empty record if absent.
    pub fn get_contribution(&self, participant: &ParticipantId) -> Contribution {
        lock(&self.state)
            .ledger
            .get(participant)
            .cloned()
            .unwrap_or_else(|| Contribution::absent(participant.clone()))
    }

    /// The payout view for `participant`; zeroed defaults if absent.
    pub fn get_payment_details(&self, participant: &ParticipantId) -> PaymentDetails {
        let state = lock(&self.state);
        match state.ledger.get(participant) {
            Some(entry) => PaymentDetails::from(entry),
            None => PaymentDetails::from(&Contribution::absent(participant.clone())),
        }
    }

    pub fn count(&self) -> usize {
        lock(&self.state).ledger.count()
    }

    /// The contribution at `index` in the current iteration order.
    pub fn get_by_index(&self, index: usize) -> Result<Contribution> {
        Ok(lock(&self.state).ledger.by_index(index)?.clone())
    }

    pub fn aggregate_quantity(&self) -> u64 {
        lock(&self.state).ledger.aggregate_quantity()
    }

    /// Sets the unit price for the batch, in minor units per kilogram.
    pub fn set_price_per_unit(&self, price: u64) -> Result<()> {
        let _op = self.begin()?;
        let mut state = lock(&self.state);

        state.pricing.set_price_per_unit(price)?;
        state.events.push(LedgerEvent::PriceUpdated {
            price_per_unit: price,
        });
        tracing::info!(price_per_unit = price, "price updated");
        Ok(())
    }

    pub fn price_per_unit(&self) -> u64 {
        lock(&self.state).pricing.price_per_unit()
    }

    /// Price of the whole batch at the current unit price.
    pub fn total_price(&self) -> Result<u64> {
        let state = lock(&self.state);
        state
            .pricing
            .total_price(state.ledger.aggregate_quantity())
    }

    /// Accepts the lump-sum payment for the batch.
    ///
    /// A new payment overwrites any prior one; only one cycle is tracked at
    /// a time.
    pub fn receive_payment(&self, payer: ParticipantId, amount: u64) -> Result<()> {
        let _op = self.begin()?;
        let mut state = lock(&self.state);

        let aggregate = state.ledger.aggregate_quantity();
        if aggregate == 0 {
            return Err(LedgerError::EmptyBatch);
        }
        let expected = state.pricing.total_price(aggregate)?;
        if amount < expected {
            return Err(LedgerError::InsufficientPayment {
                expected,
                offered: amount,
            });
        }

        state.escrow.receive(payer.clone(), amount);
        state.events.push(LedgerEvent::BatchSold {
            buyer: payer.clone(),
            amount,
        });
        tracing::info!(%payer, amount, "batch sold");
        Ok(())
    }

    pub fn buyer(&self) -> Option<ParticipantId> {
        lock(&self.state).escrow.buyer().cloned()
    }

    pub fn total_received(&self) -> u64 {
        lock(&self.state).escrow.total_received()
    }

    /// Pays every unpaid, non-zero entry its proportional share of the
    /// escrowed amount, atomically for the whole call.
    ///
    /// Each entry is marked paid before its transfer runs, so a re-entrant
    /// call cannot claim it twice. One failed transfer aborts the call and
    /// reverts every entry marked during this invocation; funds already
    /// sent stay sent, which makes a transfer failure an operator-level
    /// condition to resolve before retrying. Floor division leaves the
    /// remainder ("dust") permanently unassigned.
    pub fn distribute(&self) -> Result<()> {
        let _op = self.begin()?;

        let payouts = {
            let state = lock(&self.state);
            let total_received = state.escrow.total_received();
            if total_received == 0 {
                return Err(LedgerError::NoPaymentReceived);
            }
            let aggregate = state.ledger.aggregate_quantity();
            if aggregate == 0 {
                return Err(LedgerError::EmptyBatch);
            }

            // Checks before effects: every share is computed up front so an
            // arithmetic failure aborts before any entry is touched.
            let mut payouts = Vec::new();
            for index in 0..state.ledger.count() {
                let entry = state.ledger.by_index(index)?;
                if entry.paid || entry.quantity == 0 {
                    continue;
                }
                let numerator = total_received
                    .checked_mul(entry.quantity)
                    .ok_or(LedgerError::ArithmeticOverflow("payout share"))?;
                payouts.push((entry.participant.clone(), numerator / aggregate));
            }
            payouts
        };

        let mut marked: Vec<ParticipantId> = Vec::with_capacity(payouts.len());
        let mut events = Vec::with_capacity(payouts.len());
        for (participant, share) in payouts {
            lock(&self.state).ledger.mark_paid(&participant, share);
            marked.push(participant.clone());

            if let Err(err) = self.transfer.transfer(&participant, share) {
                let mut state = lock(&self.state);
                for paid in &marked {
                    state.ledger.clear_paid(paid);
                }
                tracing::warn!(%participant, amount = share, "transfer failed, distribution rolled back");
                return Err(LedgerError::TransferFailed {
                    participant,
                    reason: err.reason,
                });
            }

            tracing::info!(%participant, amount = share, "payment distributed");
            events.push(LedgerEvent::PaymentDistributed {
                participant,
                amount: share,
            });
        }

        lock(&self.state).events.extend(events);
        Ok(())
    }

    /// Sets the free-text batch label. No validation.
    pub fn set_label(&self, label: impl Into<String>) -> Result<()> {
        let _op = self.begin()?;
        lock(&self.state).label = label.into();
        Ok(())
    }

    pub fn label(&self) -> String {
        lock(&self.state).label.clone()
    }

    /// Removes and returns every event recorded since the last drain.
    pub fn drain_events(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut lock(&self.state).events)
    }

    /// Copies the persisted state of the batch.
    pub fn snapshot(&self) -> BatchSnapshot {
        let state = lock(&self.state);
        BatchSnapshot {
            label: state.label.clone(),
            ledger: state.ledger.clone(),
            pricing: state.pricing.clone(),
            escrow: state.escrow.clone(),
        }
    }
}
